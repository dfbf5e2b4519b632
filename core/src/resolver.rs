//! Turns command line overrides or discovered services into the handle ranges
//! a sweep targets.
//!
//! Precedence is manual handle ranges, then manual service ranges, then the
//! primary services reported by the device. The first non-empty source wins
//! and sources are never merged.

use glizzy_common::error::{FuzzError, Result};
use glizzy_common::gatt::{CharacteristicDescriptor, HandleRange, ServiceRange};
use glizzy_common::{info, warn};
use tracing::debug;

use crate::transport::Transport;

/// Resolves the ranges to sweep.
///
/// The UUID prefix filter only applies to discovered services; manual ranges
/// carry no UUID and bypass it. A filter that removes every service is fatal.
pub async fn resolve(
    manual_handles: &[HandleRange],
    manual_services: &[HandleRange],
    uuid_prefix: Option<&str>,
    transport: &dyn Transport,
) -> Result<Vec<ServiceRange>> {
    let manual = if !manual_handles.is_empty() {
        manual_handles
    } else {
        manual_services
    };

    if !manual.is_empty() {
        let ranges: Vec<ServiceRange> = manual.iter().copied().map(ServiceRange::manual).collect();
        warn_reversed(&ranges);
        return Ok(ranges);
    }

    let services = transport.discover_primary_services().await?;
    if services.is_empty() {
        return Err(FuzzError::Discovery(
            "device reported no primary services".to_string(),
        ));
    }
    info!("Discovered {} primary service(s)", services.len());
    for svc in &services {
        debug!("{svc}");
    }

    let ranges = match uuid_prefix {
        Some(prefix) => filter_by_uuid(services, prefix)?,
        None => services,
    };
    warn_reversed(&ranges);
    Ok(ranges)
}

fn filter_by_uuid(services: Vec<ServiceRange>, prefix: &str) -> Result<Vec<ServiceRange>> {
    let filtered: Vec<ServiceRange> = services
        .into_iter()
        .filter(|svc| svc.matches_uuid_prefix(prefix))
        .collect();

    if filtered.is_empty() {
        return Err(FuzzError::Filter(prefix.to_ascii_lowercase()));
    }
    Ok(filtered)
}

fn warn_reversed(ranges: &[ServiceRange]) {
    for range in ranges.iter().filter(|r| r.range().is_reversed()) {
        warn!("Range {}-{} ends before it starts, no handles will be targeted", range.start, range.end);
    }
}

/// Characteristic declarations that fall inside any of `ranges`.
///
/// Discovery failure is not fatal: it is logged and an empty list returned.
pub async fn descriptors_within(
    ranges: &[ServiceRange],
    transport: &dyn Transport,
) -> Vec<CharacteristicDescriptor> {
    match transport.discover_characteristic_descriptors().await {
        Ok(descriptors) => descriptors
            .into_iter()
            .filter(|desc| ranges.iter().any(|r| r.range().contains(desc.handle)))
            .collect(),
        Err(e) => {
            warn!("Could not discover characteristics: {e}");
            Vec::new()
        }
    }
}
