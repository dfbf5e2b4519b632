use glizzy_common::config::{AddressType, FuzzConfig, PayloadFill, SweepMode, Target};
use glizzy_common::gatt::{Handle, HandleRange, ServiceRange};
use glizzy_core::cancel::CancelToken;
use glizzy_core::results::{ResultStore, RunRecord, SweepStatus};
use glizzy_core::sweep::Sweep;

use crate::fake::{FakeDevice, RecordingReporter};

#[tokio::test]
async fn interrupted_run_is_saved_with_partial_results() -> anyhow::Result<()> {
    let cancel = CancelToken::new();
    let device = FakeDevice {
        cancel_after: Some((7, cancel.clone())),
        ..FakeDevice::default()
    };
    let config = FuzzConfig {
        sweep: SweepMode::Incremental { max_len: 3 },
        fill: PayloadFill::Zero,
        ..FuzzConfig::default()
    };
    let ranges = [ServiceRange::manual(HandleRange::new(Handle(0x0001), Handle(0x0005)))];

    let mut reporter = RecordingReporter::default();
    let report = Sweep::new(&device, &config, cancel)
        .run(&ranges, &mut reporter)
        .await;

    let dir = tempfile::tempdir()?;
    let store = ResultStore::new(dir.path().join("glizzy_results.json"));
    let target = Target::new("AA:BB:CC:DD:EE:FF", AddressType::Public);
    store.persist(&RunRecord::new(report.status, target, &report.results))?;

    let loaded = store.load()?;
    assert_eq!(loaded.status, SweepStatus::Interrupted);
    assert_eq!(loaded.attempts.len(), 7);
    assert_eq!(loaded.target.address, "AA:BB:CC:DD:EE:FF");
    assert_eq!(loaded.summary[&Handle(0x0002)].max_success_length, Some(3));
    assert_eq!(loaded.summary[&Handle(0x0003)].max_success_length, Some(1));
    assert!(!loaded.summary.contains_key(&Handle(0x0004)));

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(store.path())?)?;
    assert_eq!(raw["status"], "interrupted");
    assert_eq!(raw["attempts"][0]["handle"], "0x0001");
    assert_eq!(raw["attempts"][0]["payload"], "0");

    Ok(())
}

#[tokio::test]
async fn completed_run_overwrites_previous_file() -> anyhow::Result<()> {
    let device = FakeDevice::default();
    let config = FuzzConfig {
        sweep: SweepMode::FixedRepeat { len: 2, runs: 2 },
        fill: PayloadFill::Zero,
        ..FuzzConfig::default()
    };
    let ranges = [ServiceRange::manual(HandleRange::single(Handle(0x0010)))];

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("glizzy_results.json");
    std::fs::write(&path, "stale")?;

    let mut reporter = RecordingReporter::default();
    let report = Sweep::new(&device, &config, CancelToken::new())
        .run(&ranges, &mut reporter)
        .await;

    let store = ResultStore::new(&path);
    let target = Target::new("11:22:33:44:55:66", AddressType::Random);
    store.persist(&RunRecord::new(report.status, target, &report.results))?;

    let loaded = store.load()?;
    assert_eq!(loaded.status, SweepStatus::Completed);
    assert_eq!(loaded.attempts.len(), 2);
    assert_eq!(loaded.target.address_type, AddressType::Random);

    Ok(())
}
