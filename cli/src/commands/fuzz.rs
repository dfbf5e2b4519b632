use colored::*;
use glizzy_common::config::ReportMode;
use glizzy_common::{info, plain, success, warn};
use glizzy_core::cancel::CancelToken;
use glizzy_core::reporter::Reporter;
use glizzy_core::resolver;
use glizzy_core::results::{ResultStore, RunRecord, SweepStatus};
use glizzy_core::sweep::Sweep;
use indicatif::ProgressBar;
use tokio::task::JoinHandle;

use crate::commands::CommandLine;
use crate::terminal::dashboard::InteractiveReporter;
use crate::terminal::headless::HeadlessReporter;
use crate::terminal::print;
use crate::terminal::theme::Theme;
use crate::transport::GattTool;

/// Resolves targets, runs the sweep and saves the results.
///
/// Discovery and filter errors return before anything is written to disk.
/// Once the sweep has started, results are saved however it ends.
pub async fn fuzz(
    cli: &CommandLine,
    status_bar: Option<ProgressBar>,
    theme: Theme,
) -> anyhow::Result<SweepStatus> {
    let target = cli.target();
    let config = cli.fuzz_config();
    let transport = GattTool::new(target.clone()).with_program(&cli.gatttool);

    print::header("discover services", &theme);
    info!("Target {target}");
    let ranges =
        resolver::resolve(&cli.handles, &cli.services, cli.uuid.as_deref(), &transport).await?;
    for range in &ranges {
        plain!("{}", format!("Service {range}").color(theme.handle));
    }

    print::header("characteristic descriptors", &theme);
    let descriptors = resolver::descriptors_within(&ranges, &transport).await;
    if descriptors.is_empty() {
        info!("No characteristics reported inside the targeted ranges");
    } else {
        print::characteristics(&descriptors, &theme);
    }

    let mut reporter: Box<dyn Reporter> = match (config.report, status_bar) {
        (ReportMode::Interactive, Some(bar)) => Box::new(InteractiveReporter::new(theme, bar)),
        _ => Box::new(HeadlessReporter::new(theme)),
    };

    let cancel = CancelToken::new();
    let listener = listen_for_interrupt(cancel.clone());

    let report = Sweep::new(&transport, &config, cancel)
        .run(&ranges, reporter.as_mut())
        .await;
    listener.abort();

    let summary = report.results.summarize();
    reporter.sweep_finished(report.status, &summary, &report.stats);
    drop(reporter);

    let store = ResultStore::new(&cli.output);
    store.persist(&RunRecord::new(report.status, target, &report.results))?;
    success!(
        "{} attempts saved to {}",
        report.results.len(),
        store.path().display()
    );

    Ok(report.status)
}

fn listen_for_interrupt(cancel: CancelToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current attempt");
            cancel.cancel();
        }
    })
}
