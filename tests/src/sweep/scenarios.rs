use glizzy_common::attempt::Outcome;
use glizzy_common::config::{FuzzConfig, PayloadFill, SweepMode};
use glizzy_common::error::FuzzError;
use glizzy_common::gatt::{Handle, HandleRange, ServiceRange};
use glizzy_core::cancel::CancelToken;
use glizzy_core::reporter::SweepKind;
use glizzy_core::resolver;
use glizzy_core::results::SweepStatus;
use glizzy_core::sweep::{Sweep, SweepReport};

use crate::fake::{CONFIRMED, FakeDevice, REJECTED, RecordingReporter};

fn one_service() -> Vec<ServiceRange> {
    vec![ServiceRange::new(
        Handle(0x0001),
        Handle(0x0005),
        "0000ffe0-0000-1000-8000-00805f9b34fb",
    )]
}

fn incremental(max_len: usize) -> FuzzConfig {
    FuzzConfig {
        sweep: SweepMode::Incremental { max_len },
        fill: PayloadFill::Zero,
        ..FuzzConfig::default()
    }
}

async fn discover_and_sweep(
    device: &FakeDevice,
    config: &FuzzConfig,
    cancel: CancelToken,
) -> (SweepReport, RecordingReporter) {
    let ranges = resolver::resolve(&[], &[], None, device).await.unwrap();
    let mut reporter = RecordingReporter::default();
    let report = Sweep::new(device, config, cancel).run(&ranges, &mut reporter).await;
    (report, reporter)
}

#[tokio::test]
async fn all_writes_succeed() {
    let device = FakeDevice::with_services(one_service());
    let config = incremental(3);

    let (report, reporter) = discover_and_sweep(&device, &config, CancelToken::new()).await;

    assert_eq!(report.status, SweepStatus::Completed);
    assert_eq!(report.results.len(), 15);
    assert_eq!(reporter.attempts.len(), 15);
    assert!(report
        .results
        .attempts()
        .iter()
        .all(|a| a.outcome == Outcome::Success && a.readback.as_deref() == Some("00")));

    let summary = report.results.summarize();
    assert_eq!(summary.len(), 5);
    for handle in 1..=5u16 {
        let lengths: Vec<usize> = report
            .results
            .for_handle(Handle(handle))
            .filter_map(|a| a.length)
            .collect();
        assert_eq!(lengths, vec![1, 2, 3]);
        assert_eq!(summary[&Handle(handle)].max_success_length, Some(3));
        assert_eq!(summary[&Handle(handle)].first_fail_length, None);
    }
}

#[tokio::test]
async fn length_rejection_marks_boundary() {
    let device = FakeDevice {
        reject_from: Some(4),
        ..FakeDevice::with_services(one_service())
    };
    let config = incremental(5);

    let (report, reporter) = discover_and_sweep(&device, &config, CancelToken::new()).await;

    assert_eq!(reporter.responses.len(), 25);
    assert_eq!(reporter.responses[3], (Handle(0x0001), REJECTED.to_string()));
    assert_eq!(reporter.responses[2], (Handle(0x0001), CONFIRMED.to_string()));

    let outcomes: Vec<(usize, Outcome)> = report
        .results
        .for_handle(Handle(0x0003))
        .map(|a| (a.length.unwrap(), a.outcome))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            (1, Outcome::Success),
            (2, Outcome::Success),
            (3, Outcome::Success),
            (4, Outcome::Ambiguous),
            (5, Outcome::Ambiguous),
        ]
    );

    let rejected = report
        .results
        .for_handle(Handle(0x0003))
        .find(|a| a.length == Some(4))
        .unwrap();
    assert_eq!(rejected.readback, None);
    assert_eq!(rejected.exit_status, Some(1));

    let entry = report.results.summarize()[&Handle(0x0003)];
    assert_eq!(entry.first_fail_length, Some(4));
    assert_eq!(entry.max_success_length, Some(3));
    assert_eq!(report.stats.ambiguous, 10);
}

#[tokio::test]
async fn interrupt_keeps_completed_attempts() {
    let cancel = CancelToken::new();
    let device = FakeDevice {
        cancel_after: Some((7, cancel.clone())),
        ..FakeDevice::with_services(one_service())
    };
    let config = incremental(3);

    let (report, reporter) = discover_and_sweep(&device, &config, cancel).await;

    assert_eq!(report.status, SweepStatus::Interrupted);
    assert_eq!(report.results.len(), 7);
    assert_eq!(reporter.attempts.len(), 7);
    assert_eq!(device.write_count(), 7);

    let last = report.results.attempts().last().unwrap();
    assert_eq!(last.handle, Handle(0x0003));
    assert_eq!(last.length, Some(1));
}

#[tokio::test]
async fn fixed_repeat_runs_per_handle() {
    let device = FakeDevice::with_services(one_service());
    let config = FuzzConfig {
        sweep: SweepMode::FixedRepeat { len: 8, runs: 4 },
        fill: PayloadFill::Random,
        prefix: "ab".to_string(),
        ..FuzzConfig::default()
    };

    let (report, _) = discover_and_sweep(&device, &config, CancelToken::new()).await;

    assert_eq!(report.results.len(), 20);
    for handle in 1..=5u16 {
        assert_eq!(report.results.for_handle(Handle(handle)).count(), 4);
    }
    for (_, payload) in device.writes.lock().unwrap().iter() {
        assert_eq!(payload.len(), 8);
        assert!(payload.starts_with("ab"));
    }
}

#[tokio::test]
async fn handle_ranges_take_precedence() {
    let device = FakeDevice::with_services(one_service());
    let handles = [HandleRange::single(Handle(0x0004))];
    let services = [HandleRange::new(Handle(0x0001), Handle(0x0005))];

    let ranges = resolver::resolve(&handles, &services, None, &device)
        .await
        .unwrap();
    assert_eq!(ranges, vec![ServiceRange::manual(handles[0])]);

    let config = incremental(2);
    let mut reporter = RecordingReporter::default();
    let report = Sweep::new(&device, &config, CancelToken::new())
        .run(&ranges, &mut reporter)
        .await;

    assert_eq!(report.results.len(), 2);
    assert!(report
        .results
        .attempts()
        .iter()
        .all(|a| a.handle == Handle(0x0004)));
}

#[tokio::test]
async fn unmatched_uuid_filter_aborts_before_writes() {
    let device = FakeDevice::with_services(one_service());

    let err = resolver::resolve(&[], &[], Some("0000180f"), &device)
        .await
        .unwrap_err();

    assert!(matches!(err, FuzzError::Filter(_)));
    assert_eq!(device.write_count(), 0);
}

#[tokio::test]
async fn read_only_mode_never_writes() {
    let device = FakeDevice::with_services(one_service());
    let config = FuzzConfig {
        read_only: true,
        ..incremental(3)
    };

    let (report, reporter) = discover_and_sweep(&device, &config, CancelToken::new()).await;

    assert_eq!(reporter.kind, Some(SweepKind::ReadOnly));
    assert_eq!(report.results.len(), 5);
    assert_eq!(device.write_count(), 0);
    assert_eq!(device.reads.lock().unwrap().len(), 5);
    assert!(report.results.attempts().iter().all(|a| a.length.is_none()));
}

#[tokio::test]
async fn notifications_are_reported_but_not_stored() {
    let device = FakeDevice {
        notification: Some("Notification handle = 0x0003 value: 01".to_string()),
        ..FakeDevice::with_services(one_service())
    };
    let config = FuzzConfig {
        notify: true,
        ..incremental(1)
    };

    let (report, reporter) = discover_and_sweep(&device, &config, CancelToken::new()).await;

    assert_eq!(reporter.notifications.len(), 5);
    assert_eq!(reporter.notifications[0].0, Handle(0x0001));
    assert!(report
        .results
        .attempts()
        .iter()
        .all(|a| a.readback.as_deref() == Some("00")));
}
