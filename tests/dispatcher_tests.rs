/// Command dispatcher tests.
///
/// Drive the dispatcher through a `Dashboard` backed by a recording
/// transport and check the exact PUT sequence each event produces, plus the
/// alert behaviour on failure.
use std::sync::Arc;

use arvdash::api::ApiClient;
use arvdash::api::error::ApiError;
use arvdash::api::recording::{Recorded, RecordingTransport};
use arvdash::app::Dashboard;
use arvdash::config::DashConfig;
use arvdash::control::{StepOutcome, UiEvent};
use arvdash::events::{EventKind, EventLog};
use serde_json::json;

fn dashboard() -> (Arc<RecordingTransport>, Dashboard) {
    let fake = Arc::new(RecordingTransport::new());
    let client = ApiClient::new(fake.clone(), "0.1");
    let dash = Dashboard::with_client(DashConfig::default(), client, EventLog::disabled());
    (fake, dash)
}

fn server_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 400,
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Acquisition commands
// ---------------------------------------------------------------------------

#[test]
fn exposure_change_sends_number() {
    let (fake, dash) = dashboard();
    dash.handle_event(&UiEvent::ExposureChanged {
        value: "2500".into(),
    })
    .unwrap();
    assert_eq!(
        fake.requests(),
        vec![Recorded::put(
            "/api/0.1/aravis/config/exposure_time",
            Some(json!(2500))
        )]
    );
}

#[test]
fn frame_count_sends_number() {
    let (fake, dash) = dashboard();
    dash.handle_event(&UiEvent::FrameCountChanged { value: "10".into() })
        .unwrap();
    assert_eq!(
        fake.requests(),
        vec![Recorded::put(
            "/api/0.1/aravis/config/frame_count",
            Some(json!(10))
        )]
    );
}

#[test]
fn mode_selection_sends_label() {
    let (fake, dash) = dashboard();
    for (index, label) in [(0, "SingleFrame"), (1, "MultiFrame"), (2, "Continuous")] {
        fake.clear();
        dash.handle_event(&UiEvent::ModeSelected { index }).unwrap();
        assert_eq!(fake.puts()[0].body, Some(json!(label)));
    }
}

#[test]
fn acquisition_failure_raises_no_alert() {
    let (fake, dash) = dashboard();
    fake.fail_put(
        "/api/0.1/aravis/config/exposure_time",
        server_error("out of range"),
    );

    let report = dash
        .handle_event(&UiEvent::ExposureChanged {
            value: "-1".into(),
        })
        .unwrap();

    assert!(!report.succeeded());
    assert!(dash.drain_alerts().is_empty());
}

// ---------------------------------------------------------------------------
// Writer commands
// ---------------------------------------------------------------------------

#[test]
fn writer_start_sends_three_puts_in_order() {
    let (fake, dash) = dashboard();
    let report = dash.handle_event(&UiEvent::WriterStart).unwrap();

    assert!(report.succeeded());
    assert_eq!(
        fake.requests(),
        vec![
            Recorded::put("/api/0.1/fp/command/reset_statistics", None),
            Recorded::put("/api/0.1/fp/config/hdf/master", Some(json!("data"))),
            Recorded::put("/api/0.1/fp/config/hdf/write", Some(json!(1))),
        ]
    );
}

#[test]
fn writer_start_halts_at_first_failure() {
    let (fake, dash) = dashboard();
    fake.fail_put(
        "/api/0.1/fp/command/reset_statistics",
        server_error("writer busy"),
    );

    let report = dash.handle_event(&UiEvent::WriterStart).unwrap();

    assert_eq!(fake.puts().len(), 1);
    assert_eq!(
        report.steps[0].outcome,
        StepOutcome::Failed("writer busy".into())
    );
    assert_eq!(report.steps[1].outcome, StepOutcome::Skipped);
    assert_eq!(report.steps[2].outcome, StepOutcome::Skipped);
}

#[test]
fn writer_failure_alerts_with_server_message() {
    let (fake, dash) = dashboard();
    fake.fail_put("/api/0.1/fp/config/hdf/master", server_error("X"));

    dash.handle_event(&UiEvent::WriterStart).unwrap();

    let alerts = dash.drain_alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("X"));
    assert!(alerts[0].starts_with("FAILED: "));
    assert!(dash.drain_alerts().is_empty());
}

#[test]
fn writer_params_are_sent_independently() {
    let (fake, dash) = dashboard();
    fake.fail_put("/api/0.1/fp/config/hdf/frames", server_error("too many"));

    let report = dash
        .handle_event(&UiEvent::WriterParamsChanged {
            frames: "500".into(),
            path: "/data".into(),
            file_name: "scan_1".into(),
        })
        .unwrap();

    let puts = fake.puts();
    assert_eq!(puts.len(), 3);
    assert_eq!(puts[0].body, Some(json!(500)));
    assert_eq!(puts[1].path, "/api/0.1/fp/config/hdf/file/path");
    assert_eq!(puts[1].body, Some(json!("/data")));
    assert_eq!(puts[2].path, "/api/0.1/fp/config/hdf/file/name");
    assert_eq!(puts[2].body, Some(json!("scan_1")));
    assert_eq!(report.failures().count(), 1);
    assert_eq!(dash.drain_alerts(), vec!["FAILED: too many".to_string()]);
}

#[test]
fn empty_writer_frames_still_sends_all_three() {
    let (fake, dash) = dashboard();
    dash.handle_event(&UiEvent::WriterParamsChanged {
        frames: "".into(),
        path: "/data".into(),
        file_name: "scan".into(),
    })
    .unwrap();

    assert_eq!(
        fake.requests(),
        vec![
            Recorded::put("/api/0.1/fp/config/hdf/frames", Some(json!(""))),
            Recorded::put("/api/0.1/fp/config/hdf/file/path", Some(json!("/data"))),
            Recorded::put("/api/0.1/fp/config/hdf/file/name", Some(json!("scan"))),
        ]
    );
}

#[test]
fn writer_stop_clears_write_flag() {
    let (fake, dash) = dashboard();
    dash.handle_event(&UiEvent::WriterStop).unwrap();
    assert_eq!(
        fake.requests(),
        vec![Recorded::put("/api/0.1/fp/config/hdf/write", Some(json!(0)))]
    );
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

#[test]
fn every_sent_step_is_logged() {
    let dir = std::env::temp_dir().join(format!("arvdash-dispatch-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let log = EventLog::at(dir.join("events.jsonl"));

    let fake = Arc::new(RecordingTransport::new());
    fake.fail_put("/api/0.1/fp/config/hdf/master", server_error("X"));
    let client = ApiClient::new(fake.clone(), "0.1");
    let dash = Dashboard::with_client(DashConfig::default(), client, log.clone());

    dash.handle_event(&UiEvent::WriterStart).unwrap();

    let entries: Vec<_> = log
        .read_all()
        .into_iter()
        .filter(|e| e.kind == EventKind::Command)
        .collect();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].success);
    assert_eq!(entries[1].target, "/api/0.1/fp/config/hdf/master");
    assert!(!entries[1].success);

    let _ = std::fs::remove_dir_all(&dir);
}
