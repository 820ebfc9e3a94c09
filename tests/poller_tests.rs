/// Status poller and render tests.
///
/// Responses are canned on a recording transport; the assertions read the
/// dashboard document the way the web shell would.
use std::sync::Arc;

use arvdash::api::ApiClient;
use arvdash::api::error::ApiError;
use arvdash::api::recording::RecordingTransport;
use arvdash::app::Dashboard;
use arvdash::config::DashConfig;
use arvdash::events::EventLog;
use arvdash::poller::{Fetched, PollOutcome, Source};
use arvdash::ui::state;
use serde_json::{Value, json};

fn dashboard() -> (Arc<RecordingTransport>, Dashboard) {
    let fake = Arc::new(RecordingTransport::new());
    let client = ApiClient::new(fake.clone(), "0.1");
    let mut config = DashConfig::default();
    config.polling.max_in_flight = 4;
    let dash = Dashboard::with_client(config, client, EventLog::disabled());
    (fake, dash)
}

fn aravis(streaming: Value, mode: &str) -> Value {
    json!({
        "status": {
            "camera_id": {"value": "Aravis-Fake-GV01"},
            "streaming": {"value": streaming},
            "frames_captured": {"value": 42}
        },
        "config": {
            "exposure_time": {"value": 2000.0},
            "frame_rate": {"value": 5},
            "frame_count": {"value": 10},
            "mode": {"value": mode},
            "pixel_format": {"value": "Mono8"}
        }
    })
}

fn writer(connected: bool, written: i64) -> Value {
    json!({
        "connected": connected,
        "shared_memory": {"configured": true},
        "hdf": {
            "processes": 2, "rank": 1, "frames_written": written, "frames_max": 100,
            "file_name": "/data/run_1.h5", "writing": true
        }
    })
}

// ---------------------------------------------------------------------------
// Acquisition
// ---------------------------------------------------------------------------

#[test]
fn acquisition_snapshot_renders_fields() {
    let (fake, dash) = dashboard();
    fake.respond_get("/api/0.1/aravis", aravis(json!(true), "Continuous"));

    assert_eq!(dash.poll_once(Source::Acquisition), Some(PollOutcome::Applied));

    let st = state::lock(dash.state());
    let doc = &st.document;
    assert_eq!(doc.html("camera-id"), Some("Aravis-Fake-GV01"));
    assert_eq!(doc.html("get-exposure"), Some("2000"));
    assert_eq!(doc.html("get-rate"), Some("5"));
    assert_eq!(doc.html("get-num-frames"), Some("10"));
    assert_eq!(doc.html("get-mode"), Some("Continuous"));
    assert_eq!(doc.html("get-pixel-format"), Some("Mono8"));
    assert_eq!(doc.html("get-frames-captured"), Some("42"));
    assert_eq!(
        doc.html("get-acq-state"),
        Some(r#"<img width="20px" src="img/green-led-on.svg">"#)
    );
}

#[test]
fn unset_pixel_format_renders_empty() {
    let (fake, dash) = dashboard();
    let mut payload = aravis(json!(true), "Continuous");
    payload["config"]["pixel_format"] = json!({"value": null});
    fake.respond_get("/api/0.1/aravis", payload);

    assert_eq!(dash.poll_once(Source::Acquisition), Some(PollOutcome::Applied));

    let st = state::lock(dash.state());
    let doc = &st.document;
    assert_eq!(doc.html("camera-id"), Some("Aravis-Fake-GV01"));
    assert_eq!(doc.html("get-exposure"), Some("2000"));
    assert_eq!(doc.html("get-pixel-format"), Some(""));
    assert!(doc.html("get-acq-state").unwrap().contains("green-led-on"));
}

#[test]
fn not_streaming_shows_led_off() {
    let (fake, dash) = dashboard();
    for off in [json!(false), json!(0), json!(null)] {
        fake.respond_get("/api/0.1/aravis", aravis(off.clone(), "SingleFrame"));
        dash.poll_once(Source::Acquisition);
        let st = state::lock(dash.state());
        assert_eq!(
            st.document.html("get-acq-state"),
            Some(r#"<img width="20px" src="img/led-off.svg">"#),
            "{off}"
        );
    }
}

#[test]
fn reported_mode_selects_matching_option() {
    let (fake, dash) = dashboard();
    for (label, index) in [("SingleFrame", "0"), ("MultiFrame", "1"), ("Continuous", "2")] {
        fake.respond_get("/api/0.1/aravis", aravis(json!(true), label));
        dash.poll_once(Source::Acquisition);
        assert_eq!(
            state::lock(dash.state()).document.value("set-mode"),
            Some(index)
        );
    }

    // Unknown label leaves the selector alone.
    fake.respond_get("/api/0.1/aravis", aravis(json!(true), "Burst"));
    dash.poll_once(Source::Acquisition);
    let st = state::lock(dash.state());
    assert_eq!(st.document.value("set-mode"), Some("2"));
    assert_eq!(st.document.html("get-mode"), Some("Burst"));
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

#[test]
fn connected_writer_fills_row() {
    let (fake, dash) = dashboard();
    fake.respond_get(
        "/api/0.1/fp/status/",
        json!({"value": [writer(true, 7), writer(true, 9)]}),
    );
    dash.poll_once(Source::Writers);

    let st = state::lock(dash.state());
    let doc = &st.document;
    assert_eq!(doc.html("fp1-hdf-written"), Some("7 / 100"));
    assert_eq!(doc.html("fp2-hdf-written"), Some("9 / 100"));
    assert_eq!(doc.html("fp1-hdf-processes"), Some("2"));
    assert_eq!(doc.html("fp1-hdf-rank"), Some("1"));
    assert_eq!(doc.html("fp1-hdf-file-path"), Some("/data/run_1.h5"));
    assert!(doc.html("fp1-writing").unwrap().contains("green-led-on"));
    assert!(doc.html("fp1-shared-mem").unwrap().contains("green-led-on"));
}

#[test]
fn partial_writer_entry_keeps_other_rows() {
    let (fake, dash) = dashboard();
    let partial = json!({
        "connected": true,
        "hdf": {"processes": 1, "frames_written": 3}
    });
    fake.respond_get("/api/0.1/fp/status/", json!({"value": [writer(true, 7), partial]}));

    assert_eq!(dash.poll_once(Source::Writers), Some(PollOutcome::Applied));

    let st = state::lock(dash.state());
    let doc = &st.document;
    assert_eq!(doc.html("fp1-hdf-written"), Some("7 / 100"));
    assert_eq!(doc.html("fp2-hdf-processes"), Some("1"));
    assert_eq!(doc.html("fp2-hdf-rank"), Some("0"));
}

#[test]
fn disconnected_writer_row_is_blank() {
    let (fake, dash) = dashboard();
    fake.respond_get("/api/0.1/fp/status/", json!({"value": [writer(true, 7)]}));
    dash.poll_once(Source::Writers);

    fake.respond_get("/api/0.1/fp/status/", json!({"value": [writer(false, 7)]}));
    dash.poll_once(Source::Writers);

    let st = state::lock(dash.state());
    let doc = &st.document;
    assert!(doc.html("fp1-connected").unwrap().contains("led-off"));
    for field in [
        "shared-mem",
        "hdf-processes",
        "hdf-rank",
        "hdf-written",
        "hdf-file-path",
        "writing",
    ] {
        assert_eq!(doc.html(&format!("fp1-{field}")), Some(""), "fp1-{field}");
    }
}

// ---------------------------------------------------------------------------
// Ordering and failures
// ---------------------------------------------------------------------------

#[test]
fn stale_response_is_dropped() {
    let (fake, dash) = dashboard();
    let poller = dash.poller(Source::Writers);

    let tick1 = poller.issue().unwrap();
    let tick2 = poller.issue().unwrap();

    fake.respond_get("/api/0.1/fp/status/", json!({"value": [writer(true, 50)]}));
    let newer = Source::Writers.fetch(dash.client()).unwrap();
    fake.respond_get("/api/0.1/fp/status/", json!({"value": [writer(true, 10)]}));
    let older = Source::Writers.fetch(dash.client()).unwrap();

    assert_eq!(poller.complete(&tick2, Ok(newer)), PollOutcome::Applied);
    assert_eq!(poller.complete(&tick1, Ok(older)), PollOutcome::Superseded);

    let st = state::lock(dash.state());
    assert_eq!(st.document.html("fp1-hdf-written"), Some("50 / 100"));
}

#[test]
fn failed_poll_keeps_last_display() {
    let (fake, dash) = dashboard();
    fake.respond_get("/api/0.1/aravis", aravis(json!(true), "Continuous"));
    dash.poll_once(Source::Acquisition);

    fake.fail_get(
        "/api/0.1/aravis",
        ApiError::Transport("connection refused".into()),
    );
    assert!(matches!(
        dash.poll_once(Source::Acquisition),
        Some(PollOutcome::Failed(_))
    ));

    let st = state::lock(dash.state());
    assert_eq!(st.document.html("camera-id"), Some("Aravis-Fake-GV01"));
    assert!(st.health["acquisition"].is_failing());
    assert!(st.pending_alerts().next().is_none());
}

#[test]
fn recovery_clears_failing_health() {
    let (fake, dash) = dashboard();
    fake.fail_get("/api/0.1/sys", ApiError::Transport("timeout".into()));
    dash.poll_once(Source::System);
    assert!(state::lock(dash.state()).health["system"].is_failing());

    fake.respond_get(
        "/api/0.1/sys",
        json!({
            "odin_version": "1.3.0",
            "server_uptime": 12.5,
            "platform": {"system": "Linux", "processor": "x86_64",
                         "release": "5.14", "version": "#1 SMP"},
            "python_version": "3.9.7",
            "tornado_version": "6.1"
        }),
    );
    assert_eq!(dash.poll_once(Source::System), Some(PollOutcome::Applied));

    let st = state::lock(dash.state());
    assert!(!st.health["system"].is_failing());
    assert_eq!(st.document.html("odin-version"), Some("1.3.0"));
    assert_eq!(st.document.html("server-up-time"), Some("12.5"));
    assert_eq!(st.document.html("system-version"), Some("#1 SMP"));
}

#[test]
fn fetched_writers_are_typed() {
    let (fake, dash) = dashboard();
    fake.respond_get("/api/0.1/fp/status/", json!({"value": [writer(true, 1)]}));
    match Source::Writers.fetch(dash.client()).unwrap() {
        Fetched::Writers(writers) => assert_eq!(writers.len(), 1),
        other => panic!("unexpected {other:?}"),
    }
}
