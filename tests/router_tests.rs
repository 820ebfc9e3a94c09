/// View router tests through the dashboard controller.
use std::sync::Arc;

use arvdash::api::ApiClient;
use arvdash::api::error::ApiError;
use arvdash::api::recording::{Recorded, RecordingTransport};
use arvdash::app::Dashboard;
use arvdash::config::DashConfig;
use arvdash::events::EventLog;
use arvdash::ui::state;
use serde_json::json;

fn dashboard() -> (Arc<RecordingTransport>, Dashboard) {
    let fake = Arc::new(RecordingTransport::new());
    fake.respond_get("/api", json!({"api": 0.1}));
    fake.respond_get("/api/0.1/adapters/", json!({"adapters": ["aravis", "fp", "system_info"]}));
    let client = ApiClient::new(fake.clone(), "0.1");
    let dash = Dashboard::with_client(DashConfig::default(), client, EventLog::disabled());
    (fake, dash)
}

#[test]
fn first_segment_selects_page() {
    let (_fake, dash) = dashboard();
    let outcome = dash.navigate("#aravis-view/extra");
    assert_eq!(outcome.page, "aravis-view");
    assert!(outcome.matched);

    let st = state::lock(dash.state());
    assert_eq!(st.document.visible_pages(), vec!["aravis-view"]);
    assert_eq!(st.document.title(), "Aravis (aravis-view)");
}

#[test]
fn unknown_segment_hides_everything() {
    let (_fake, dash) = dashboard();
    dash.navigate("#aravis-view");
    let outcome = dash.navigate("#foo/bar");

    assert_eq!(outcome.page, "foo");
    assert!(!outcome.matched);
    let st = state::lock(dash.state());
    assert!(st.document.visible_pages().is_empty());
    assert_eq!(st.document.title(), "Aravis (foo)");
}

#[test]
fn empty_fragment_goes_home_and_refreshes() {
    let (fake, dash) = dashboard();
    let outcome = dash.navigate("");

    assert_eq!(outcome.page, "home-view");
    assert!(outcome.entered_home);
    assert_eq!(
        fake.requests(),
        vec![Recorded::get("/api"), Recorded::get("/api/0.1/adapters/")]
    );

    let st = state::lock(dash.state());
    assert_eq!(st.document.title(), "Aravis");
    assert_eq!(st.document.html("api-version"), Some("0.1"));
    assert_eq!(st.document.html("api-adapters"), Some("aravis, fp, system_info"));
}

#[test]
fn home_refresh_failure_keeps_old_values() {
    let (fake, dash) = dashboard();
    dash.navigate("#home-view");

    fake.fail_get("/api", ApiError::Transport("connection refused".into()));
    dash.navigate("#fp-view");
    dash.navigate("#home-view");

    let st = state::lock(dash.state());
    assert_eq!(st.document.html("api-version"), Some("0.1"));
    assert!(st.document.is_visible("home-view"));
}
