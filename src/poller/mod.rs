/// Status pollers.
///
/// One supervised thread per data source ticks at the configured interval.
/// Every tick takes a [`Ticket`] from the source's [`SequenceGuard`] and runs
/// the request on a short-lived worker thread, so a slow server never delays
/// the next tick. When a response arrives the worker locks the shared state,
/// checks the ticket is still the newest, and renders. Superseded responses
/// and failures leave the display untouched.
///
/// | Source        | Request          | Default interval |
/// |---------------|------------------|------------------|
/// | `system`      | `GET sys`        | 1000 ms          |
/// | `acquisition` | `GET aravis`     | 200 ms           |
/// | `writers`     | `GET fp/status/` | 500 ms           |
pub mod guard;

use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::Serialize;

pub use guard::{SequenceGuard, Ticket};

use crate::api::ApiClient;
use crate::api::error::ApiError;
use crate::api::types::{AravisSnapshot, SystemInfo, WriterStatus};
use crate::config::schema::PollingConfig;
use crate::events::{EventEntry, EventKind, EventLog};
use crate::ui::render;
use crate::ui::state::{self, SharedState};

/// A polled data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    System,
    Acquisition,
    Writers,
}

impl Source {
    pub const ALL: [Source; 3] = [Self::System, Self::Acquisition, Self::Writers];

    pub fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Acquisition => "acquisition",
            Self::Writers => "writers",
        }
    }

    pub fn interval(self, config: &PollingConfig) -> Duration {
        let ms = match self {
            Self::System => config.system_ms,
            Self::Acquisition => config.acquisition_ms,
            Self::Writers => config.writers_ms,
        };
        Duration::from_millis(ms.max(10))
    }

    /// Issue this source's request.
    pub fn fetch(self, client: &ApiClient) -> Result<Fetched, ApiError> {
        Ok(match self {
            Self::System => Fetched::System(client.system()?),
            Self::Acquisition => Fetched::Acquisition(client.acquisition()?),
            Self::Writers => Fetched::Writers(client.writer_status()?),
        })
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded response, ready to render.
#[derive(Debug, Clone)]
pub enum Fetched {
    System(SystemInfo),
    Acquisition(AravisSnapshot),
    Writers(Vec<WriterStatus>),
}

/// What happened to one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Applied,
    /// A newer response had already been rendered.
    Superseded,
    Failed(String),
}

/// Poller for one source.
#[derive(Debug, Clone)]
pub struct Poller {
    source: Source,
    client: ApiClient,
    state: SharedState,
    guard: std::sync::Arc<SequenceGuard>,
    log: EventLog,
}

impl Poller {
    pub fn new(
        source: Source,
        client: ApiClient,
        state: SharedState,
        max_in_flight: usize,
        log: EventLog,
    ) -> Self {
        Self {
            source,
            client,
            state,
            guard: SequenceGuard::new(max_in_flight),
            log,
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn guard(&self) -> &SequenceGuard {
        &self.guard
    }

    /// Take a ticket for the next request (`None` when at the in-flight cap).
    pub fn issue(&self) -> Option<Ticket> {
        self.guard.issue()
    }

    /// Fetch and apply synchronously. Used for the start-up one-shot fetches
    /// and by the CLI. `None` when at the in-flight cap.
    pub fn poll_once(&self) -> Option<PollOutcome> {
        let ticket = self.issue()?;
        let result = self.source.fetch(&self.client);
        Some(self.complete(&ticket, result))
    }

    /// Apply a finished request.
    ///
    /// Success renders only if the ticket is still the newest; failure updates
    /// source health unless a newer response has already landed.
    pub fn complete(&self, ticket: &Ticket, result: Result<Fetched, ApiError>) -> PollOutcome {
        let name = self.source.name();
        let mut state = state::lock(&self.state);

        match result {
            Ok(fetched) => {
                if !self.guard.accept(ticket) {
                    return PollOutcome::Superseded;
                }
                match fetched {
                    Fetched::System(info) => render::render_system(&mut state, info),
                    Fetched::Acquisition(snap) => render::render_acquisition(&mut state, snap),
                    Fetched::Writers(writers) => render::render_writers(&mut state, writers),
                }
                if state.health_mut(name).record_success() {
                    self.log.record(EventEntry::new(EventKind::PollRecovered, name));
                }
                PollOutcome::Applied
            }
            Err(err) => {
                let message = err.to_string();
                if self.guard.is_current(ticket)
                    && state.health_mut(name).record_failure(message.clone())
                {
                    self.log
                        .record(EventEntry::new(EventKind::PollFailing, name).failed(message.clone()));
                }
                PollOutcome::Failed(message)
            }
        }
    }

    /// Issue one request on a worker thread. `None` when the tick is skipped.
    pub fn tick(&self) -> Option<JoinHandle<PollOutcome>> {
        let ticket = self.issue()?;
        let poller = self.clone();
        let spawned = thread::Builder::new()
            .name(format!("poll-{}-{}", self.source.name(), ticket.seq()))
            .spawn(move || {
                let result = poller.source.fetch(&poller.client);
                poller.complete(&ticket, result)
            });
        spawned.ok()
    }

    /// Run forever, ticking every `interval`.
    pub fn spawn(self, interval: Duration) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("poller-{}", self.source.name()))
            .spawn(move || {
                loop {
                    let _ = self.tick();
                    thread::sleep(interval);
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::recording::RecordingTransport;
    use crate::ui::state::AppState;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (Arc<RecordingTransport>, ApiClient, SharedState) {
        let fake = Arc::new(RecordingTransport::new());
        let client = ApiClient::new(fake.clone(), "0.1");
        (fake, client, AppState::default().shared())
    }

    fn writers(connected: bool) -> serde_json::Value {
        json!({"value": [{
            "connected": connected,
            "shared_memory": {"configured": true},
            "hdf": {"processes": 1, "rank": 0, "frames_written": 3, "frames_max": 10,
                    "file_name": "/tmp/a.h5", "writing": true}
        }]})
    }

    #[test]
    fn interval_per_source() {
        let config = PollingConfig::default();
        assert_eq!(Source::System.interval(&config), Duration::from_millis(1000));
        assert_eq!(Source::Acquisition.interval(&config), Duration::from_millis(200));
        assert_eq!(Source::Writers.interval(&config), Duration::from_millis(500));
    }

    #[test]
    fn poll_once_renders() {
        let (fake, client, state) = setup();
        fake.respond_get("/api/0.1/fp/status/", writers(true));
        let poller = Poller::new(Source::Writers, client, state.clone(), 2, EventLog::disabled());

        assert_eq!(poller.poll_once(), Some(PollOutcome::Applied));
        let st = state::lock(&state);
        assert_eq!(st.document.html("fp1-hdf-written"), Some("3 / 10"));
        assert!(!st.health["writers"].is_failing());
    }

    #[test]
    fn superseded_response_is_dropped() {
        let (fake, client, state) = setup();
        fake.respond_get("/api/0.1/fp/status/", writers(true));
        let poller = Poller::new(Source::Writers, client.clone(), state.clone(), 4, EventLog::disabled());

        let slow = poller.issue().unwrap();
        let fast = poller.issue().unwrap();

        // Tick 2 lands first with "disconnected".
        let fresh: Vec<WriterStatus> =
            serde_json::from_value(writers(false)["value"].clone()).unwrap();
        assert_eq!(
            poller.complete(&fast, Ok(Fetched::Writers(fresh))),
            PollOutcome::Applied
        );
        // Tick 1 arrives late with "connected" and must not overwrite.
        let stale = Source::Writers.fetch(&client).unwrap();
        assert_eq!(poller.complete(&slow, Ok(stale)), PollOutcome::Superseded);

        let st = state::lock(&state);
        assert_eq!(st.document.html("fp1-hdf-written"), Some(""));
    }

    #[test]
    fn failure_leaves_display_and_marks_health() {
        let (fake, client, state) = setup();
        fake.respond_get("/api/0.1/fp/status/", writers(true));
        let poller = Poller::new(Source::Writers, client, state.clone(), 2, EventLog::disabled());
        poller.poll_once();

        fake.fail_get(
            "/api/0.1/fp/status/",
            ApiError::Transport("connection refused".into()),
        );
        assert!(matches!(poller.poll_once(), Some(PollOutcome::Failed(_))));

        let st = state::lock(&state);
        assert_eq!(st.document.html("fp1-hdf-written"), Some("3 / 10"));
        assert_eq!(st.health["writers"].consecutive_failures, 1);
    }

    #[test]
    fn shape_mismatch_skips_update() {
        let (fake, client, state) = setup();
        fake.respond_get("/api/0.1/aravis", json!({"status": {}}));
        let poller = Poller::new(Source::Acquisition, client, state.clone(), 2, EventLog::disabled());

        assert!(matches!(poller.poll_once(), Some(PollOutcome::Failed(_))));
        let st = state::lock(&state);
        assert_eq!(st.document.html("camera-id"), None);
        assert!(st.acquisition.is_none());
    }

    #[test]
    fn tick_runs_on_worker_thread() {
        let (fake, client, state) = setup();
        fake.respond_get("/api/0.1/fp/status/", writers(true));
        let poller = Poller::new(Source::Writers, client, state.clone(), 1, EventLog::disabled());

        let handle = poller.tick().unwrap();
        assert_eq!(handle.join().unwrap(), PollOutcome::Applied);
        assert_eq!(poller.guard().in_flight(), 0);
    }
}
