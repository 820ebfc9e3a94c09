/// Top-level dashboard controller.
///
/// Owns the application state and wires the pieces together: start-up
/// one-shot fetches, the three pollers, fragment navigation and the command
/// dispatcher. The web server and the CLI only talk to a [`Dashboard`].
use std::thread::JoinHandle;

use anyhow::Result;

use crate::api::ApiClient;
use crate::config::DashConfig;
use crate::control::{Dispatcher, UiEvent, WorkflowReport};
use crate::events::{EventEntry, EventKind, EventLog};
use crate::poller::{PollOutcome, Poller, Source};
use crate::ui::render;
use crate::ui::router::{self, Route, RouteOutcome};
use crate::ui::state::{self, AppState, SharedState};

#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashConfig,
    client: ApiClient,
    state: SharedState,
    log: EventLog,
    dispatcher: Dispatcher,
    pollers: Vec<Poller>,
}

impl Dashboard {
    /// Dashboard talking HTTP to the configured server, logging per `[logging]`.
    pub fn from_config(config: DashConfig) -> Self {
        let client = ApiClient::from_config(&config.server);
        let log = EventLog::from_config(&config.logging);
        Self::with_client(config, client, log)
    }

    /// Dashboard over an arbitrary client (tests use a recording transport).
    pub fn with_client(config: DashConfig, client: ApiClient, log: EventLog) -> Self {
        let state = AppState::new(&config.display).shared();
        let dispatcher = Dispatcher::new(
            client.clone(),
            state.clone(),
            log.clone(),
            config.writer.master_dataset.clone(),
        );
        let pollers = Source::ALL
            .into_iter()
            .map(|source| {
                Poller::new(
                    source,
                    client.clone(),
                    state.clone(),
                    config.polling.max_in_flight,
                    log.clone(),
                )
            })
            .collect();

        Self {
            config,
            client,
            state,
            log,
            dispatcher,
            pollers,
        }
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn poller(&self, source: Source) -> &Poller {
        // `pollers` is built from `Source::ALL`, one per source, in order.
        &self.pollers[Source::ALL
            .iter()
            .position(|s| *s == source)
            .unwrap_or_default()]
    }

    /// One-shot fetches run once at start: system info and acquisition, then
    /// the home route, whose entry fetches the API version and adapters.
    pub fn startup(&self) {
        let _ = self.poll_once(Source::System);
        let _ = self.poll_once(Source::Acquisition);
        self.navigate("");
    }

    /// Re-fetch the home page's version and adapter fields. Failures leave
    /// the previous values.
    pub fn refresh_home(&self) {
        if let Ok(version) = self.client.api_version() {
            render::render_version(&mut state::lock(&self.state), &version);
        }
        if let Ok(adapters) = self.client.adapters() {
            render::render_adapters(&mut state::lock(&self.state), &adapters);
        }
    }

    /// Apply a fragment change.
    pub fn navigate(&self, fragment: &str) -> RouteOutcome {
        let route = Route::parse(fragment);
        let outcome = {
            let mut st = state::lock(&self.state);
            let base_title = st.base_title.clone();
            let outcome = router::apply(&route, &mut st.document, &base_title);
            st.current_page = outcome.page.clone();
            outcome
        };

        let mut entry = EventEntry::new(EventKind::Navigation, outcome.page.clone());
        if !outcome.matched {
            entry = entry.failed("no such page");
        }
        self.log.record(entry);

        if outcome.entered_home {
            self.refresh_home();
        }
        outcome
    }

    /// Fetch and render one source now.
    pub fn poll_once(&self, source: Source) -> Option<PollOutcome> {
        self.poller(source).poll_once()
    }

    /// Start the repeating pollers. They share sequence guards with
    /// [`poll_once`](Self::poll_once).
    pub fn start_polling(&self) -> std::io::Result<Vec<JoinHandle<()>>> {
        self.pollers
            .iter()
            .map(|p| p.clone().spawn(p.source().interval(&self.config.polling)))
            .collect()
    }

    pub fn handle_event(&self, event: &UiEvent) -> Result<WorkflowReport> {
        self.dispatcher.dispatch(event)
    }

    /// Take pending alerts.
    pub fn drain_alerts(&self) -> Vec<String> {
        state::lock(&self.state).drain_alerts()
    }
}
