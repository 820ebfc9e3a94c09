/// Application state owned by the dashboard controller.
///
/// One [`AppState`] sits behind a mutex ([`SharedState`]). Pollers, the
/// command dispatcher and the view router all take the lock only to render
/// or to queue alerts; no network call happens while it is held.
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;

use super::document::Document;
use super::led::LedStyle;
use super::router::HOME_PAGE;
use crate::api::types::{AravisSnapshot, SystemInfo, WriterStatus};
use crate::config::schema::DisplayConfig;

pub type SharedState = Arc<Mutex<AppState>>;

/// Alerts kept while no browser is draining them.
pub const MAX_ALERTS: usize = 50;

/// Lock the shared state, recovering from a poisoned mutex (a panicking
/// render must not take the whole dashboard down).
pub fn lock(state: &SharedState) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Poll health for one data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceHealth {
    pub last_success: Option<String>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

impl SourceHealth {
    pub fn is_failing(&self) -> bool {
        self.consecutive_failures > 0
    }

    /// Record a successful poll. Returns `true` if this ends a failure streak.
    pub fn record_success(&mut self) -> bool {
        let recovered = self.is_failing();
        self.consecutive_failures = 0;
        self.last_error = None;
        self.last_success = Some(Utc::now().to_rfc3339());
        recovered
    }

    /// Record a failed poll. Returns `true` if this starts a failure streak.
    pub fn record_failure(&mut self, error: impl Into<String>) -> bool {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error.into());
        self.consecutive_failures == 1
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub document: Document,
    pub current_page: String,
    pub base_title: String,
    pub led: LedStyle,
    /// Version reported by `GET /api` (display only; requests use the configured one).
    pub api_version: Option<String>,
    pub system: Option<SystemInfo>,
    pub acquisition: Option<AravisSnapshot>,
    pub writers: Vec<WriterStatus>,
    pub health: BTreeMap<&'static str, SourceHealth>,
    alerts: VecDeque<String>,
}

impl AppState {
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            document: Document::dashboard(&display.title),
            current_page: HOME_PAGE.to_string(),
            base_title: display.title.clone(),
            led: LedStyle {
                colour: display.led_colour.clone(),
                width: display.led_width,
            },
            api_version: None,
            system: None,
            acquisition: None,
            writers: Vec::new(),
            health: BTreeMap::new(),
            alerts: VecDeque::new(),
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }

    pub fn health_mut(&mut self, source: &'static str) -> &mut SourceHealth {
        self.health.entry(source).or_default()
    }

    /// Queue a user-facing alert. Only the newest [`MAX_ALERTS`] are kept
    /// while nobody drains the queue.
    pub fn push_alert(&mut self, message: impl Into<String>) {
        while self.alerts.len() >= MAX_ALERTS {
            self.alerts.pop_front();
        }
        self.alerts.push_back(message.into());
    }

    /// Alerts not yet shown.
    pub fn pending_alerts(&self) -> impl Iterator<Item = &str> {
        self.alerts.iter().map(String::as_str)
    }

    /// Take every queued alert, oldest first.
    pub fn drain_alerts(&mut self) -> Vec<String> {
        self.alerts.drain(..).collect()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&DisplayConfig::default())
    }
}
