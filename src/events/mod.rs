use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::expand_home;
use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Event log entry (JSONL)
// ---------------------------------------------------------------------------

/// What kind of thing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// One write sent to the control server.
    Command,
    /// A poll source went from healthy to failing.
    PollFailing,
    /// A poll source recovered.
    PollRecovered,
    /// The view router switched pages.
    Navigation,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::PollFailing => write!(f, "poll-failing"),
            Self::PollRecovered => write!(f, "poll-recovered"),
            Self::Navigation => write!(f, "navigation"),
        }
    }
}

/// A single entry in the structured event log (`~/.arvdash/events.jsonl`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    pub timestamp: String,
    pub kind: EventKind,
    /// Request path, poll source or page, depending on `kind`.
    pub target: String,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl EventEntry {
    pub fn new(kind: EventKind, target: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            kind,
            target: target.into(),
            success: true,
            error: None,
            latency_ms: None,
        }
    }

    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }
}

// ---------------------------------------------------------------------------
// Event log handle
// ---------------------------------------------------------------------------

/// Append-only JSONL event log.
///
/// Writes are best-effort: an unwritable log never interrupts polling or
/// command dispatch. Cloning shares the write lock so lines from different
/// threads never interleave.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: Option<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl EventLog {
    /// Build from the `[logging]` section. Disabled logging yields a no-op log.
    pub fn from_config(config: &LoggingConfig) -> Self {
        if config.enabled {
            Self::at(expand_home(&config.path))
        } else {
            Self::disabled()
        }
    }

    /// Log to a specific file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// A log that drops everything.
    pub fn disabled() -> Self {
        Self {
            path: None,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record an entry, ignoring I/O failures.
    pub fn record(&self, entry: EventEntry) {
        let _ = self.append(&entry);
    }

    fn append(&self, entry: &EventEntry) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Read all entries. Malformed lines are skipped; a missing file is empty.
    pub fn read_all(&self) -> Vec<EventEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<EventEntry>(&line).ok())
            .collect()
    }

    /// Read entries from the last `days` days (all entries when `None`).
    pub fn read_since_days(&self, days: Option<u32>) -> Vec<EventEntry> {
        let entries = self.read_all();

        let Some(days) = days else {
            return entries;
        };

        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339();

        entries
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
