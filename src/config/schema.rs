/// Configuration schema and defaults for arvdash.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[server]`, `[polling]`, `[web]`, `[display]`, `[writer]` and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values they
/// want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level arvdash configuration.
///
/// Maps directly to the `~/.arvdash/config.toml` and `.arvdash.toml` file
/// schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub server: ServerConfig,
    pub polling: PollingConfig,
    pub web: WebConfig,
    pub display: DisplayConfig,
    pub writer: WriterConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Where the odin-control server lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the control server (no `/api` suffix).
    pub url: String,
    /// API version segment used in every request path.
    pub api_version: String,
    /// Per-request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8888".to_string(),
            api_version: "0.1".to_string(),
            timeout_ms: 5000,
        }
    }
}

// ---------------------------------------------------------------------------
// [polling]
// ---------------------------------------------------------------------------

/// Poll intervals per data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Server metadata (`sys`).
    pub system_ms: u64,
    /// Camera status and config (`aravis`).
    pub acquisition_ms: u64,
    /// Frame-processor writers (`fp/status`).
    pub writers_ms: u64,
    /// Requests allowed in flight per source; ticks beyond this are skipped.
    pub max_in_flight: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            system_ms: 1000,
            acquisition_ms: 200,
            writers_ms: 500,
            max_in_flight: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Embedded dashboard server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `arvdash serve`.
    pub listen: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:9750".to_string(),
            open_browser: false,
        }
    }
}

// ---------------------------------------------------------------------------
// [display]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Base document title; the active page is appended in parentheses.
    pub title: String,
    /// Colour of lit status LEDs.
    pub led_colour: String,
    /// LED icon width in pixels.
    pub led_width: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Aravis".to_string(),
            led_colour: "green".to_string(),
            led_width: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// [writer]
// ---------------------------------------------------------------------------

/// File-writer defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Dataset the writer is pointed at before writing is enabled.
    pub master_dataset: String,
    /// Directory used by `arvdash writer start` when `--path` is omitted.
    pub default_path: String,
    /// Frame count used by `arvdash writer start` when `--frames` is omitted.
    pub default_frames: i64,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            master_dataset: "data".to_string(),
            default_path: "/tmp".to_string(),
            default_frames: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Structured event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether events are appended to the JSONL log.
    pub enabled: bool,
    /// Path to the event log. A leading `~/` expands to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.arvdash/events.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl DashConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `arvdash config init`.
    pub fn default_toml() -> String {
        r#"# arvdash Configuration
# Dashboard for the Aravis camera / frame-processor control server
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (ARVDASH_*)
#   2. Project config (.arvdash.toml in current directory)
#   3. User global config (~/.arvdash/config.toml)
#   4. Built-in defaults

[server]
url = "http://127.0.0.1:8888"   # odin-control base URL
api_version = "0.1"
timeout_ms = 5000

[polling]
system_ms = 1000                # server metadata
acquisition_ms = 200            # camera status + config
writers_ms = 500                # frame-processor writers
max_in_flight = 2               # per source; extra ticks are skipped

[web]
listen = "127.0.0.1:9750"
open_browser = false

[display]
title = "Aravis"
led_colour = "green"            # green | red | yellow | blue | orange
led_width = 20

[writer]
master_dataset = "data"
default_path = "/tmp"
default_frames = 100

[logging]
enabled = true
path = "~/.arvdash/events.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
