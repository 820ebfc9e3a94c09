/// Typed records for each control-server endpoint.
///
/// Every poll deserializes into one of these; a payload that does not match
/// fails to decode and the corresponding display update is skipped. Leaves
/// the server may legitimately report as `null` are optional, so one unset
/// value never costs the rest of a snapshot.
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Shared shapes
// ---------------------------------------------------------------------------

/// A parameter-tree leaf as exposed by the Aravis adapter: `{ "value": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param<T> {
    pub value: T,
}

impl Param<Option<String>> {
    /// The text, or empty while the server reports `null`.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

impl Param<Option<f64>> {
    pub fn display(&self) -> String {
        self.value.map(format_number).unwrap_or_default()
    }
}

impl Param<Option<i64>> {
    pub fn display(&self) -> String {
        self.value.map(|v| v.to_string()).unwrap_or_default()
    }
}

/// A boolean-ish flag.
///
/// Writers report `connected` as `true`, `"true"`, `1` or similar depending on
/// the frame-processor version, so any JSON value is accepted and reduced
/// with [`is_truthy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Flag(pub bool);

impl From<Value> for Flag {
    fn from(value: Value) -> Self {
        Flag(is_truthy(&value))
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Flag(value)
    }
}

/// Truthiness used for flags and LEDs.
///
/// Off: `false`, `null`, zero, `""`, `"0"`, `"false"`. Everything else is on.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
        }
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ---------------------------------------------------------------------------
// GET /api, GET /api/{v}/adapters/
// ---------------------------------------------------------------------------

/// `GET /api` → `{ "api": "0.1" }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiVersion {
    #[serde(deserialize_with = "version_string")]
    pub api: String,
}

/// odin-control reports the version as a JSON number on older releases.
fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected version string, got {other}"
        ))),
    }
}

/// `GET /api/{v}/adapters/` → `{ "adapters": [...] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdapterList {
    pub adapters: Vec<String>,
}

// ---------------------------------------------------------------------------
// GET /api/{v}/aravis
// ---------------------------------------------------------------------------

/// Full acquisition snapshot: status and config trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AravisSnapshot {
    pub status: AravisStatus,
    pub config: AravisConfig,
}

/// `pixel_format` stays `null` until the frame processor has answered;
/// the camera leaves are `null` while no camera is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AravisStatus {
    pub camera_id: Param<Option<String>>,
    pub streaming: Param<Flag>,
    pub frames_captured: Param<Option<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AravisConfig {
    pub exposure_time: Param<Option<f64>>,
    pub frame_rate: Param<Option<f64>>,
    pub frame_count: Param<Option<f64>>,
    pub mode: Param<Option<String>>,
    pub pixel_format: Param<Option<String>>,
}

// ---------------------------------------------------------------------------
// GET /api/{v}/sys
// ---------------------------------------------------------------------------

/// Server metadata from the system-info adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub odin_version: String,
    pub server_uptime: f64,
    pub platform: Platform,
    pub python_version: String,
    pub tornado_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub system: String,
    pub processor: String,
    pub release: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// GET /api/{v}/fp/status/
// ---------------------------------------------------------------------------

/// `{ "value": [ WriterStatus, ... ] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WriterStatusList {
    pub value: Vec<WriterStatus>,
}

/// One frame-processor (writer) process.
///
/// `shared_memory` and `hdf` are only populated by the server while the
/// process is connected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriterStatus {
    #[serde(default)]
    pub connected: Flag,
    #[serde(default)]
    pub shared_memory: Option<SharedMemoryStatus>,
    #[serde(default)]
    pub hdf: Option<HdfStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedMemoryStatus {
    #[serde(default)]
    pub configured: Flag,
}

/// A writer part-way through connecting reports only some of these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdfStatus {
    pub processes: i64,
    pub rank: i64,
    pub frames_written: i64,
    pub frames_max: i64,
    pub file_name: String,
    pub writing: Flag,
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Format a number the way the dashboard shows it: integral values without
/// a fractional part (`5000`, not `5000.0`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
