//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `arvdash serve`: pollers plus the web dashboard
//! - `arvdash status`: one-shot system and camera summary
//! - `arvdash writers`: one-shot file-writer table
//! - `arvdash get|set`: raw parameter access under the API prefix
//! - `arvdash acquire ...` / `arvdash writer ...`: send dashboard commands
//! - `arvdash log`: recent event-log entries
//! - `arvdash config show|init|set|reset`: configuration management

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::{ApiVersion, AravisSnapshot, SystemInfo, WriterStatus, format_number};
use crate::api::{AcquisitionMode, ApiClient};
use crate::app::Dashboard;
use crate::config::{self, DashConfig};
use crate::control::{StepOutcome, UiEvent, WorkflowReport};
use crate::events::{EventEntry, EventLog};
use crate::web;

/// Output format for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// arvdash serve
// ---------------------------------------------------------------------------

/// Start pollers and serve the dashboard until interrupted.
pub fn run_serve(config: DashConfig, listen: Option<String>) -> Result<()> {
    let addr = listen.unwrap_or_else(|| config.web.listen.clone());
    let open = config.web.open_browser;
    let dashboard = Dashboard::from_config(config);

    dashboard.startup();
    dashboard
        .start_polling()
        .context("failed to start pollers")?;

    web::serve(&dashboard, &addr, open)
}

// ---------------------------------------------------------------------------
// arvdash status
// ---------------------------------------------------------------------------

/// One-shot summary of the control server and camera.
pub fn run_status(config: &DashConfig, format: OutputFormat) -> Result<()> {
    let client = ApiClient::from_config(&config.server);

    let version = client.api_version();
    let system = client.system();
    let acquisition = client.acquisition();

    if format == OutputFormat::Json {
        let value = status_json(&config.server.url, &version, &system, &acquisition);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", format!("arvdash status: {}", config.server.url).bold().cyan());
    println!("{}", "=".repeat(50));

    match &version {
        Ok(v) => print_item("API version", true, &v.api),
        Err(e) => print_item("API version", false, &e.to_string()),
    }

    match &system {
        Ok(info) => print_system(info),
        Err(e) => print_item("System", false, &e.to_string()),
    }

    println!();
    match &acquisition {
        Ok(snap) => print_acquisition(snap),
        Err(e) => print_item("Camera", false, &e.to_string()),
    }

    Ok(())
}

/// `arvdash status --format json`: whatever was read, plus one message per
/// failed read.
fn status_json(
    server: &str,
    version: &Result<ApiVersion, ApiError>,
    system: &Result<SystemInfo, ApiError>,
    acquisition: &Result<AravisSnapshot, ApiError>,
) -> serde_json::Value {
    let errors: Vec<String> = [
        version.as_ref().err(),
        system.as_ref().err(),
        acquisition.as_ref().err(),
    ]
    .into_iter()
    .flatten()
    .map(ToString::to_string)
    .collect();

    serde_json::json!({
        "server": server,
        "api_version": version.as_ref().ok().map(|v| v.api.clone()),
        "system": system.as_ref().ok(),
        "acquisition": acquisition.as_ref().ok(),
        "errors": errors,
    })
}

fn print_system(info: &SystemInfo) {
    print_item("odin-control", true, &info.odin_version);
    print_item(
        "Up time",
        true,
        &format!("{} s", format_number(info.server_uptime)),
    );
    print_item(
        "Platform",
        true,
        &format!(
            "{} {} ({})",
            info.platform.system, info.platform.release, info.platform.processor
        ),
    );
    print_item(
        "Python / Tornado",
        true,
        &format!("{} / {}", info.python_version, info.tornado_version),
    );
}

fn print_acquisition(snap: &AravisSnapshot) {
    let status = &snap.status;
    let cfg = &snap.config;
    println!("{}", "Camera".bold().cyan());
    print_item(
        "Camera",
        status.camera_id.value.is_some(),
        status.camera_id.value.as_deref().unwrap_or("not connected"),
    );
    print_item(
        "Acquiring",
        status.streaming.value.0,
        if status.streaming.value.0 { "yes" } else { "no" },
    );
    println!("  {:<27} {}", "Frames captured", status.frames_captured.display());
    println!("  {:<27} {}", "Exposure time", cfg.exposure_time.display());
    println!("  {:<27} {}", "Frame rate", cfg.frame_rate.display());
    println!("  {:<27} {}", "Frame count", cfg.frame_count.display());
    println!("  {:<27} {}", "Mode", cfg.mode.text());
    println!("  {:<27} {}", "Pixel format", cfg.pixel_format.text());
}

// ---------------------------------------------------------------------------
// arvdash writers
// ---------------------------------------------------------------------------

/// One-shot table of file-writer status.
pub fn run_writers(config: &DashConfig, format: OutputFormat) -> Result<()> {
    let client = ApiClient::from_config(&config.server);
    let writers = client
        .writer_status()
        .with_context(|| format!("failed to read writer status from {}", config.server.url))?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&writers)?);
        return Ok(());
    }

    if writers.is_empty() {
        println!("{}", "No writers reported.".yellow());
        return Ok(());
    }

    println!("{}", "File Writers".bold().cyan());
    println!("{}", "=".repeat(72));
    println!(
        "  {:<5} {:<10} {:<8} {:>5} {:>5} {:>12} {:<8} File",
        "", "Connected", "ShMem", "Procs", "Rank", "Written", "Writing"
    );
    println!("  {}", "-".repeat(70));
    for (i, writer) in writers.iter().enumerate() {
        println!("{}", writer_row(i, writer));
    }

    Ok(())
}

fn writer_row(index: usize, writer: &WriterStatus) -> String {
    let name = format!("fp{}", index + 1);
    let connected = tick(writer.connected.0);
    match (&writer.hdf, writer.connected.0) {
        (Some(hdf), true) => {
            let shm = writer
                .shared_memory
                .as_ref()
                .map(|s| s.configured.0)
                .unwrap_or_default();
            format!(
                "  {:<5} {:<10} {:<8} {:>5} {:>5} {:>12} {:<8} {}",
                name,
                connected,
                tick(shm),
                hdf.processes,
                hdf.rank,
                format!("{} / {}", hdf.frames_written, hdf.frames_max),
                tick(hdf.writing.0),
                hdf.file_name,
            )
        }
        _ => format!("  {:<5} {:<10}", name, connected),
    }
}

fn tick(on: bool) -> String {
    if on {
        "✓".green().bold().to_string()
    } else {
        "✗".red().bold().to_string()
    }
}

// ---------------------------------------------------------------------------
// arvdash get | set
// ---------------------------------------------------------------------------

/// GET a path under the API prefix and print the JSON.
pub fn run_get(config: &DashConfig, path: &str) -> Result<()> {
    let client = ApiClient::from_config(&config.server);
    let value = client
        .get_value(path.trim_start_matches('/'))
        .with_context(|| format!("GET {} failed", client.endpoint(path.trim_start_matches('/'))))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// PUT a value, then read the path back.
pub fn run_set(config: &DashConfig, path: &str, raw: &str) -> Result<()> {
    let client = ApiClient::from_config(&config.server);
    let path = path.trim_start_matches('/');
    let value = parse_cli_value(raw);

    client
        .put_value(path, &value)
        .with_context(|| format!("PUT {} failed", client.endpoint(path)))?;
    println!("{} {} = {}", "✓".green().bold(), path, value);

    match client.get_value(path) {
        Ok(readback) => println!(
            "  {} {}",
            "now:".dimmed(),
            serde_json::to_string(&readback)?
        ),
        Err(e) => println!("  {} {}", "readback failed:".yellow(), e),
    }
    Ok(())
}

/// A command-line value as JSON when it parses, otherwise as a string.
pub fn parse_cli_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

// ---------------------------------------------------------------------------
// arvdash acquire | writer
// ---------------------------------------------------------------------------

/// Camera commands accepted by `arvdash acquire`.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquireAction {
    Start,
    Stop,
    Mode(AcquisitionMode),
    Exposure(String),
    Frames(String),
}

impl AcquireAction {
    pub fn event(&self) -> UiEvent {
        match self {
            Self::Start => UiEvent::StartAcquisition,
            Self::Stop => UiEvent::StopAcquisition,
            Self::Mode(mode) => UiEvent::ModeSelected {
                index: mode.index(),
            },
            Self::Exposure(value) => UiEvent::ExposureChanged {
                value: value.clone(),
            },
            Self::Frames(value) => UiEvent::FrameCountChanged {
                value: value.clone(),
            },
        }
    }
}

pub fn run_acquire(config: DashConfig, action: AcquireAction) -> Result<()> {
    let dashboard = Dashboard::from_config(config);
    let report = dashboard.handle_event(&action.event())?;
    finish(&report)
}

/// Parameters for `arvdash writer start`. Missing values come from `[writer]`.
#[derive(Debug, Clone, Default)]
pub struct WriterParams {
    pub frames: Option<i64>,
    pub path: Option<String>,
    pub name: Option<String>,
}

impl WriterParams {
    pub fn event(&self, config: &DashConfig) -> UiEvent {
        UiEvent::WriterParamsChanged {
            frames: self
                .frames
                .unwrap_or(config.writer.default_frames)
                .to_string(),
            path: self
                .path
                .clone()
                .unwrap_or_else(|| config.writer.default_path.clone()),
            file_name: self.name.clone().unwrap_or_else(default_run_name),
        }
    }
}

/// `run_YYYYMMDD_HHMMSS` in local time.
pub fn default_run_name() -> String {
    format!("run_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// Send writer parameters then start writing. Nothing is started if any
/// parameter write fails.
pub fn run_writer_start(config: DashConfig, params: WriterParams) -> Result<()> {
    let event = params.event(&config);
    let dashboard = Dashboard::from_config(config);

    let report = dashboard.handle_event(&event)?;
    print_report(&report);
    if !report.succeeded() {
        anyhow::bail!("writer parameters rejected; not starting");
    }

    let report = dashboard.handle_event(&UiEvent::WriterStart)?;
    finish(&report)
}

pub fn run_writer_stop(config: DashConfig) -> Result<()> {
    let dashboard = Dashboard::from_config(config);
    let report = dashboard.handle_event(&UiEvent::WriterStop)?;
    finish(&report)
}

fn finish(report: &WorkflowReport) -> Result<()> {
    print_report(report);
    if let Some(step) = report.first_failure() {
        anyhow::bail!("{} failed at {}", report.name, step.path);
    }
    Ok(())
}

fn print_report(report: &WorkflowReport) {
    for step in &report.steps {
        match &step.outcome {
            StepOutcome::Ok => println!(
                "  {} {:<35} {}",
                "✓".green().bold(),
                step.path,
                format!("{} ms", step.latency_ms).dimmed()
            ),
            StepOutcome::Failed(msg) => println!(
                "  {} {:<35} {}",
                "✗".red().bold(),
                step.path,
                format!("FAILED: {msg}").red()
            ),
            StepOutcome::Skipped => println!(
                "  {} {:<35} {}",
                "·".dimmed(),
                step.path,
                "skipped".dimmed()
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// arvdash log
// ---------------------------------------------------------------------------

/// Print recent event-log entries.
pub fn run_log(config: &DashConfig, days: Option<u32>, format: OutputFormat) -> Result<()> {
    let log = EventLog::from_config(&config.logging);
    let entries = log.read_since_days(days);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!(
            "{}",
            "No events logged yet. Run `arvdash serve` or send a command.".yellow()
        );
        return Ok(());
    }

    println!("{}", "arvdash Event Log".bold().cyan());
    println!("{}", "=".repeat(70));
    for (i, entry) in entries.iter().enumerate() {
        let line = log_line(entry);
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
    Ok(())
}

fn log_line(entry: &EventEntry) -> String {
    let time = chrono::DateTime::parse_from_rfc3339(&entry.timestamp)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| entry.timestamp.clone());
    let status = if entry.success { "ok" } else { "FAILED" };
    let mut line = format!("  {time}  {:<15} {:<6} {}", entry.kind.to_string(), status, entry.target);
    if let Some(ms) = entry.latency_ms {
        line.push_str(&format!(" ({ms} ms)"));
    }
    if let Some(err) = &entry.error {
        line.push_str(&format!(": {err}"));
    }
    line
}

// ---------------------------------------------------------------------------
// arvdash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;

    println!("{}", "Effective arvdash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.arvdash/config.toml", global_exists);
    print_source(".arvdash.toml", project_exists);
    println!("  {} ARVDASH_* environment variables", "·".dimmed());

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} wrote {}", "✓".green().bold(), path.display());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} {} = {}", "✓".green().bold(), key, value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} reset {} to defaults",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn print_item(name: &str, ok: bool, detail: &str) {
    println!("  {} {:<25} {}", tick(ok), name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Flag, HdfStatus};
    use crate::events::EventKind;
    use serde_json::json;

    #[test]
    fn output_format_parse() {
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("table")), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
    }

    #[test]
    fn cli_values_prefer_json() {
        assert_eq!(parse_cli_value("1500"), json!(1500));
        assert_eq!(parse_cli_value("true"), json!(true));
        assert_eq!(parse_cli_value("\"quoted\""), json!("quoted"));
        assert_eq!(parse_cli_value("Mono8"), json!("Mono8"));
        assert_eq!(parse_cli_value("/tmp/data"), json!("/tmp/data"));
    }

    #[test]
    fn acquire_actions_map_to_events() {
        assert_eq!(AcquireAction::Start.event(), UiEvent::StartAcquisition);
        assert_eq!(
            AcquireAction::Mode(AcquisitionMode::MultiFrame).event(),
            UiEvent::ModeSelected { index: 1 }
        );
        assert_eq!(
            AcquireAction::Exposure("2000".into()).event(),
            UiEvent::ExposureChanged {
                value: "2000".into()
            }
        );
    }

    #[test]
    fn status_json_lists_failed_reads() {
        let version: Result<ApiVersion, ApiError> = Ok(ApiVersion { api: "0.1".into() });
        let system: Result<SystemInfo, ApiError> = Err(ApiError::Transport("refused".into()));
        let acquisition: Result<AravisSnapshot, ApiError> = Err(ApiError::Status {
            status: 500,
            message: "camera gone".into(),
        });
        let value = status_json("http://cam:8888", &version, &system, &acquisition);
        assert_eq!(value["server"], "http://cam:8888");
        assert_eq!(value["api_version"], "0.1");
        assert!(value["system"].is_null());
        assert!(value["acquisition"].is_null());
        let errors = value["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].as_str().unwrap().contains("camera gone"));
    }

    #[test]
    fn writer_params_fall_back_to_config() {
        let config = DashConfig::default();
        let event = WriterParams {
            name: Some("scan".into()),
            ..Default::default()
        }
        .event(&config);
        assert_eq!(
            event,
            UiEvent::WriterParamsChanged {
                frames: "100".into(),
                path: "/tmp".into(),
                file_name: "scan".into(),
            }
        );
    }

    #[test]
    fn default_run_name_shape() {
        let name = default_run_name();
        assert!(name.starts_with("run_"));
        assert_eq!(name.len(), "run_20260101_120000".len());
    }

    #[test]
    fn disconnected_writer_row_is_short() {
        colored::control::set_override(false);
        let writer = WriterStatus {
            connected: Flag(false),
            shared_memory: None,
            hdf: Some(HdfStatus {
                processes: 1,
                rank: 0,
                frames_written: 5,
                frames_max: 10,
                file_name: "a.h5".into(),
                writing: Flag(true),
            }),
        };
        let row = writer_row(0, &writer);
        assert!(row.contains("fp1"));
        assert!(!row.contains("a.h5"));
    }

    #[test]
    fn log_line_includes_error() {
        let entry = EventEntry::new(EventKind::Command, "/api/0.1/fp/config/hdf/write")
            .failed("disk full")
            .with_latency(12);
        let line = log_line(&entry);
        assert!(line.contains("FAILED"));
        assert!(line.contains("disk full"));
        assert!(line.contains("12 ms"));
    }
}
