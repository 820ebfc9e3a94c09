/// Command dispatcher.
///
/// Translates a dashboard input event into the writes it implies and sends
/// them through [`workflow::Workflow`]:
///
/// | Event                   | Writes                                                      |
/// |-------------------------|-------------------------------------------------------------|
/// | exposure change         | `aravis/config/exposure_time`                               |
/// | mode selection          | `aravis/config/mode` (selector index → label)               |
/// | frame-count change      | `aravis/config/frame_count`                                 |
/// | start / stop            | `aravis/config/start_acquisition` / `stop_acquisition` ← 1  |
/// | writer parameter change | `fp/config/hdf/frames`, `hdf/file/path`, `hdf/file/name`    |
/// | writer start            | `fp/command/reset_statistics`, `hdf/master`, `hdf/write` ← 1 |
/// | writer stop             | `fp/config/hdf/write` ← 0                                   |
///
/// Writer failures raise a `FAILED: {error}` alert on the shared state.
/// Acquisition failures raise no alert; like every step they are written to
/// the event log.
pub mod workflow;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};

pub use workflow::{Command, Family, StepOutcome, StepReport, Workflow, WorkflowReport};

use crate::api::ApiClient;
use crate::api::mode::AcquisitionMode;
use crate::events::{EventEntry, EventKind, EventLog};
use crate::ui::state::{self, SharedState};

/// A user interaction on the dashboard.
///
/// Input values arrive as the raw text of the field, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    ExposureChanged { value: String },
    ModeSelected { index: usize },
    FrameCountChanged { value: String },
    StartAcquisition,
    StopAcquisition,
    WriterParamsChanged {
        frames: String,
        path: String,
        file_name: String,
    },
    WriterStart,
    WriterStop,
}

/// Sends the writes for each [`UiEvent`] and reports the outcome.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: ApiClient,
    state: SharedState,
    log: EventLog,
    master_dataset: String,
}

impl Dispatcher {
    pub fn new(
        client: ApiClient,
        state: SharedState,
        log: EventLog,
        master_dataset: impl Into<String>,
    ) -> Self {
        Self {
            client,
            state,
            log,
            master_dataset: master_dataset.into(),
        }
    }

    /// Build the workflow for an event without sending anything.
    ///
    /// Fails on input that cannot be sent (non-numeric exposure, unknown
    /// mode index, ...).
    pub fn workflow_for(&self, event: &UiEvent) -> Result<Workflow> {
        let workflow = match event {
            UiEvent::ExposureChanged { value } => Workflow::single(
                "exposure",
                Command::Acquisition {
                    field: "exposure_time",
                    value: parse_number(value).context("invalid exposure time")?,
                },
            ),
            UiEvent::ModeSelected { index } => {
                let mode = AcquisitionMode::from_index(*index)
                    .with_context(|| format!("no acquisition mode at index {index}"))?;
                Workflow::single(
                    "mode",
                    Command::Acquisition {
                        field: "mode",
                        value: json!(mode.label()),
                    },
                )
            }
            UiEvent::FrameCountChanged { value } => Workflow::single(
                "frame-count",
                Command::Acquisition {
                    field: "frame_count",
                    value: parse_number(value).context("invalid frame count")?,
                },
            ),
            UiEvent::StartAcquisition => Workflow::single(
                "start-acquisition",
                Command::Acquisition {
                    field: "start_acquisition",
                    value: json!(1),
                },
            ),
            UiEvent::StopAcquisition => Workflow::single(
                "stop-acquisition",
                Command::Acquisition {
                    field: "stop_acquisition",
                    value: json!(1),
                },
            ),
            UiEvent::WriterParamsChanged {
                frames,
                path,
                file_name,
            } => Workflow::independent(
                "writer-params",
                vec![
                    Command::WriterConfig {
                        path: "hdf/frames",
                        value: writer_frames(frames),
                    },
                    Command::WriterConfig {
                        path: "hdf/file/path",
                        value: json!(path),
                    },
                    Command::WriterConfig {
                        path: "hdf/file/name",
                        value: json!(file_name),
                    },
                ],
            ),
            UiEvent::WriterStart => Workflow::sequential(
                "writer-start",
                vec![
                    Command::WriterCommand {
                        name: "reset_statistics",
                    },
                    Command::WriterConfig {
                        path: "hdf/master",
                        value: json!(self.master_dataset),
                    },
                    Command::WriterConfig {
                        path: "hdf/write",
                        value: json!(1),
                    },
                ],
            ),
            UiEvent::WriterStop => Workflow::single(
                "writer-stop",
                Command::WriterConfig {
                    path: "hdf/write",
                    value: json!(0),
                },
            ),
        };
        Ok(workflow)
    }

    /// Send the writes for `event`.
    ///
    /// Returns `Err` only for unsendable input; server failures are reported
    /// per step in the [`WorkflowReport`].
    pub fn dispatch(&self, event: &UiEvent) -> Result<WorkflowReport> {
        let workflow = self.workflow_for(event)?;
        Ok(self.run(&workflow))
    }

    /// Run a prepared workflow, logging each step and alerting on writer
    /// failures.
    pub fn run(&self, workflow: &Workflow) -> WorkflowReport {
        workflow.run(&self.client, |step, error| {
            let target = self.client.endpoint(&step.path);
            let mut entry = EventEntry::new(EventKind::Command, target).with_latency(step.latency_ms);
            if let Some(err) = error {
                entry = entry.failed(err.to_string());
                if step.family == Family::Writer {
                    state::lock(&self.state).push_alert(format!("FAILED: {}", err.server_message()));
                }
            }
            self.log.record(entry);
        })
    }
}

/// Parse an input field as a JSON number. Integral values are sent without
/// a fractional part.
fn parse_number(raw: &str) -> Result<Value> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("'{raw}' is not a number"))?;
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        return Ok(json!(value as i64));
    }
    Number::from_f64(value)
        .map(Value::Number)
        .with_context(|| format!("'{raw}' is not a finite number"))
}

/// Writer frame count: an integer when the field holds one, otherwise the
/// text as typed, left for the writer to accept or refuse.
fn writer_frames(raw: &str) -> Value {
    match raw.trim().parse::<i64>() {
        Ok(frames) => json!(frames),
        Err(_) => json!(raw),
    }
}
