/// Write commands and the workflows that send them.
///
/// A [`Command`] is one PUT. A [`Workflow`] is an ordered list of commands
/// run one after another, each waiting for the previous response. Sequential
/// workflows stop at the first failing step; independent ones send every
/// command regardless.
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::api::ApiClient;
use crate::api::error::ApiError;

/// Which part of the server a command talks to. Decides whether failures
/// are shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Acquisition,
    Writer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `PUT aravis/config/{field}`.
    Acquisition { field: &'static str, value: Value },
    /// `PUT fp/config/{path}`.
    WriterConfig { path: &'static str, value: Value },
    /// `PUT fp/command/{name}`.
    WriterCommand { name: &'static str },
}

impl Command {
    pub fn family(&self) -> Family {
        match self {
            Self::Acquisition { .. } => Family::Acquisition,
            Self::WriterConfig { .. } | Self::WriterCommand { .. } => Family::Writer,
        }
    }

    /// Path relative to the versioned API prefix.
    pub fn path(&self) -> String {
        match self {
            Self::Acquisition { field, .. } => format!("aravis/config/{field}"),
            Self::WriterConfig { path, .. } => format!("fp/config/{path}"),
            Self::WriterCommand { name } => format!("fp/command/{name}"),
        }
    }

    pub fn send(&self, client: &ApiClient) -> Result<Value, ApiError> {
        match self {
            Self::Acquisition { field, value } => client.set_acquisition_config(field, value),
            Self::WriterConfig { path, value } => client.set_writer_config(path, value),
            Self::WriterCommand { name } => client.writer_command(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum StepOutcome {
    Ok,
    Failed(String),
    /// Not sent because an earlier step failed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub path: String,
    pub family: Family,
    pub outcome: StepOutcome,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowReport {
    pub name: String,
    pub steps: Vec<StepReport>,
}

impl WorkflowReport {
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.outcome == StepOutcome::Ok)
    }

    /// The first step that failed, if any.
    pub fn first_failure(&self) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|s| matches!(s.outcome, StepOutcome::Failed(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&StepReport, &str)> {
        self.steps.iter().filter_map(|s| match &s.outcome {
            StepOutcome::Failed(msg) => Some((s, msg.as_str())),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    name: &'static str,
    commands: Vec<Command>,
    halt_on_failure: bool,
}

impl Workflow {
    /// Stop at the first failing command.
    pub fn sequential(name: &'static str, commands: Vec<Command>) -> Self {
        Self {
            name,
            commands,
            halt_on_failure: true,
        }
    }

    /// Send every command whatever happens to the others.
    pub fn independent(name: &'static str, commands: Vec<Command>) -> Self {
        Self {
            name,
            commands,
            halt_on_failure: false,
        }
    }

    pub fn single(name: &'static str, command: Command) -> Self {
        Self::sequential(name, vec![command])
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Run the commands in order. `on_step` sees each step as it completes
    /// together with the server's raw error, if any.
    pub fn run(
        &self,
        client: &ApiClient,
        mut on_step: impl FnMut(&StepReport, Option<&ApiError>),
    ) -> WorkflowReport {
        let mut report = WorkflowReport {
            name: self.name.to_string(),
            steps: Vec::with_capacity(self.commands.len()),
        };
        let mut halted = false;

        for command in &self.commands {
            if halted {
                report.steps.push(StepReport {
                    path: command.path(),
                    family: command.family(),
                    outcome: StepOutcome::Skipped,
                    latency_ms: 0,
                });
                continue;
            }

            let start = Instant::now();
            let result = command.send(client);
            let latency_ms = start.elapsed().as_millis() as u64;

            let error = result.err();
            let step = StepReport {
                path: command.path(),
                family: command.family(),
                outcome: match &error {
                    None => StepOutcome::Ok,
                    Some(err) => StepOutcome::Failed(err.server_message().to_string()),
                },
                latency_ms,
            };
            on_step(&step, error.as_ref());
            halted = error.is_some() && self.halt_on_failure;
            report.steps.push(step);
        }

        report
    }
}
