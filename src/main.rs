use anyhow::Result;
use clap::{Parser, Subcommand};

use arvdash::api::AcquisitionMode;
use arvdash::cli::{self, AcquireAction, OutputFormat, WriterParams};
use arvdash::config;

#[derive(Debug, Parser)]
#[command(name = "arvdash")]
#[command(about = "Dashboard and command line for an Aravis camera and its file writers")]
struct App {
    /// Control server base URL (overrides config)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pollers and serve the web dashboard
    Serve {
        /// Listen address (default from [web].listen)
        #[arg(long)]
        listen: Option<String>,
    },
    /// Show server, platform and camera status once
    Status {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show file-writer status once
    Writers {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// GET a path under the API prefix, e.g. `aravis/config/exposure_time`
    Get { path: String },
    /// PUT a value (JSON if it parses, else a string) and read it back
    Set { path: String, value: String },
    /// Camera acquisition commands
    Acquire {
        #[command(subcommand)]
        action: AcquireCommand,
    },
    /// File-writer commands
    Writer {
        #[command(subcommand)]
        action: WriterCommand,
    },
    /// Show the event log
    Log {
        /// Only include the last N days
        #[arg(long)]
        days: Option<u32>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum AcquireCommand {
    /// Start acquisition
    Start,
    /// Stop acquisition
    Stop,
    /// Set the acquisition mode (SingleFrame, MultiFrame, Continuous)
    Mode { mode: AcquisitionMode },
    /// Set the exposure time
    Exposure { value: String },
    /// Set the frame count
    Frames { value: String },
}

#[derive(Debug, Subcommand)]
enum WriterCommand {
    /// Send capture parameters, reset statistics and start writing
    Start {
        /// Frames to write (default from [writer].default_frames)
        #[arg(long)]
        frames: Option<i64>,
        /// Output directory (default from [writer].default_path)
        #[arg(long)]
        path: Option<String>,
        /// File name (default run_<timestamp>)
        #[arg(long)]
        name: Option<String>,
    },
    /// Stop writing
    Stop,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a default ~/.arvdash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `polling.acquisition_ms 500`
    Set { key: String, value: String },
    /// Restore ~/.arvdash/config.toml to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    let mut cfg = config::load();
    if let Some(server) = app.server {
        cfg.server.url = server;
    }

    match app.command {
        Commands::Serve { listen } => cli::run_serve(cfg, listen),
        Commands::Status { format } => {
            cli::run_status(&cfg, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Writers { format } => {
            cli::run_writers(&cfg, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Get { path } => cli::run_get(&cfg, &path),
        Commands::Set { path, value } => cli::run_set(&cfg, &path, &value),
        Commands::Acquire { action } => {
            let action = match action {
                AcquireCommand::Start => AcquireAction::Start,
                AcquireCommand::Stop => AcquireAction::Stop,
                AcquireCommand::Mode { mode } => AcquireAction::Mode(mode),
                AcquireCommand::Exposure { value } => AcquireAction::Exposure(value),
                AcquireCommand::Frames { value } => AcquireAction::Frames(value),
            };
            cli::run_acquire(cfg, action)
        }
        Commands::Writer { action } => match action {
            WriterCommand::Start { frames, path, name } => {
                cli::run_writer_start(cfg, WriterParams { frames, path, name })
            }
            WriterCommand::Stop => cli::run_writer_stop(cfg),
        },
        Commands::Log { days, format } => {
            cli::run_log(&cfg, days, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Config { action } => match action {
            ConfigCommand::Show => cli::run_config_show(),
            ConfigCommand::Init { force } => cli::run_config_init(force),
            ConfigCommand::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigCommand::Reset => cli::run_config_reset(),
        },
    }
}
