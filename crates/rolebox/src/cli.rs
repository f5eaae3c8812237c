//! CLI definition and dispatch
//!
//! Global flags plus one subcommand per workflow operation. Dispatch
//! initializes logging, loads the persisted settings once, and routes to
//! the command handlers with everything passed explicitly by reference.

use crate::commands;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rolebox_core::config::Settings;
use rolebox_core::docker::{Docker, RuntimeKind};
use rolebox_core::workspace::Workspace;
use std::path::PathBuf;

/// Log format options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Log level options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Informational messages and above
    Info,
    /// Debug messages and above
    Debug,
    /// All messages including trace
    Trace,
}

/// Runtime selection options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RuntimeOption {
    /// Docker runtime
    Docker,
    /// Podman runtime
    Podman,
}

impl From<RuntimeOption> for RuntimeKind {
    fn from(runtime: RuntimeOption) -> Self {
        match runtime {
            RuntimeOption::Docker => RuntimeKind::Docker,
            RuntimeOption::Podman => RuntimeKind::Podman,
        }
    }
}

/// Test infrastructure roles inside containers
#[derive(Debug, Parser)]
#[command(
    name = "rolebox",
    version,
    about = "Test infrastructure roles inside containers driven by an external engine"
)]
pub struct Cli {
    /// Log format (text or json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Log level
    #[arg(long, value_enum, global = true, default_value = "info")]
    pub log_level: LogLevel,

    /// Project workspace folder
    #[arg(long, global = true, default_value = ".")]
    pub workspace_folder: PathBuf,

    /// Container runtime to drive
    #[arg(long, value_enum, global = true)]
    pub runtime: Option<RuntimeOption>,

    #[command(subcommand)]
    pub command: Commands,
}

/// rolebox subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the scaffolding for a new role
    Setup {
        /// Base image to build the test image from
        #[arg(long, default_value = "rockylinux:9")]
        image: String,
        /// Name for the test image (defaults to <user>/<role>:latest)
        #[arg(long)]
        name: Option<String>,
    },

    /// Build the base image used for testing
    Create,

    /// Run the provisioner on a container using the base image
    Provision,

    /// Run the verifier on a container using the base image
    Verify,

    /// Remove the working image
    Destroy,

    /// Run the full workflow
    Test,

    /// Run a custom command inside the working image
    Run {
        /// Command to execute (defaults to /bin/bash)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

impl Cli {
    /// Dispatch to the selected command, returning its exit code.
    pub fn dispatch(self) -> Result<i32> {
        let log_format = match self.log_format {
            Some(LogFormat::Text) => Some("text"),
            Some(LogFormat::Json) => Some("json"),
            None => None,
        };

        let log_level = match self.log_level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        if std::env::var_os("ROLEBOX_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
            std::env::set_var(
                "RUST_LOG",
                format!("rolebox={log_level},rolebox_core={log_level}"),
            );
        }
        rolebox_core::logging::init(log_format)?;

        let workspace = Workspace::new(&self.workspace_folder);
        let settings = Settings::load(&workspace)?;
        let docker = Docker::new(RuntimeKind::detect(self.runtime.map(Into::into)));

        match self.command {
            Commands::Setup { image, name } => {
                commands::setup::execute(&workspace, settings, &docker, &image, name.as_deref())
            }
            Commands::Create => commands::create::execute(&workspace, &settings, &docker),
            Commands::Provision => commands::provision::execute(&workspace, &settings, &docker),
            Commands::Verify => commands::verify::execute(&workspace, &settings, &docker),
            Commands::Destroy => commands::destroy::execute(&settings, &docker),
            Commands::Test => commands::test::execute(&workspace, &settings, &docker),
            Commands::Run { command } => commands::run::execute(&settings, &docker, &command),
        }
    }
}
