// src/cli.rs

//! CLI argument parsing using `clap`.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::errors::Result;
use crate::types::SpawnSpec;

/// Command-line arguments for `spinwait`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "spinwait",
    version,
    about = "Run a command behind a spinner, forwarding interrupts and enforcing a timeout.",
    long_about = None
)]
pub struct CliArgs {
    /// Message shown next to the spinner.
    ///
    /// Default: "Running:" followed by the command.
    #[arg(short, long, value_name = "TEXT")]
    pub message: Option<String>,

    /// Kill the command after this many seconds (0 = no timeout).
    #[arg(short, long, value_name = "SECS", default_value_t = 0)]
    pub timeout: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SPINWAIT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to run, followed by its arguments.
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

impl CliArgs {
    /// Build the spawn spec these arguments describe.
    pub fn spawn_spec(&self) -> Result<SpawnSpec> {
        SpawnSpec::new(
            self.command.clone(),
            self.message.clone(),
            Duration::from_secs(self.timeout),
        )
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
