// src/lib.rs

pub mod cli;
pub mod clock;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod message;
pub mod render;
pub mod supervisor;
pub mod terminal;
pub mod types;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::terminal::StdTerminal;

pub use crate::errors::SupervisorError;
pub use crate::supervisor::supervise;
pub use crate::types::{ExitOutcome, SpawnSpec};

/// High-level entry point used by `main.rs`.
///
/// Builds the spawn spec from the CLI arguments and supervises it on the
/// process's own stdout/stderr. Returns the exit code to report.
pub async fn run(args: CliArgs) -> Result<i32> {
    let spec = match args.spawn_spec() {
        Ok(spec) => spec,
        Err(err) => {
            eprintln!("{err}");
            return Ok(err.exit_code());
        }
    };
    let mut terminal = StdTerminal::stdio();
    debug!(cmd = ?spec.command(), timeout_s = spec.timeout().as_secs(), "starting");

    Ok(supervisor::run(&spec, &mut terminal).await)
}
