// src/errors.rs

//! Crate-wide error type and exit-code mapping for fatal failures.

use nix::sys::signal::Signal;
use thiserror::Error;

/// Fatal failures of a supervision run.
///
/// Timeouts and interruptions are not errors; they are
/// [`ExitOutcome`](crate::types::ExitOutcome) variants.
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Failed to setup signal handlers ({signal}): {source}")]
    Setup {
        signal: Signal,
        #[source]
        source: nix::Error,
    },

    #[error("Another supervision run is already active in this process")]
    AlreadySupervising,

    #[error("Failed to create process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to query child status: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Failed to kill child process: {0}")]
    Kill(#[source] std::io::Error),

    #[error("Command must contain at least one non-empty token")]
    EmptyCommand,
}

impl SupervisorError {
    /// Exit code the binary reports for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            SupervisorError::Setup { .. } | SupervisorError::AlreadySupervising => 1,
            SupervisorError::Wait(_) | SupervisorError::Kill(_) => 1,
            SupervisorError::Spawn(_) | SupervisorError::EmptyCommand => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
