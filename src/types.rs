// src/types.rs

//! Plain data shared between the supervisor, the child wrapper and the CLI.

use std::fmt;
use std::time::Duration;

use crate::errors::{Result, SupervisorError};
use crate::message::default_message;

/// Exit code reported when the timeout elapsed.
pub const EXIT_TIMEOUT: i32 = 124;

/// Exit code reported when the command could not be executed.
pub const EXIT_NOT_EXECUTABLE: i32 = 127;

/// Base added to a signal number (shell convention: `128 + signum`).
pub const EXIT_SIGNAL_BASE: i32 = 128;

/// Exit code for an interruption whose signal number was never recorded
/// (the SIGINT convention).
pub const EXIT_INTERRUPTED_UNKNOWN: i32 = 130;

/// What to run, what to show while it runs, and how long to allow.
///
/// Immutable once built. `timeout == Duration::ZERO` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnSpec {
    command: Vec<String>,
    message: String,
    timeout: Duration,
}

impl SpawnSpec {
    /// Build a spec.
    ///
    /// - `command` must be non-empty; the first token is the executable.
    /// - `message = None` falls back to [`default_message`].
    pub fn new(
        command: Vec<String>,
        message: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        if command.is_empty() || command[0].is_empty() {
            return Err(SupervisorError::EmptyCommand);
        }

        let message = message.unwrap_or_else(|| default_message(&command));

        Ok(Self {
            command,
            message,
            timeout,
        })
    }

    pub fn program(&self) -> &str {
        &self.command[0]
    }

    pub fn args(&self) -> &[String] {
        &self.command[1..]
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `None` when the timeout is disabled.
    pub fn deadline(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }
}

/// Terminal status of a reaped child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// Normal exit with the given status.
    Exited(i32),
    /// Killed by the given signal number.
    Signaled(i32),
}

/// Result of one supervision run. Produced exactly once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Exited(i32),
    Signaled(i32),
    TimedOut,
    /// The supervisor itself was interrupted. `None` if no signal number was
    /// ever recorded.
    Interrupted(Option<i32>),
}

impl ExitOutcome {
    /// Map the outcome to the process exit code.
    pub fn code(self) -> i32 {
        match self {
            ExitOutcome::Exited(code) => code,
            ExitOutcome::Signaled(signum) => EXIT_SIGNAL_BASE + signum,
            ExitOutcome::TimedOut => EXIT_TIMEOUT,
            ExitOutcome::Interrupted(Some(signum)) => EXIT_SIGNAL_BASE + signum,
            ExitOutcome::Interrupted(None) => EXIT_INTERRUPTED_UNKNOWN,
        }
    }
}

impl From<ChildStatus> for ExitOutcome {
    fn from(status: ChildStatus) -> Self {
        match status {
            ChildStatus::Exited(code) => ExitOutcome::Exited(code),
            ChildStatus::Signaled(signum) => ExitOutcome::Signaled(signum),
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Exited(code) => write!(f, "exited with status {code}"),
            ExitOutcome::Signaled(signum) => write!(f, "killed by signal {signum}"),
            ExitOutcome::TimedOut => write!(f, "timed out"),
            ExitOutcome::Interrupted(Some(signum)) => {
                write!(f, "interrupted by signal {signum}")
            }
            ExitOutcome::Interrupted(None) => write!(f, "interrupted"),
        }
    }
}
