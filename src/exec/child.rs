// src/exec/child.rs

//! Lifecycle of the supervised child: spawn, non-blocking poll, graceful then
//! forceful termination, and reaping.

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::errors::{Result, SupervisorError};
use crate::types::{ChildStatus, EXIT_SIGNAL_BASE, SpawnSpec};

/// A spawned child process with inherited standard streams.
pub struct ChildProcess {
    child: Child,
    pid: i32,
}

impl ChildProcess {
    /// Spawn the command described by `spec`.
    ///
    /// Exec failures (missing or non-executable program) surface here as an
    /// `io::Error`; use [`is_exec_failure`] to tell them apart from resource
    /// exhaustion.
    pub fn spawn(spec: &SpawnSpec) -> io::Result<Self> {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.args()).kill_on_drop(true);

        let child = cmd.spawn()?;
        let pid = child
            .id()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| io::Error::other("spawned child has no pid"))?;

        info!(pid, cmd = ?spec.command(), "spawned child process");

        Ok(Self { child, pid })
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    /// Check whether the child has terminated, without blocking.
    ///
    /// `Ok(None)` means still running. A terminal status reaps the child.
    pub fn poll_nonblocking(&mut self) -> Result<Option<ChildStatus>> {
        let status = self.child.try_wait().map_err(SupervisorError::Wait)?;
        Ok(status.map(child_status))
    }

    /// Block until the child has terminated and reap it.
    pub async fn wait_blocking(&mut self) -> Result<ChildStatus> {
        let status = self.child.wait().await.map_err(SupervisorError::Wait)?;
        let status = child_status(status);
        debug!(pid = self.pid, ?status, "child reaped");
        Ok(status)
    }

    /// Ask the child to shut down (SIGTERM).
    pub fn terminate_gracefully(&self) {
        self.send(Signal::SIGTERM);
    }

    /// Kill the child (SIGKILL).
    pub fn terminate_forcibly(&mut self) -> Result<()> {
        self.child.start_kill().map_err(SupervisorError::Kill)
    }

    /// SIGTERM, wait `grace`, then SIGKILL if the child is still running.
    /// Always returns with the child reaped.
    pub async fn escalate(&mut self, grace: Duration) -> Result<ChildStatus> {
        info!(pid = self.pid, "sending SIGTERM");
        self.terminate_gracefully();
        sleep(grace).await;

        if let Some(status) = self.poll_nonblocking()? {
            debug!(pid = self.pid, ?status, "child exited within grace window");
            return Ok(status);
        }

        info!(
            pid = self.pid,
            grace_ms = grace.as_millis() as u64,
            "child ignored SIGTERM; sending SIGKILL"
        );
        self.terminate_forcibly()?;
        self.wait_blocking().await
    }

    fn send(&self, signal: Signal) {
        match kill(Pid::from_raw(self.pid), signal) {
            Ok(()) => {}
            // Already gone.
            Err(Errno::ESRCH) => {}
            Err(error) => warn!(pid = self.pid, %signal, %error, "failed to signal child"),
        }
    }
}

/// Whether a spawn error means "the command could not be executed" rather
/// than "no process could be created".
pub fn is_exec_failure(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    ) || err.raw_os_error() == Some(Errno::ENOEXEC as i32)
}

fn child_status(status: ExitStatus) -> ChildStatus {
    if let Some(code) = status.code() {
        ChildStatus::Exited(code)
    } else if let Some(signum) = status.signal() {
        ChildStatus::Signaled(signum)
    } else {
        ChildStatus::Exited(EXIT_SIGNAL_BASE)
    }
}
