// src/supervisor.rs

//! One supervision run: spawn, animate while polling, terminate, report.
//!
//! ```text
//! SETUP -> RUNNING -> { FINISHED | TIMED_OUT | INTERRUPTED } -> CLEANUP
//! ```
//!
//! Each loop iteration renders a frame, sleeps one frame interval, then checks
//! in this order: interruption flag, child termination, timeout. Checking the
//! flag first means an interrupt that races with a natural exit is reported
//! as an interrupt.
//!
//! Cleanup is tied to guards: the signal relay restores the previous
//! dispositions when dropped, the tracked pid is cleared when its guard drops,
//! and the cursor is shown again when the [`HiddenCursor`] drops. All three
//! happen on every return path, including `?` early returns.

use std::time::Duration;

use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

use crate::clock::MonotonicClock;
use crate::errors::{Result, SupervisorError};
use crate::exec::{ChildProcess, SignalRelay, is_exec_failure, signal_name};
use crate::render::Spinner;
use crate::terminal::{HiddenCursor, Terminal};
use crate::types::{ChildStatus, EXIT_NOT_EXECUTABLE, ExitOutcome, SpawnSpec};

/// Delay between frames; also the polling granularity.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(200);

/// Time a child gets between SIGTERM and SIGKILL on timeout.
pub const GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Time a child gets to run its own signal handler after an interrupt,
/// before the supervisor blocks on it.
pub const INTERRUPT_GRACE: Duration = Duration::from_millis(100);

/// How the poll loop was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopExit {
    Finished(ChildStatus),
    TimedOut,
    Interrupted,
}

/// Run `spec` under supervision and return its exit code.
///
/// Fatal errors are reported through `terminal` and mapped to their dedicated
/// exit codes.
pub async fn run<T: Terminal + ?Sized>(spec: &SpawnSpec, terminal: &mut T) -> i32 {
    match supervise(spec, terminal).await {
        Ok(outcome) => {
            info!(%outcome, code = outcome.code(), "supervision finished");
            outcome.code()
        }
        Err(err) => {
            debug!(error = %err, "supervision failed");
            terminal.report(&err.to_string());
            err.exit_code()
        }
    }
}

/// Run `spec` under supervision.
///
/// The signal relay is installed for the duration of the call and restored
/// before it returns, whatever the outcome.
pub async fn supervise<T: Terminal + ?Sized>(
    spec: &SpawnSpec,
    terminal: &mut T,
) -> Result<ExitOutcome> {
    let mut relay = SignalRelay::install()?;
    let outcome = supervise_installed(spec, terminal, &relay).await;
    relay.restore();
    outcome
}

async fn supervise_installed<T: Terminal + ?Sized>(
    spec: &SpawnSpec,
    terminal: &mut T,
    relay: &SignalRelay,
) -> Result<ExitOutcome> {
    let mut child = match ChildProcess::spawn(spec) {
        Ok(child) => child,
        Err(err) if is_exec_failure(&err) => {
            debug!(cmd = spec.program(), error = %err, "command could not be executed");
            terminal.report(&format!("Failed to execute '{}': {err}", spec.program()));
            return Ok(ExitOutcome::Exited(EXIT_NOT_EXECUTABLE));
        }
        Err(err) => return Err(SupervisorError::Spawn(err)),
    };
    let _tracked = relay.track_child(child.pid());

    let clock = MonotonicClock::new();
    let start = clock.now();

    let exit = {
        let mut screen = HiddenCursor::new(terminal);
        poll_loop(spec, &mut child, relay, &clock, start, screen.terminal()).await?
    };

    match exit {
        LoopExit::Finished(status) => {
            debug!(pid = child.pid(), ?status, "child finished");
            Ok(status.into())
        }
        LoopExit::TimedOut => {
            terminal.report(&format!(
                "Process timed out after {} seconds",
                spec.timeout().as_secs()
            ));
            let status = child.escalate(GRACE_PERIOD).await?;
            info!(pid = child.pid(), ?status, "timed-out child reaped");
            Ok(ExitOutcome::TimedOut)
        }
        LoopExit::Interrupted => {
            sleep(INTERRUPT_GRACE).await;
            let status = reap_interrupted(spec, &mut child, &clock, start).await?;
            let signum = relay.last_signal();
            info!(pid = child.pid(), ?status, ?signum, "interrupted child reaped");

            match signum {
                Some(signum) => terminal.report(&format!("Interrupted by {}", signal_name(signum))),
                None => terminal.report("Interrupted."),
            }
            Ok(ExitOutcome::Interrupted(signum))
        }
    }
}

async fn poll_loop<T: Terminal + ?Sized>(
    spec: &SpawnSpec,
    child: &mut ChildProcess,
    relay: &SignalRelay,
    clock: &MonotonicClock,
    start: Instant,
    terminal: &mut T,
) -> Result<LoopExit> {
    let mut spinner = Spinner::new();

    loop {
        if let Err(error) = spinner.tick(terminal.out(), spec.message()) {
            debug!(%error, "failed to render frame");
        }
        sleep(FRAME_INTERVAL).await;

        if relay.interrupted() {
            debug!(signum = ?relay.last_signal(), "interruption observed");
            return Ok(LoopExit::Interrupted);
        }

        if let Some(status) = child.poll_nonblocking()? {
            return Ok(LoopExit::Finished(status));
        }

        if clock.expired(start, spec.timeout()) {
            debug!(
                elapsed_ms = clock.elapsed(start).as_millis() as u64,
                "timeout elapsed"
            );
            return Ok(LoopExit::TimedOut);
        }
    }
}

/// Wait for a child that was forwarded an interrupt.
///
/// Without a timeout this blocks until the child exits. With one, a child that
/// outlives the remaining budget goes through the SIGTERM/SIGKILL escalation.
async fn reap_interrupted(
    spec: &SpawnSpec,
    child: &mut ChildProcess,
    clock: &MonotonicClock,
    start: Instant,
) -> Result<ChildStatus> {
    let Some(limit) = spec.deadline() else {
        return child.wait_blocking().await;
    };

    let remaining = limit.saturating_sub(clock.elapsed(start));
    match timeout(remaining, child.wait_blocking()).await {
        Ok(status) => status,
        Err(_) => {
            warn!(pid = child.pid(), "interrupted child still running at timeout");
            child.escalate(GRACE_PERIOD).await
        }
    }
}
