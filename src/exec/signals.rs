// src/exec/signals.rs

//! Termination-signal relay.
//!
//! SIGINT, SIGTERM and SIGQUIT received by the supervisor are recorded and
//! forwarded to the tracked child, so a child outside our process group is
//! not orphaned when the supervisor is interrupted.
//!
//! The state touched by the handler lives in a handful of atomics. The
//! handler itself only stores to them and calls `kill(2)`: no allocation, no
//! locks, no I/O, no logging.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use nix::errno::Errno;
use nix::libc::c_int;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, kill, sigaction};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::errors::{Result, SupervisorError};

/// Signals the relay installs a handler for.
pub const RELAYED_SIGNALS: [Signal; 3] = [Signal::SIGINT, Signal::SIGTERM, Signal::SIGQUIT];

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
/// First signal received during the run, 0 if none.
static LAST_SIGNAL: AtomicI32 = AtomicI32::new(0);
/// Tracked child pid, 0 if none.
static CHILD_PID: AtomicI32 = AtomicI32::new(0);
/// Set while a relay is installed.
static ACTIVE: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_signal(signum: c_int) {
    // kill(2) may overwrite errno of the interrupted code.
    let saved_errno = Errno::last_raw();
    INTERRUPTED.store(true, Ordering::SeqCst);
    let _ = LAST_SIGNAL.compare_exchange(0, signum, Ordering::SeqCst, Ordering::SeqCst);
    forward_if_child_set(signum);
    Errno::set_raw(saved_errno);
}

/// Send `signum` to the tracked child, if there is one.
///
/// Async-signal-safe: an atomic load and `kill(2)`.
pub fn forward_if_child_set(signum: c_int) {
    let pid = CHILD_PID.load(Ordering::SeqCst);
    if pid <= 0 {
        return;
    }
    if let Ok(signal) = Signal::try_from(signum) {
        let _ = kill(Pid::from_raw(pid), signal);
    }
}

/// Canonical name of a relayed signal.
pub fn signal_name(signum: i32) -> &'static str {
    match Signal::try_from(signum) {
        Ok(Signal::SIGINT) => "SIGINT",
        Ok(Signal::SIGTERM) => "SIGTERM",
        Ok(Signal::SIGQUIT) => "SIGQUIT",
        _ => "unknown signal",
    }
}

/// Installed signal handlers plus the dispositions they replaced.
///
/// Only one relay can be installed per process at a time. Dropping the relay
/// restores the previous dispositions.
pub struct SignalRelay {
    previous: Vec<(Signal, SigAction)>,
    active: bool,
}

impl SignalRelay {
    /// Install the relay handler for [`RELAYED_SIGNALS`].
    ///
    /// Resets the interruption flag and recorded signal for a new run. If any
    /// installation fails, the handlers already installed are restored before
    /// the error is returned.
    pub fn install() -> Result<Self> {
        if ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SupervisorError::AlreadySupervising);
        }

        INTERRUPTED.store(false, Ordering::SeqCst);
        LAST_SIGNAL.store(0, Ordering::SeqCst);
        CHILD_PID.store(0, Ordering::SeqCst);

        let mut relay = SignalRelay {
            previous: Vec::with_capacity(RELAYED_SIGNALS.len()),
            active: true,
        };

        let action = SigAction::new(
            SigHandler::Handler(handle_signal),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );

        for signal in RELAYED_SIGNALS {
            // SAFETY: `handle_signal` only performs atomic stores/loads and
            // kill(2), all async-signal-safe.
            match unsafe { sigaction(signal, &action) } {
                Ok(previous) => relay.previous.push((signal, previous)),
                Err(source) => {
                    debug!(%signal, error = %source, "failed to install signal handler");
                    // `relay` drops here and restores what was installed so far.
                    return Err(SupervisorError::Setup { signal, source });
                }
            }
        }

        debug!("signal relay installed");
        Ok(relay)
    }

    /// Whether a relayed signal arrived since [`install`](Self::install).
    pub fn interrupted(&self) -> bool {
        INTERRUPTED.load(Ordering::SeqCst)
    }

    /// First signal received during this run.
    pub fn last_signal(&self) -> Option<i32> {
        match LAST_SIGNAL.load(Ordering::SeqCst) {
            0 => None,
            signum => Some(signum),
        }
    }

    /// Start forwarding signals to `pid`. The pid is cleared again when the
    /// returned guard drops.
    pub fn track_child(&self, pid: i32) -> TrackedChild<'_> {
        CHILD_PID.store(pid, Ordering::SeqCst);
        debug!(pid, "tracking child for signal forwarding");
        TrackedChild { _relay: self }
    }

    /// Currently tracked child pid, if any.
    pub fn tracked_child(&self) -> Option<i32> {
        match CHILD_PID.load(Ordering::SeqCst) {
            0 => None,
            pid => Some(pid),
        }
    }

    /// Reinstall the captured dispositions. Safe to call more than once; only
    /// the first call has any effect.
    pub fn restore(&mut self) {
        for (signal, previous) in self.previous.drain(..).rev() {
            // SAFETY: reinstalling a disposition previously returned by
            // sigaction for the same signal.
            if let Err(error) = unsafe { sigaction(signal, &previous) } {
                warn!(%signal, %error, "failed to restore signal handler");
            }
        }

        if self.active {
            CHILD_PID.store(0, Ordering::SeqCst);
            ACTIVE.store(false, Ordering::SeqCst);
            self.active = false;
            debug!("signal relay restored");
        }
    }
}

impl Drop for SignalRelay {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Keeps a child pid registered with the relay.
pub struct TrackedChild<'a> {
    _relay: &'a SignalRelay,
}

impl Drop for TrackedChild<'_> {
    fn drop(&mut self) {
        CHILD_PID.store(0, Ordering::SeqCst);
    }
}
