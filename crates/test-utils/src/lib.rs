pub mod builders;
pub mod terminal;

use tokio::sync::{Mutex, MutexGuard};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, kill, sigaction};
use nix::unistd::Pid;

static SERIAL: Mutex<()> = Mutex::const_new(());

/// Serialise tests that install the signal relay or change signal
/// dispositions. Both are process-wide.
pub async fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().await
}

/// [`serial`] for plain `#[test]` functions. Must not be called from inside a
/// Tokio runtime.
pub fn serial_blocking() -> MutexGuard<'static, ()> {
    SERIAL.blocking_lock()
}

/// Read the handler currently installed for `signal` without changing it.
pub fn current_handler(signal: Signal) -> SigHandler {
    let probe = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    // SAFETY: the previous action is reinstalled immediately.
    let previous = unsafe { sigaction(signal, &probe) }.expect("query signal disposition");
    unsafe { sigaction(signal, &previous) }.expect("restore signal disposition");
    previous.handler()
}

/// Install `handler` for `signal`, returning the previous action.
pub fn set_handler(signal: Signal, handler: SigHandler) -> SigAction {
    let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
    // SAFETY: only SigDfl/SigIgn are installed by tests.
    unsafe { sigaction(signal, &action) }.expect("install signal disposition")
}

/// Whether a process with this pid still exists (zombies included).
pub fn process_exists(pid: i32) -> bool {
    kill(Pid::from_raw(pid), None).is_ok()
}
