mod common;
use crate::common::{TestResult, init_tracing};

use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{SigHandler, Signal, kill, raise};
use nix::unistd::{Pid, getpid};

use spinwait::exec::{RELAYED_SIGNALS, SignalRelay, signal_name};
use spinwait::supervisor::supervise;
use spinwait::{ExitOutcome, SupervisorError};
use spinwait_test_utils::builders::SpawnSpecBuilder;
use spinwait_test_utils::terminal::{diagnostics_text, recording_terminal};
use spinwait_test_utils::{current_handler, serial, serial_blocking, set_handler};

/// Send `signal` to this test process after `delay`.
fn raise_after(delay: Duration, signal: Signal) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = kill(getpid(), signal);
    });
}

#[tokio::test]
async fn interrupt_is_forwarded_to_child() -> TestResult {
    init_tracing();
    let _guard = serial().await;
    let dir = tempfile::tempdir()?;
    let marker = dir.path().join("received");

    let spec = SpawnSpecBuilder::shell(&format!(
        "trap 'echo TERM > \"{}\"; exit 0' TERM; while true; do sleep 0.1; done",
        marker.display()
    ))
    .build();
    let mut terminal = recording_terminal();

    raise_after(Duration::from_millis(600), Signal::SIGTERM);
    let started = Instant::now();
    let outcome = supervise(&spec, &mut terminal).await?;

    assert_eq!(outcome, ExitOutcome::Interrupted(Some(Signal::SIGTERM as i32)));
    assert_eq!(outcome.code(), 143);
    assert!(started.elapsed() < Duration::from_secs(3));

    let received = std::fs::read_to_string(&marker)?;
    assert_eq!(received.trim(), "TERM");
    assert!(diagnostics_text(&terminal).contains("Interrupted by SIGTERM"));
    Ok(())
}

#[tokio::test]
async fn sigint_interrupt_exits_130() -> TestResult {
    init_tracing();
    let _guard = serial().await;
    let spec = SpawnSpecBuilder::new("sleep").arg("5").build();
    let mut terminal = recording_terminal();

    raise_after(Duration::from_millis(500), Signal::SIGINT);
    let started = Instant::now();
    let outcome = supervise(&spec, &mut terminal).await?;

    assert_eq!(outcome, ExitOutcome::Interrupted(Some(Signal::SIGINT as i32)));
    assert_eq!(outcome.code(), 130);
    assert!(started.elapsed() < Duration::from_secs(3));
    Ok(())
}

#[tokio::test]
async fn dispositions_are_restored_after_run() -> TestResult {
    init_tracing();
    let _guard = serial().await;
    let before: Vec<SigHandler> = RELAYED_SIGNALS.iter().map(|s| current_handler(*s)).collect();
    let previous_quit = set_handler(Signal::SIGQUIT, SigHandler::SigIgn);

    let spec = SpawnSpecBuilder::new("true").build();
    let mut terminal = recording_terminal();
    supervise(&spec, &mut terminal).await?;

    assert_eq!(current_handler(Signal::SIGQUIT), SigHandler::SigIgn);
    assert_eq!(current_handler(Signal::SIGINT), before[0]);
    assert_eq!(current_handler(Signal::SIGTERM), before[1]);

    set_handler(Signal::SIGQUIT, previous_quit.handler());
    Ok(())
}

#[tokio::test]
async fn dispositions_are_restored_after_interrupt() -> TestResult {
    init_tracing();
    let _guard = serial().await;
    let before: Vec<SigHandler> = RELAYED_SIGNALS.iter().map(|s| current_handler(*s)).collect();

    let spec = SpawnSpecBuilder::new("sleep").arg("5").build();
    let mut terminal = recording_terminal();
    raise_after(Duration::from_millis(300), Signal::SIGQUIT);
    let outcome = supervise(&spec, &mut terminal).await?;

    assert_eq!(outcome.code(), 128 + Signal::SIGQUIT as i32);
    let after: Vec<SigHandler> = RELAYED_SIGNALS.iter().map(|s| current_handler(*s)).collect();
    assert_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn dispositions_are_restored_after_timeout() -> TestResult {
    init_tracing();
    let _guard = serial().await;
    let before: Vec<SigHandler> = RELAYED_SIGNALS.iter().map(|s| current_handler(*s)).collect();

    let spec = SpawnSpecBuilder::new("sleep").arg("5").timeout_secs(1).build();
    let mut terminal = recording_terminal();
    let outcome = supervise(&spec, &mut terminal).await?;

    assert_eq!(outcome, ExitOutcome::TimedOut);
    let after: Vec<SigHandler> = RELAYED_SIGNALS.iter().map(|s| current_handler(*s)).collect();
    assert_eq!(before, after);
    Ok(())
}

#[test]
fn handler_preserves_errno_of_interrupted_code() {
    let _guard = serial_blocking();
    let relay = SignalRelay::install().expect("install relay");
    // Forwarding to a pid that does not exist makes kill(2) fail with ESRCH
    // inside the handler.
    let _tracked = relay.track_child(i32::MAX);

    Errno::set_raw(Errno::ENOTTY as i32);
    raise(Signal::SIGQUIT).expect("raise SIGQUIT");

    assert!(relay.interrupted());
    assert_eq!(Errno::last_raw(), Errno::ENOTTY as i32);
}

#[test]
fn restore_is_idempotent() {
    let _guard = serial_blocking();
    let before = current_handler(Signal::SIGTERM);

    let mut relay = SignalRelay::install().expect("install relay");
    assert!(matches!(current_handler(Signal::SIGTERM), SigHandler::Handler(_)));

    relay.restore();
    assert_eq!(current_handler(Signal::SIGTERM), before);
    relay.restore();
    assert_eq!(current_handler(Signal::SIGTERM), before);
    drop(relay);
    assert_eq!(current_handler(Signal::SIGTERM), before);
}

#[test]
fn only_one_relay_at_a_time() {
    let _guard = serial_blocking();
    let relay = SignalRelay::install().expect("install relay");

    let second = SignalRelay::install();
    assert!(matches!(second, Err(SupervisorError::AlreadySupervising)));

    drop(relay);
    let third = SignalRelay::install();
    assert!(third.is_ok());
}

#[test]
fn relay_tracks_and_clears_child_pid() {
    let _guard = serial_blocking();
    let relay = SignalRelay::install().expect("install relay");
    assert_eq!(relay.tracked_child(), None);
    assert!(!relay.interrupted());
    assert_eq!(relay.last_signal(), None);

    {
        let _tracked = relay.track_child(Pid::this().as_raw() + 1_000_000);
        assert!(relay.tracked_child().is_some());
    }
    assert_eq!(relay.tracked_child(), None);
}

#[test]
fn first_signal_is_sticky() {
    let _guard = serial_blocking();
    let relay = SignalRelay::install().expect("install relay");

    kill(getpid(), Signal::SIGQUIT).expect("raise SIGQUIT");
    std::thread::sleep(Duration::from_millis(50));
    kill(getpid(), Signal::SIGINT).expect("raise SIGINT");
    std::thread::sleep(Duration::from_millis(50));

    assert!(relay.interrupted());
    assert_eq!(relay.last_signal(), Some(Signal::SIGQUIT as i32));
}

#[test]
fn signal_names() {
    assert_eq!(signal_name(Signal::SIGINT as i32), "SIGINT");
    assert_eq!(signal_name(Signal::SIGTERM as i32), "SIGTERM");
    assert_eq!(signal_name(Signal::SIGQUIT as i32), "SIGQUIT");
    assert_eq!(signal_name(Signal::SIGHUP as i32), "unknown signal");
    assert_eq!(signal_name(0), "unknown signal");
}
