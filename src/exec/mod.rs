// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`child`] owns the spawned process: spawn, non-blocking status poll,
//!   SIGTERM/SIGKILL escalation and reaping.
//! - [`signals`] installs the SIGINT/SIGTERM/SIGQUIT relay that records
//!   interruptions and forwards them to the tracked child.

pub mod child;
pub mod signals;

pub use child::{ChildProcess, is_exec_failure};
pub use signals::{RELAYED_SIGNALS, SignalRelay, TrackedChild, signal_name};
