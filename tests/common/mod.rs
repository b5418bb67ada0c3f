#![allow(dead_code)]

use std::error::Error;
use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

pub type TestResult = Result<(), Box<dyn Error>>;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Read a pid a child script wrote with `echo $$ > file`.
pub fn read_pid(path: &std::path::Path) -> Result<i32, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text.trim().parse()?)
}
