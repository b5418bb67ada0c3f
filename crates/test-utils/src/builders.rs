#![allow(dead_code)]

use std::time::Duration;

use spinwait::SpawnSpec;

/// Builder for `SpawnSpec` to simplify test setup.
pub struct SpawnSpecBuilder {
    command: Vec<String>,
    message: Option<String>,
    timeout: Duration,
}

impl SpawnSpecBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            command: vec![program.to_string()],
            message: Some("Waiting".to_string()),
            timeout: Duration::ZERO,
        }
    }

    /// `sh -c <script>`.
    pub fn shell(script: &str) -> Self {
        Self::new("sh").arg("-c").arg(script)
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.command.push(arg.to_string());
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn build(self) -> SpawnSpec {
        SpawnSpec::new(self.command, self.message, self.timeout)
            .expect("Failed to build valid spawn spec from builder")
    }
}
