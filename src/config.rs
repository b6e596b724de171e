use std::time::Duration;

use crate::core::harness::poll::PollPolicy;

/// Smoke-test configuration sourced from the environment.
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    /// Program name (or path) of the container runtime CLI.
    pub runtime_program: String,
    /// Readiness-polling budget for service containers.
    pub poll: PollPolicy,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            runtime_program: "container".to_string(),
            poll: PollPolicy::default(),
        }
    }
}

impl SmokeConfig {
    /// Load configuration with precedence: environment → defaults.
    ///
    /// Recognized variables: `CONTAINER_SMOKE_RUNTIME`,
    /// `CONTAINER_SMOKE_POLL_ATTEMPTS`, `CONTAINER_SMOKE_POLL_INTERVAL_MS`.
    /// Unparsable values fall back to the defaults.
    #[must_use]
    pub fn load() -> Self {
        let mut out = Self::default();

        if let Ok(v) = std::env::var("CONTAINER_SMOKE_RUNTIME")
            && !v.is_empty()
        {
            out.runtime_program = v;
        }
        if let Ok(v) = std::env::var("CONTAINER_SMOKE_POLL_ATTEMPTS")
            && let Ok(n) = v.parse::<u32>()
        {
            out.poll.max_attempts = n;
        }
        if let Ok(v) = std::env::var("CONTAINER_SMOKE_POLL_INTERVAL_MS")
            && let Ok(ms) = v.parse::<u64>()
        {
            out.poll.interval = Duration::from_millis(ms);
        }

        out
    }
}
