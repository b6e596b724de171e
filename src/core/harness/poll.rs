use std::time::Duration;

use anyhow::Result;

/// Bounded-retry budget for readiness probing: worst-case wait is
/// `max_attempts * interval`.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    /// Effective attempt budget: at least one probe is always made.
    #[must_use]
    pub const fn budget(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

/// Outcome of a readiness wait. Timeout is a value, not an error, so
/// callers can report it distinctly from a failed probe invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready { attempt: u32 },
    TimedOut { attempts: u32 },
}

impl Readiness {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Poll `probe` until it reports ready or the attempt budget runs out.
///
/// The probe receives the 1-based attempt number; `Ok(false)` means "not
/// ready yet", `Err` means the probe itself could not run and aborts the
/// wait. Sleeps only between attempts, so a first-attempt success never
/// sleeps. At least one probe is always made, even with a zero budget.
pub fn wait_ready<P>(policy: PollPolicy, probe: P) -> Result<Readiness>
where
    P: FnMut(u32) -> Result<bool>,
{
    wait_ready_with(policy, probe, std::thread::sleep)
}

/// [`wait_ready`] with an injectable sleeper, for deterministic tests.
pub fn wait_ready_with<P, S>(policy: PollPolicy, mut probe: P, mut sleep: S) -> Result<Readiness>
where
    P: FnMut(u32) -> Result<bool>,
    S: FnMut(Duration),
{
    let budget = policy.budget();
    for attempt in 1..=budget {
        if probe(attempt)? {
            return Ok(Readiness::Ready { attempt });
        }
        if attempt < budget {
            sleep(policy.interval);
        }
    }
    Ok(Readiness::TimedOut { attempts: budget })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    fn policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            max_attempts,
            interval: Duration::from_millis(10),
        }
    }

    #[test]
    fn first_attempt_success_never_sleeps() {
        let mut probes = 0;
        let mut sleeps = 0;
        let out = wait_ready_with(
            policy(30),
            |_| {
                probes += 1;
                Ok(true)
            },
            |_| sleeps += 1,
        )
        .unwrap();
        assert_eq!(out, Readiness::Ready { attempt: 1 });
        assert_eq!(probes, 1);
        assert_eq!(sleeps, 0);
    }

    #[test]
    fn succeeds_midway_and_stops_probing() {
        let mut probes = 0;
        let out = wait_ready_with(
            policy(30),
            |attempt| {
                probes += 1;
                Ok(attempt == 4)
            },
            |_| {},
        )
        .unwrap();
        assert_eq!(out, Readiness::Ready { attempt: 4 });
        assert_eq!(probes, 4);
    }

    #[test]
    fn exhausted_budget_times_out() {
        let mut probes = 0;
        let mut sleeps = 0;
        let out = wait_ready_with(
            policy(5),
            |_| {
                probes += 1;
                Ok(false)
            },
            |_| sleeps += 1,
        )
        .unwrap();
        assert_eq!(out, Readiness::TimedOut { attempts: 5 });
        assert_eq!(probes, 5);
        // No sleep after the final failed probe
        assert_eq!(sleeps, 4);
    }

    #[test]
    fn budget_is_clamped_to_at_least_one() {
        assert_eq!(policy(0).budget(), 1);
        assert_eq!(policy(1).budget(), 1);
        assert_eq!(policy(30).budget(), 30);
    }

    #[test]
    fn zero_budget_still_probes_once() {
        let mut probes = 0;
        let out = wait_ready_with(
            policy(0),
            |_| {
                probes += 1;
                Ok(false)
            },
            |_| {},
        )
        .unwrap();
        assert_eq!(out, Readiness::TimedOut { attempts: 1 });
        assert_eq!(probes, 1);
    }

    #[test]
    fn probe_error_aborts_the_wait() {
        let mut probes = 0;
        let result = wait_ready_with(
            policy(30),
            |_| {
                probes += 1;
                bail!("runtime missing")
            },
            |_| {},
        );
        assert!(result.is_err());
        assert_eq!(probes, 1);
    }
}
