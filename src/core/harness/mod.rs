pub mod poll;
pub mod report;

use std::panic::{self, AssertUnwindSafe};

use anyhow::Result;
use tracing::{error, warn};

use crate::core::runtime::CmdOutput;

/// Whether a failing step fails the whole run or only earns a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Mandatory,
    BestEffort,
}

/// One named check: an action against the suite context plus the severity
/// of its failure. Severity is declared here, never inferred from output.
pub struct Step<'a, C> {
    pub label: &'static str,
    pub severity: Severity,
    pub action: Box<dyn FnMut(&mut C) -> Result<CmdOutput> + 'a>,
}

impl<'a, C> Step<'a, C> {
    pub fn mandatory<F>(label: &'static str, action: F) -> Self
    where
        F: FnMut(&mut C) -> Result<CmdOutput> + 'a,
    {
        Self {
            label,
            severity: Severity::Mandatory,
            action: Box::new(action),
        }
    }

    pub fn best_effort<F>(label: &'static str, action: F) -> Self
    where
        F: FnMut(&mut C) -> Result<CmdOutput> + 'a,
    {
        Self {
            label,
            severity: Severity::BestEffort,
            action: Box::new(action),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    Warned,
    Failed,
    Skipped,
}

/// Result of one executed (or skipped) step, kept for reporting.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub label: &'static str,
    pub status: StepStatus,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl StepRecord {
    fn skipped(label: &'static str) -> Self {
        Self {
            label,
            status: StepStatus::Skipped,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub title: String,
    pub steps: Vec<StepRecord>,
    failed: bool,
}

impl SuiteReport {
    #[must_use]
    pub const fn passed(&self) -> bool {
        !self.failed
    }
}

/// Run `steps` in order against `ctx`, then run `cleanup` exactly once.
///
/// The first failing mandatory step aborts the remaining steps (they are
/// recorded as skipped); best-effort failures are recorded as warnings and
/// do not affect the verdict. A panicking step is caught so that cleanup
/// still executes. Cleanup errors are logged, never raised.
pub fn run_suite<C, F>(title: &str, ctx: &mut C, steps: Vec<Step<'_, C>>, cleanup: F) -> SuiteReport
where
    F: FnOnce(&mut C) -> Result<()>,
{
    report::banner(title);

    let total = steps.len();
    let labels: Vec<&'static str> = steps.iter().map(|s| s.label).collect();
    let mut records: Vec<StepRecord> = Vec::with_capacity(total);
    let mut failed = false;

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut steps = steps;
        for (idx, step) in steps.iter_mut().enumerate() {
            if failed {
                records.push(StepRecord::skipped(step.label));
                continue;
            }

            report::step_heading(idx + 1, total, step.label);
            let record = execute(ctx, step);
            if record.status == StepStatus::Failed {
                failed = true;
            }
            records.push(record);
        }
    }));

    if outcome.is_err() {
        error!("unexpected panic while running `{title}`; continuing to cleanup");
        failed = true;

        // The panicking step never produced a record; account for it and
        // for everything after it so the summary stays complete.
        if let Some(label) = labels.get(records.len()).copied() {
            records.push(StepRecord {
                label,
                status: StepStatus::Failed,
                stdout: String::new(),
                stderr: "step panicked".to_string(),
                exit_code: -1,
            });
        }
        while records.len() < total {
            records.push(StepRecord::skipped(labels[records.len()]));
        }
    }

    println!("\n🧹 cleaning up...");
    if let Err(e) = cleanup(ctx) {
        warn!("cleanup failed: {e:#}");
    }

    let report = SuiteReport {
        title: title.to_string(),
        steps: records,
        failed,
    };
    report::summary(&report);
    report
}

fn execute<C>(ctx: &mut C, step: &mut Step<'_, C>) -> StepRecord {
    match (step.action)(ctx) {
        Ok(out) if out.success() => {
            report::step_passed("");
            StepRecord {
                label: step.label,
                status: StepStatus::Passed,
                stdout: out.stdout,
                stderr: out.stderr,
                exit_code: out.exit_code,
            }
        }
        Ok(out) => record_failure(step, out.stdout, out.stderr, out.exit_code),
        Err(e) => {
            let reason = format!("{e:#}");
            record_failure(step, String::new(), reason, -1)
        }
    }
}

fn record_failure<C>(
    step: &Step<'_, C>,
    stdout: String,
    stderr: String,
    exit_code: i32,
) -> StepRecord {
    let detail = if stderr.is_empty() {
        format!("exit code {exit_code}")
    } else {
        stderr.clone()
    };

    let status = match step.severity {
        Severity::Mandatory => {
            report::step_failed(&format!("{} failed: {detail}", step.label));
            StepStatus::Failed
        }
        Severity::BestEffort => {
            report::step_warned(&format!("{} unavailable: {detail}", step.label));
            warn!("best-effort step `{}` failed: {detail}", step.label);
            StepStatus::Warned
        }
    };

    StepRecord {
        label: step.label,
        status,
        stdout,
        stderr,
        exit_code,
    }
}
