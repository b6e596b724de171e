use console::Style;

use super::{StepRecord, StepStatus, SuiteReport};

pub fn banner(title: &str) {
    println!("=== {title} ===");
}

pub fn step_heading(index: usize, total: usize, label: &str) {
    println!("\n{index}/{total}. {label}...");
}

pub fn step_passed(note: &str) {
    let ok = Style::new().green();
    if note.is_empty() {
        println!("{} passed", ok.apply_to("✅"));
    } else {
        println!("{} {note}", ok.apply_to("✅"));
    }
}

pub fn step_warned(note: &str) {
    let warn = Style::new().yellow();
    println!("{} {note}", warn.apply_to("⚠"));
}

pub fn step_failed(note: &str) {
    let bad = Style::new().red();
    println!("{} {note}", bad.apply_to("❌"));
}

pub fn waiting(label: &str, attempt: u32, budget: u32) {
    println!("⏳ waiting for {label}... (attempt {attempt}/{budget})");
}

pub fn summary(report: &SuiteReport) {
    let (passed, warned, failed, skipped) =
        report
            .steps
            .iter()
            .fold((0, 0, 0, 0), |(p, w, f, s), rec| match rec.status {
                StepStatus::Passed => (p + 1, w, f, s),
                StepStatus::Warned => (p, w + 1, f, s),
                StepStatus::Failed => (p, w, f + 1, s),
                StepStatus::Skipped => (p, w, f, s + 1),
            });

    println!();
    for rec in &report.steps {
        print_record(rec);
    }

    let verdict = if report.passed() {
        Style::new().green().apply_to("passed").to_string()
    } else {
        Style::new().red().apply_to("FAILED").to_string()
    };
    println!(
        "\n=== {}: {verdict} ({passed} passed, {warned} warned, {failed} failed, {skipped} skipped) ===",
        report.title
    );
}

fn print_record(rec: &StepRecord) {
    let marker = match rec.status {
        StepStatus::Passed => "✅",
        StepStatus::Warned => "⚠",
        StepStatus::Failed => "❌",
        StepStatus::Skipped => "-",
    };
    println!("  {marker} {}", rec.label);
}
