//! Human and machine rendering of validation outcomes, and their mapping
//! to a process exit status.

use console::style;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::engine::FileOutcome;
use crate::validation::{ValidationIssue, ValidationMode, ValidationReport};

pub const EXIT_CLEAN: u8 = 0;
pub const EXIT_ISSUES: u8 = 1;
pub const EXIT_FATAL: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine<'a> {
    Passed(usize),
    Issue(&'a ValidationIssue),
    Total(usize),
}

impl fmt::Display for ReportLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::Passed(line) => write!(f, "Checksum line {line}: OK"),
            ReportLine::Issue(issue) => write!(f, "{issue}"),
            ReportLine::Total(count) => write!(f, "Total errors: {count}"),
        }
    }
}

/// Lines in the order a sequential scan would print them: the end-of-file
/// issue, then each checked record with its issues or its OK line.
pub fn report_lines(report: &ValidationReport) -> Vec<ReportLine<'_>> {
    let mut lines: Vec<ReportLine<'_>> = report
        .issues()
        .iter()
        .filter(|issue| !issue.is_per_record())
        .map(ReportLine::Issue)
        .collect();

    for line in 1..=report.records_checked() {
        lines.extend(
            report
                .issues()
                .iter()
                .filter(|issue| issue.is_per_record() && issue.line() == line)
                .map(ReportLine::Issue),
        );
        if report.checksum_passed(line) {
            lines.push(ReportLine::Passed(line));
        }
    }

    if report.mode() == ValidationMode::CollectAll {
        lines.push(ReportLine::Total(report.total()));
    }
    lines
}

pub fn print_report(report: &ValidationReport) {
    for line in report_lines(report) {
        match line {
            ReportLine::Passed(_) => println!("{}", style(line).green()),
            ReportLine::Issue(_) => println!("{}", style(line).red()),
            ReportLine::Total(0) => println!("{}", style(line).green().bold()),
            ReportLine::Total(_) => println!("{}", style(line).red().bold()),
        }
    }
}

pub fn print_outcomes(outcomes: &[FileOutcome]) {
    let with_headers = outcomes.len() > 1;
    for outcome in outcomes {
        if with_headers {
            println!("{}", style(format!("==> {}", outcome.path.display())).cyan().bold());
        }
        match &outcome.result {
            Ok(report) => print_report(report),
            Err(e) => eprintln!("{} {}", style("error:").red().bold(), e),
        }
    }
}

#[derive(Serialize)]
struct JsonOutcome<'a> {
    path: &'a Path,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct JsonOut<'a> {
    ok: bool,
    data: Vec<JsonOutcome<'a>>,
}

pub fn render_json(outcomes: &[FileOutcome]) -> serde_json::Result<String> {
    let data: Vec<JsonOutcome<'_>> = outcomes
        .iter()
        .map(|outcome| JsonOutcome {
            path: &outcome.path,
            ok: outcome.is_clean(),
            report: outcome.result.as_ref().ok(),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        })
        .collect();
    serde_json::to_string_pretty(&JsonOut {
        ok: outcomes.iter().all(FileOutcome::is_clean),
        data,
    })
}

/// 0 when every run completed without issues, 2 when any run failed
/// fatally, 1 otherwise.
pub fn exit_code(outcomes: &[FileOutcome]) -> u8 {
    if outcomes.iter().any(FileOutcome::is_fatal) {
        EXIT_FATAL
    } else if outcomes.iter().all(FileOutcome::is_clean) {
        EXIT_CLEAN
    } else {
        EXIT_ISSUES
    }
}
