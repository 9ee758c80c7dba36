use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::decoder::{decode_lines, decode_records};
use crate::error::Result;
use crate::source::{lines_from_bytes, read_lines};
use crate::validation::{FileValidator, ValidationMode, ValidationReport};

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<ValidationReport>,
}

impl FileOutcome {
    pub fn is_clean(&self) -> bool {
        matches!(&self.result, Ok(report) if report.is_clean())
    }

    pub fn is_fatal(&self) -> bool {
        self.result.is_err()
    }
}

pub fn check_lines<I, S>(lines: I, mode: ValidationMode) -> ValidationReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let slots = decode_lines(lines);
    FileValidator::new(mode).validate_decoded(&slots)
}

pub fn check_bytes(bytes: &[u8], mode: ValidationMode) -> ValidationReport {
    check_lines(lines_from_bytes(bytes), mode)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Malformed records are reported as issues.
    #[default]
    Lenient,
    /// The first malformed record aborts the run.
    Strict,
}

pub fn check_file(path: impl AsRef<Path>, mode: ValidationMode) -> Result<ValidationReport> {
    run_file(path.as_ref(), mode, DecodePolicy::Lenient)
}

pub fn check_file_strict(path: impl AsRef<Path>, mode: ValidationMode) -> Result<ValidationReport> {
    run_file(path.as_ref(), mode, DecodePolicy::Strict)
}

pub fn run_file(path: &Path, mode: ValidationMode, policy: DecodePolicy) -> Result<ValidationReport> {
    let start = Instant::now();
    info!(path = %path.display(), ?mode, ?policy, "validating file");

    let result = read_lines(path).and_then(|lines| match policy {
        DecodePolicy::Lenient => Ok(check_lines(&lines, mode)),
        DecodePolicy::Strict => {
            decode_records(&lines).map(|records| FileValidator::new(mode).validate(&records))
        }
    });

    match &result {
        Ok(report) => info!(
            path = %path.display(),
            records = report.records_total(),
            issues = report.total(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "validation finished"
        ),
        Err(e) => warn!(path = %path.display(), error = %e, "validation aborted"),
    }
    result
}

/// Validates several files on the rayon pool. Runs share nothing; outcomes
/// come back in the order of `paths`.
pub fn check_files(paths: &[PathBuf], mode: ValidationMode, policy: DecodePolicy) -> Vec<FileOutcome> {
    paths
        .par_iter()
        .map(|path| FileOutcome {
            path: path.clone(),
            result: run_file(path, mode, policy),
        })
        .collect()
}
