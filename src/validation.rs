//! Per-record and whole-file checks over decoded records, aggregated into a
//! [`ValidationReport`] under a fail-fast or collect-all policy.

use serde::Serialize;
use std::fmt;
use std::ops::ControlFlow;
use tracing::debug;

use crate::decoder::DecodedRecord;
use crate::error::MalformedRecord;
use crate::types::{EOF_RECORD_TYPE, HexRecord, RECORD_TYPE_IDX, RecordType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Stop at the first issue.
    #[default]
    FailFast,
    /// Check every record and tally every issue.
    CollectAll,
}

/// Outcome of one failed check. `line` is the 1-based position of the
/// record among the record lines of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    LengthMismatch {
        line: usize,
        expected: u8,
        actual: usize,
    },
    ChecksumMismatch {
        line: usize,
        expected: u8,
        actual: u8,
    },
    MissingEof {
        line: usize,
        found: Option<u8>,
    },
    MalformedRecord {
        line: usize,
        reason: MalformedRecord,
    },
}

impl ValidationIssue {
    pub fn line(&self) -> usize {
        match self {
            ValidationIssue::LengthMismatch { line, .. }
            | ValidationIssue::ChecksumMismatch { line, .. }
            | ValidationIssue::MissingEof { line, .. }
            | ValidationIssue::MalformedRecord { line, .. } => *line,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ValidationIssue::LengthMismatch { .. } => "length_mismatch",
            ValidationIssue::ChecksumMismatch { .. } => "checksum_mismatch",
            ValidationIssue::MissingEof { .. } => "missing_eof",
            ValidationIssue::MalformedRecord { .. } => "malformed_record",
        }
    }

    /// Whether the issue belongs to a single record rather than the file.
    pub fn is_per_record(&self) -> bool {
        !matches!(self, ValidationIssue::MissingEof { .. })
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::LengthMismatch {
                line,
                expected,
                actual,
            } => write!(
                f,
                "Wrong data length at line {line}: expected 0x{expected:02X}, obtained 0x{actual:02X}"
            ),
            ValidationIssue::ChecksumMismatch {
                line,
                expected,
                actual,
            } => write!(
                f,
                "Checksum line {line}: failed, expected 0x{expected:02X}, obtained 0x{actual:02X}"
            ),
            ValidationIssue::MissingEof { line, found } => {
                write!(
                    f,
                    "Wrong data formatting: 0x{EOF_RECORD_TYPE:02X} expected at index {RECORD_TYPE_IDX} in line {line}; "
                )?;
                match found {
                    Some(byte) => match RecordType::from_byte(*byte) {
                        Some(kind) => write!(f, "obtained 0x{byte:02X} ({kind})"),
                        None => write!(f, "obtained 0x{byte:02X}"),
                    },
                    None => write!(f, "obtained nothing"),
                }
            }
            ValidationIssue::MalformedRecord { line, reason } => {
                write!(f, "Malformed record at line {line}: {reason}")
            }
        }
    }
}

/// Result of one validation run. Issues are ordered: the end-of-file issue
/// first, then per-record issues by ascending line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    mode: ValidationMode,
    records_total: usize,
    records_checked: usize,
    stopped_early: bool,
    issues: Vec<ValidationIssue>,
    total: usize,
}

impl ValidationReport {
    pub fn new(mode: ValidationMode, records_total: usize) -> Self {
        Self {
            mode,
            records_total,
            records_checked: 0,
            stopped_early: false,
            issues: Vec::new(),
            total: 0,
        }
    }

    #[inline]
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    #[inline]
    pub fn records_total(&self) -> usize {
        self.records_total
    }

    /// Records whose length and checksum checks ran.
    #[inline]
    pub fn records_checked(&self) -> usize {
        self.records_checked
    }

    #[inline]
    pub fn stopped_early(&self) -> bool {
        self.stopped_early
    }

    #[inline]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn first_issue(&self) -> Option<&ValidationIssue> {
        self.issues.first()
    }

    /// Whether the checksum check of `line` ran and passed. A fail-fast run
    /// that stopped on a record never got to the checksum of that record.
    pub fn checksum_passed(&self, line: usize) -> bool {
        if line == 0 || line > self.records_checked {
            return false;
        }
        if self.stopped_early && line == self.records_checked {
            return false;
        }
        !self.issues.iter().any(|issue| {
            issue.line() == line
                && matches!(
                    issue,
                    ValidationIssue::ChecksumMismatch { .. }
                        | ValidationIssue::MalformedRecord { .. }
                )
        })
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
        self.total = self.issues.len();
    }
}

pub fn check_length(line: usize, record: &HexRecord) -> Option<ValidationIssue> {
    let actual = record.data_len();
    if actual == record.byte_count as usize {
        return None;
    }
    Some(ValidationIssue::LengthMismatch {
        line,
        expected: record.byte_count,
        actual,
    })
}

pub fn check_checksum(line: usize, record: &HexRecord) -> Option<ValidationIssue> {
    let computed = record.computed_checksum();
    if computed == record.checksum {
        return None;
    }
    Some(ValidationIssue::ChecksumMismatch {
        line,
        expected: computed,
        actual: record.checksum,
    })
}

/// Checks that the last record of the file is an end-of-file record.
pub fn check_end_of_file(records: &[HexRecord]) -> Option<ValidationIssue> {
    end_of_file_issue(records.last().map(Ok), records.len())
}

fn end_of_file_issue(
    last: Option<Result<&HexRecord, &MalformedRecord>>,
    total: usize,
) -> Option<ValidationIssue> {
    match last {
        Some(Ok(record)) if record.is_end_of_file() => None,
        Some(Ok(record)) => Some(ValidationIssue::MissingEof {
            line: total,
            found: Some(record.record_type),
        }),
        Some(Err(_)) => Some(ValidationIssue::MissingEof {
            line: total,
            found: None,
        }),
        None => Some(ValidationIssue::MissingEof {
            line: 0,
            found: None,
        }),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileValidator {
    mode: ValidationMode,
}

impl FileValidator {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn validate(&self, records: &[HexRecord]) -> ValidationReport {
        self.run(records.iter().map(Ok::<&HexRecord, &MalformedRecord>))
    }

    /// Like [`FileValidator::validate`], over a lenient decode. A malformed
    /// slot reports a `MalformedRecord` issue in place of its length and
    /// checksum issues.
    pub fn validate_decoded(&self, slots: &[DecodedRecord]) -> ValidationReport {
        self.run(slots.iter().map(Result::as_ref))
    }

    fn run<'a, I>(&self, slots: I) -> ValidationReport
    where
        I: ExactSizeIterator<Item = Result<&'a HexRecord, &'a MalformedRecord>> + Clone,
    {
        let total = slots.len();
        let mut report = ValidationReport::new(self.mode, total);

        if let Some(issue) = end_of_file_issue(slots.clone().last(), total) {
            if self.record(&mut report, issue).is_break() {
                return report;
            }
        }

        for (idx, slot) in slots.enumerate() {
            let line = idx + 1;
            report.records_checked += 1;

            let issues = match slot {
                Ok(record) => [check_length(line, record), check_checksum(line, record)],
                Err(reason) => [
                    Some(ValidationIssue::MalformedRecord {
                        line,
                        reason: reason.clone(),
                    }),
                    None,
                ],
            };

            for issue in issues.into_iter().flatten() {
                if self.record(&mut report, issue).is_break() {
                    return report;
                }
            }
        }

        report
    }

    fn record(&self, report: &mut ValidationReport, issue: ValidationIssue) -> ControlFlow<()> {
        debug!(line = issue.line(), kind = issue.kind(), "{issue}");
        report.push(issue);
        match self.mode {
            ValidationMode::FailFast => {
                report.stopped_early = true;
                ControlFlow::Break(())
            }
            ValidationMode::CollectAll => ControlFlow::Continue(()),
        }
    }
}

pub fn validate(records: &[HexRecord], mode: ValidationMode) -> ValidationReport {
    FileValidator::new(mode).validate(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(address: u16, bytes: &[u8]) -> HexRecord {
        HexRecord::new(address, 0x00, bytes.to_vec())
    }

    fn with_byte_count(mut record: HexRecord, byte_count: u8) -> HexRecord {
        record.byte_count = byte_count;
        record.checksum = record.computed_checksum();
        record
    }

    #[test]
    fn test_clean_file() {
        let records = vec![data(0, &[1, 2, 3]), data(3, &[4]), HexRecord::end_of_file()];
        for mode in [ValidationMode::FailFast, ValidationMode::CollectAll] {
            let report = validate(&records, mode);
            assert!(report.is_clean());
            assert_eq!(report.records_checked(), 3);
            assert!(!report.stopped_early());
        }
    }

    #[test]
    fn test_empty_file_reports_missing_eof_at_zero() {
        let report = validate(&[], ValidationMode::CollectAll);
        assert_eq!(
            report.issues(),
            &[ValidationIssue::MissingEof {
                line: 0,
                found: None
            }]
        );
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn test_length_checked_before_checksum() {
        let mut broken = with_byte_count(data(0, &[1, 2, 3, 4]), 3);
        broken.checksum ^= 0xFF;
        let records = vec![broken, HexRecord::end_of_file()];

        let fast = validate(&records, ValidationMode::FailFast);
        assert_eq!(
            fast.issues(),
            &[ValidationIssue::LengthMismatch {
                line: 1,
                expected: 3,
                actual: 4
            }]
        );
        assert!(fast.stopped_early());

        let all = validate(&records, ValidationMode::CollectAll);
        assert_eq!(all.total(), 2);
        assert_eq!(all.issues()[1].kind(), "checksum_mismatch");
    }

    #[test]
    fn test_eof_issue_comes_first() {
        let mut bad = data(0, &[0xAA]);
        bad.checksum = 0x00;
        let records = vec![bad, data(1, &[0xBB])];

        let all = validate(&records, ValidationMode::CollectAll);
        assert_eq!(
            all.issues()[0],
            ValidationIssue::MissingEof {
                line: 2,
                found: Some(0x00)
            }
        );
        assert_eq!(all.issues()[1].line(), 1);
        assert_eq!(all.total(), 2);

        let fast = validate(&records, ValidationMode::FailFast);
        assert_eq!(fast.total(), 1);
        assert_eq!(fast.records_checked(), 0);
    }

    #[test]
    fn test_malformed_slot_in_decoded_sequence() {
        let slots: Vec<DecodedRecord> = vec![
            Ok(data(0, &[1])),
            Err(MalformedRecord::OddLength { digits: 3 }),
            Ok(HexRecord::end_of_file()),
        ];
        let validator = FileValidator::new(ValidationMode::CollectAll);
        let report = validator.validate_decoded(&slots);
        assert_eq!(
            report.issues(),
            &[ValidationIssue::MalformedRecord {
                line: 2,
                reason: MalformedRecord::OddLength { digits: 3 }
            }]
        );
        assert!(report.checksum_passed(1));
        assert!(!report.checksum_passed(2));
        assert!(report.checksum_passed(3));
    }

    #[test]
    fn test_malformed_last_slot_is_not_eof() {
        let slots: Vec<DecodedRecord> = vec![Err(MalformedRecord::Empty)];
        let report = FileValidator::new(ValidationMode::CollectAll).validate_decoded(&slots);
        assert_eq!(
            report.issues()[0],
            ValidationIssue::MissingEof {
                line: 1,
                found: None
            }
        );
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn test_check_end_of_file() {
        assert_eq!(
            check_end_of_file(&[]),
            Some(ValidationIssue::MissingEof {
                line: 0,
                found: None
            })
        );
        assert_eq!(
            check_end_of_file(&[HexRecord::end_of_file(), data(0, &[1])]),
            Some(ValidationIssue::MissingEof {
                line: 2,
                found: Some(0x00)
            })
        );
        assert_eq!(
            check_end_of_file(&[data(0, &[1]), HexRecord::end_of_file()]),
            None
        );
    }

    #[test]
    fn test_fail_fast_stops_at_malformed_slot() {
        let mut later = data(1, &[2]);
        later.checksum ^= 0x01;
        let slots: Vec<DecodedRecord> = vec![
            Ok(data(0, &[1])),
            Err(MalformedRecord::TooShort { pairs: 2 }),
            Ok(later),
            Ok(HexRecord::end_of_file()),
        ];
        let report = FileValidator::new(ValidationMode::FailFast).validate_decoded(&slots);
        assert_eq!(
            report.issues(),
            &[ValidationIssue::MalformedRecord {
                line: 2,
                reason: MalformedRecord::TooShort { pairs: 2 }
            }]
        );
        assert!(report.stopped_early());
        assert_eq!(report.records_checked(), 2);
        assert!(report.checksum_passed(1));
        assert!(!report.checksum_passed(2));
        assert!(!report.checksum_passed(3));
    }

    #[test]
    fn test_length_issue_alone_still_passes_checksum() {
        let records = vec![
            with_byte_count(data(0, &[1, 2]), 1),
            HexRecord::end_of_file(),
        ];

        let all = validate(&records, ValidationMode::CollectAll);
        assert_eq!(all.total(), 1);
        assert!(all.checksum_passed(1));
        assert!(all.checksum_passed(2));

        let fast = validate(&records, ValidationMode::FailFast);
        assert!(!fast.checksum_passed(1));
        assert!(!fast.checksum_passed(2));
    }

    #[test]
    fn test_issue_messages() {
        let issue = ValidationIssue::ChecksumMismatch {
            line: 1,
            expected: 0xE2,
            actual: 0xEE,
        };
        assert_eq!(
            issue.to_string(),
            "Checksum line 1: failed, expected 0xE2, obtained 0xEE"
        );

        let issue = ValidationIssue::MissingEof {
            line: 4,
            found: Some(0x00),
        };
        assert_eq!(
            issue.to_string(),
            "Wrong data formatting: 0x01 expected at index 3 in line 4; obtained 0x00 (data)"
        );

        let issue = ValidationIssue::MissingEof {
            line: 1,
            found: Some(0x7F),
        };
        assert!(issue.to_string().ends_with("obtained 0x7F"));
    }
}
