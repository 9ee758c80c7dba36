pub mod cli;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod logging;
pub mod report;
pub mod source;
pub mod types;
pub mod validation;

pub use decoder::{DecodedRecord, decode_line, decode_lines, decode_records};
pub use engine::{
    DecodePolicy, FileOutcome, check_bytes, check_file, check_file_strict, check_files, run_file,
};
pub use error::{FatalError, MalformedRecord};
pub use types::{HexRecord, RecordType, checksum};
pub use validation::{
    FileValidator, ValidationIssue, ValidationMode, ValidationReport, validate,
};
