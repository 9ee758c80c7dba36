use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a colon-prefixed line could not be laid onto a record.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MalformedRecord {
    #[error("record is empty")]
    Empty,

    #[error("odd number of hex digits ({digits}), last pair is incomplete")]
    OddLength { digits: usize },

    #[error("invalid hex character {character:?} at position {index}")]
    InvalidHexCharacter { character: char, index: usize },

    #[error("record has {pairs} hex pairs, at least 5 are required")]
    TooShort { pairs: usize },
}

/// Failures of the environment around a run. These abort the run and are
/// never mixed into a validation report.
#[derive(Error, Debug)]
pub enum FatalError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No file selected")]
    NoFileSelected,

    #[error("File selection failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Malformed record at line {line}: {reason}")]
    Malformed { line: usize, reason: MalformedRecord },
}

impl FatalError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FatalError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FatalError>;
