//! Turns raw text lines into [`HexRecord`]s.
//!
//! Only lines whose very first character is the start code are records;
//! everything else is skipped without consuming a record number.

use hex::FromHexError;
use tracing::trace;

use crate::error::{FatalError, MalformedRecord};
use crate::types::{HexRecord, START_CODE};

/// Outcome of decoding one record line. Position in a decoded sequence is
/// the record's 1-based line number minus one.
pub type DecodedRecord = Result<HexRecord, MalformedRecord>;

pub fn decode_line(raw_line: &str) -> Result<Option<HexRecord>, MalformedRecord> {
    if !raw_line.starts_with(START_CODE) {
        return Ok(None);
    }

    let payload = &raw_line.trim()[START_CODE.len_utf8()..];
    if payload.is_empty() {
        return Err(MalformedRecord::Empty);
    }

    // `hex` works on bytes, so a multibyte char would surface as a parity error.
    if let Some((index, character)) = payload
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(MalformedRecord::InvalidHexCharacter { character, index });
    }

    let bytes = hex::decode(payload).map_err(|e| match e {
        FromHexError::InvalidHexCharacter { c, index } => MalformedRecord::InvalidHexCharacter {
            character: c,
            index,
        },
        FromHexError::OddLength | FromHexError::InvalidStringLength => {
            MalformedRecord::OddLength {
                digits: payload.len(),
            }
        }
    })?;

    match bytes.as_slice() {
        [byte_count, hi, lo, record_type, data @ .., checksum] => Ok(Some(HexRecord {
            byte_count: *byte_count,
            address: u16::from_be_bytes([*hi, *lo]),
            record_type: *record_type,
            data: data.to_vec(),
            checksum: *checksum,
        })),
        short => Err(MalformedRecord::TooShort { pairs: short.len() }),
    }
}

/// Lenient whole-file decode: one slot per record line, malformed lines
/// included as `Err` slots so that later line numbers stay stable.
pub fn decode_lines<I, S>(lines: I) -> Vec<DecodedRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(idx, line)| match decode_line(line.as_ref()) {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                trace!(file_line = idx + 1, "skipping non-record line");
                None
            }
            Err(reason) => Some(Err(reason)),
        })
        .collect()
}

/// Strict whole-file decode: the first malformed record aborts with its
/// record line number.
pub fn decode_records<I, S>(lines: I) -> Result<Vec<HexRecord>, FatalError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    for line in lines {
        match decode_line(line.as_ref()) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(reason) => {
                return Err(FatalError::Malformed {
                    line: records.len() + 1,
                    reason,
                });
            }
        }
    }
    Ok(records)
}
