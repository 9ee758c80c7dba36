use serde::Serialize;
use std::fmt;

pub const START_CODE: char = ':';

/// Pair index of the record type on a line, counted after the start code.
pub const RECORD_TYPE_IDX: usize = 3;

/// Byte count, two address bytes, record type and checksum.
pub const MIN_RECORD_PAIRS: usize = 5;

pub const EOF_RECORD_TYPE: u8 = 0x01;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Data = 0x00,
    EndOfFile = 0x01,
    ExtendedSegmentAddress = 0x02,
    StartSegmentAddress = 0x03,
    ExtendedLinearAddress = 0x04,
    StartLinearAddress = 0x05,
}

impl RecordType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(RecordType::Data),
            0x01 => Some(RecordType::EndOfFile),
            0x02 => Some(RecordType::ExtendedSegmentAddress),
            0x03 => Some(RecordType::StartSegmentAddress),
            0x04 => Some(RecordType::ExtendedLinearAddress),
            0x05 => Some(RecordType::StartLinearAddress),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordType::Data => "data",
            RecordType::EndOfFile => "end of file",
            RecordType::ExtendedSegmentAddress => "extended segment address",
            RecordType::StartSegmentAddress => "start segment address",
            RecordType::ExtendedLinearAddress => "extended linear address",
            RecordType::StartLinearAddress => "start linear address",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded record line. Fields hold what the file says, not what it
/// should say: `byte_count` and `checksum` are checked later against `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HexRecord {
    pub byte_count: u8,
    pub address: u16,
    pub record_type: u8,
    pub data: Vec<u8>,
    pub checksum: u8,
}

impl HexRecord {
    /// Builds a well-formed record. `data` longer than 255 bytes cannot be
    /// described by the byte count field, which then wraps.
    pub fn new(address: u16, record_type: u8, data: Vec<u8>) -> Self {
        let mut record = Self {
            byte_count: data.len() as u8,
            address,
            record_type,
            data,
            checksum: 0,
        };
        record.checksum = record.computed_checksum();
        record
    }

    pub fn end_of_file() -> Self {
        Self::new(0x0000, EOF_RECORD_TYPE, Vec::new())
    }

    #[inline]
    pub fn kind(&self) -> Option<RecordType> {
        RecordType::from_byte(self.record_type)
    }

    #[inline]
    pub fn is_end_of_file(&self) -> bool {
        self.record_type == EOF_RECORD_TYPE
    }

    #[inline]
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Every byte covered by the checksum, in line order.
    pub fn summed_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        let [hi, lo] = self.address.to_be_bytes();
        [self.byte_count, hi, lo, self.record_type]
            .into_iter()
            .chain(self.data.iter().copied())
    }

    pub fn computed_checksum(&self) -> u8 {
        checksum(self.summed_bytes())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(MIN_RECORD_PAIRS + self.data.len());
        bytes.extend(self.summed_bytes());
        bytes.push(self.checksum);
        bytes
    }

    /// Encodes the record back into its line form, uppercase, without a
    /// line terminator.
    pub fn to_line(&self) -> String {
        format!("{}{}", START_CODE, hex::encode_upper(self.to_bytes()))
    }
}

/// Two's complement of the low byte of the sum: `(256 - (sum & 0xFF)) & 0xFF`.
#[inline]
pub fn checksum(bytes: impl IntoIterator<Item = u8>) -> u8 {
    bytes
        .into_iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(byte))
        .wrapping_neg()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_matches_reference_formula() {
        let bytes = [0x04, 0x00, 0x00, 0x0C, 0x01, 0x02, 0x03, 0x04];
        let sum: u32 = bytes.iter().map(|&b| b as u32).sum();
        let reference = ((256 - (sum & 0xFF)) & 0xFF) as u8;
        assert_eq!(checksum(bytes), reference);
        assert_eq!(checksum(bytes), 0xE2);
    }

    #[test]
    fn test_checksum_of_zero_sum_is_zero() {
        assert_eq!(checksum([]), 0x00);
        assert_eq!(checksum([0x80, 0x80]), 0x00);
    }

    #[test]
    fn test_end_of_file_record_line() {
        let eof = HexRecord::end_of_file();
        assert!(eof.is_end_of_file());
        assert_eq!(eof.kind(), Some(RecordType::EndOfFile));
        assert_eq!(eof.to_line(), ":00000001FF");
    }

    #[test]
    fn test_new_record_is_consistent() {
        let record = HexRecord::new(0x0100, 0x00, vec![0x21, 0x46, 0x01]);
        assert_eq!(record.byte_count, 3);
        assert_eq!(record.to_line(), ":0301000021460194");
    }

    #[test]
    fn test_record_type_names() {
        assert_eq!(RecordType::from_byte(0x04), Some(RecordType::ExtendedLinearAddress));
        assert_eq!(RecordType::EndOfFile.to_string(), "end of file");
    }

    #[test]
    fn test_unknown_record_type_passes_through() {
        let record = HexRecord::new(0, 0x7F, vec![]);
        assert_eq!(record.kind(), None);
        assert_eq!(record.record_type, 0x7F);
    }
}
