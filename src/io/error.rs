use thiserror::Error;

use crate::image::ImageError;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid start code at line {line}: '{char}' ({code:02X}h)")]
    InvalidStartCode { line: usize, char: char, code: u32 },

    #[error("invalid hexadecimal value at line {line}: '{char}'")]
    InvalidHexDigit { line: usize, char: char },

    #[error("truncated record at line {line}")]
    TruncatedRecord { line: usize },

    #[error("invalid record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("invalid record length at line {line}: declared {declared}, found {actual}")]
    RecordLength {
        line: usize,
        declared: usize,
        actual: usize,
    },

    #[error("invalid checksum at line {line} (expected: {expected:02X}h, reported: {actual:02X}h)")]
    ChecksumMismatch {
        line: usize,
        expected: u8,
        actual: u8,
    },

    #[error("invalid data length for 'Extended Linear Address' record at line {line}: {length}")]
    ExtendedAddressLength { line: usize, length: usize },

    #[error("record found after EOF record at line {line}")]
    RecordAfterEof { line: usize },

    #[error("unsupported record type '{record_type:02X}h' at line {line}")]
    UnsupportedRecordType { line: usize, record_type: u8 },

    #[error("cannot apply data record at line {line}")]
    Data { line: usize, source: ImageError },

    #[error(transparent)]
    Image(#[from] ImageError),
}
