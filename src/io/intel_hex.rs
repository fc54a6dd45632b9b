use log::{debug, trace};

use super::ParseError;
use crate::{FirmwareImage, WordWidth};

const RECORD_DATA: u8 = 0x00;
const RECORD_EOF: u8 = 0x01;
const RECORD_EXTENDED_LINEAR: u8 = 0x04;

/// Byte count, address (2), record type and checksum.
const RECORD_OVERHEAD: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct IntelHexReadOptions {
    /// Width of the words addressed by the records.
    pub width: WordWidth,
}

#[derive(Debug, Clone)]
pub struct IntelHexWriteOptions {
    /// Rounded down to whole words. 0 selects 16.
    pub bytes_per_line: u8,
}

impl Default for IntelHexWriteOptions {
    fn default() -> Self {
        Self { bytes_per_line: 32 }
    }
}

struct Record {
    address: u16,
    record_type: u8,
    data: Vec<u8>,
}

/// Parse Intel-HEX input into an image of 8-bit words.
pub fn parse_intel_hex(input: &[u8]) -> Result<FirmwareImage, ParseError> {
    parse_intel_hex_with(input, &IntelHexReadOptions::default())
}

/// Parse Intel-HEX input. Record addresses are word addresses of `options.width`.
///
/// Data records are applied in file order, so later records overwrite earlier
/// ones. Everything after the EOF record other than blank lines is rejected.
pub fn parse_intel_hex_with(
    input: &[u8],
    options: &IntelHexReadOptions,
) -> Result<FirmwareImage, ParseError> {
    let text = std::str::from_utf8(input).map_err(|e| ParseError::InvalidRecord {
        line: 1,
        message: format!("invalid UTF-8: {e}"),
    })?;

    let mut image = FirmwareImage::new(true, options.width);
    let mut upper_base: u32 = 0;
    let mut eof_seen = false;
    let mut data_records = 0usize;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if eof_seen {
            return Err(ParseError::RecordAfterEof { line: line_num });
        }

        let record = parse_record(line, line_num)?;

        match record.record_type {
            RECORD_DATA => {
                let address = upper_base | u32::from(record.address);
                trace!(
                    "line {line_num}: {} bytes at {address:#X}",
                    record.data.len()
                );
                image
                    .set_data(address, &record.data)
                    .map_err(|source| ParseError::Data {
                        line: line_num,
                        source,
                    })?;
                data_records += 1;
            }
            RECORD_EOF => {
                eof_seen = true;
            }
            RECORD_EXTENDED_LINEAR => {
                let [high, low] = record.data[..] else {
                    return Err(ParseError::ExtendedAddressLength {
                        line: line_num,
                        length: record.data.len(),
                    });
                };
                upper_base = u32::from(u16::from_be_bytes([high, low])) << 16;
                trace!("line {line_num}: upper address {upper_base:#X}");
            }
            record_type => {
                return Err(ParseError::UnsupportedRecordType {
                    line: line_num,
                    record_type,
                });
            }
        }
    }

    debug!(
        "parsed {data_records} data records into {} blocks",
        image.blocks().len()
    );
    Ok(image)
}

/// Write the image as Intel-HEX, using extended linear address records.
pub fn write_intel_hex(image: &FirmwareImage, options: &IntelHexWriteOptions) -> Vec<u8> {
    let word_bytes = image.width().word_bytes();
    let bytes_per_line = if options.bytes_per_line == 0 {
        16
    } else {
        options.bytes_per_line as usize
    };
    let words_per_line = (bytes_per_line / word_bytes).max(1);

    let mut output = Vec::new();
    let mut current_upper: u16 = 0;

    for block in image.blocks() {
        let mut address = block.start_address();
        let mut remaining = block.data();

        while !remaining.is_empty() {
            let upper = (address >> 16) as u16;
            if upper != current_upper {
                write_record(
                    &mut output,
                    RECORD_EXTENDED_LINEAR,
                    0,
                    &upper.to_be_bytes(),
                );
                current_upper = upper;
            }

            let offset = (address & 0xFFFF) as u16;
            let words_in_bank = 0x10000 - offset as usize;
            let words = words_per_line
                .min(words_in_bank)
                .min(remaining.len() / word_bytes);

            let (chunk, rest) = remaining.split_at(words * word_bytes);
            write_record(&mut output, RECORD_DATA, offset, chunk);

            remaining = rest;
            address = address.wrapping_add(words as u32);
        }
    }

    write_record(&mut output, RECORD_EOF, 0, &[]);
    debug!(
        "wrote {} blocks as {} bytes of Intel-HEX",
        image.blocks().len(),
        output.len()
    );
    output
}

fn parse_record(line: &str, line_num: usize) -> Result<Record, ParseError> {
    let Some(hex_str) = line.strip_prefix(':') else {
        let c = line.chars().next().unwrap_or_default();
        return Err(ParseError::InvalidStartCode {
            line: line_num,
            char: c,
            code: c as u32,
        });
    };

    if hex_str.len() < RECORD_OVERHEAD * 2 {
        return Err(ParseError::TruncatedRecord { line: line_num });
    }

    let bytes = parse_hex_bytes(hex_str, line_num)?;

    let declared = bytes[0] as usize;
    let actual = bytes.len() - RECORD_OVERHEAD;
    if declared != actual {
        return Err(ParseError::RecordLength {
            line: line_num,
            declared,
            actual,
        });
    }

    validate_checksum(&bytes, line_num)?;

    Ok(Record {
        address: u16::from_be_bytes([bytes[1], bytes[2]]),
        record_type: bytes[3],
        data: bytes[4..bytes.len() - 1].to_vec(),
    })
}

fn parse_hex_bytes(hex_str: &str, line_num: usize) -> Result<Vec<u8>, ParseError> {
    let mut out = Vec::with_capacity(hex_str.len() / 2);
    let mut high: Option<u8> = None;

    for c in hex_str.chars() {
        let digit = c.to_digit(16).ok_or(ParseError::InvalidHexDigit {
            line: line_num,
            char: c,
        })? as u8;
        match high.take() {
            Some(h) => out.push((h << 4) | digit),
            None => high = Some(digit),
        }
    }

    if high.is_some() {
        return Err(ParseError::InvalidRecord {
            line: line_num,
            message: "odd number of hex digits".to_string(),
        });
    }

    Ok(out)
}

fn validate_checksum(bytes: &[u8], line_num: usize) -> Result<(), ParseError> {
    let (&actual, body) = bytes
        .split_last()
        .ok_or(ParseError::TruncatedRecord { line: line_num })?;
    let expected = checksum(body);
    if expected != actual {
        return Err(ParseError::ChecksumMismatch {
            line: line_num,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Two's complement of the byte sum.
fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b))
        .wrapping_neg()
}

fn write_record(output: &mut Vec<u8>, record_type: u8, address: u16, data: &[u8]) {
    let mut record = Vec::with_capacity(data.len() + RECORD_OVERHEAD);
    record.push(data.len() as u8);
    record.extend_from_slice(&address.to_be_bytes());
    record.push(record_type);
    record.extend_from_slice(data);
    record.push(checksum(&record));

    output.push(b':');
    for &b in &record {
        write_hex_byte(output, b);
    }
    output.push(b'\n');
}

fn write_hex_byte(output: &mut Vec<u8>, byte: u8) {
    const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";
    output.push(HEX_CHARS[(byte >> 4) as usize]);
    output.push(HEX_CHARS[(byte & 0x0F) as usize]);
}
