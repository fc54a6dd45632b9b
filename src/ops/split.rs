use super::OpsError;
use crate::FirmwareImage;

const CRC32: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);

/// Fixed-size page of flattened image data, ready to program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBlock {
    /// Word address of the first byte.
    pub start_address: u32,
    pub data: Vec<u8>,
}

impl LineBlock {
    /// CRC-32 (ISO-HDLC) of the page contents.
    pub fn crc32(&self) -> u32 {
        CRC32.checksum(&self.data)
    }
}

impl FirmwareImage {
    /// Flatten the image with `fill_byte` and cut it into `chunk_size`-byte pages.
    ///
    /// Pages start at the lowest defined address and follow each other with no
    /// gaps; the last one is padded with `fill_byte` to full size.
    pub fn split_line_blocks(
        &self,
        chunk_size: usize,
        fill_byte: u8,
    ) -> Result<Vec<LineBlock>, OpsError> {
        let word_bytes = self.width().word_bytes();
        let invalid = || OpsError::InvalidChunkSize {
            chunk_size,
            word_bytes,
        };
        if chunk_size == 0 || !chunk_size.is_multiple_of(word_bytes) {
            return Err(invalid());
        }
        let chunk_words = u32::try_from(chunk_size / word_bytes).map_err(|_| invalid())?;

        let filled = self.fill_data(fill_byte);
        let Some(base_address) = filled.first().map(|b| b.start_address()) else {
            return Ok(Vec::new());
        };

        let total_len: usize = filled.iter().map(|b| b.data().len()).sum();
        let mut linear = Vec::with_capacity(total_len);
        for block in &filled {
            linear.extend_from_slice(block.data());
        }

        let mut lines = Vec::with_capacity(total_len.div_ceil(chunk_size));
        let mut address = base_address;
        for chunk in linear.chunks(chunk_size) {
            let mut data = chunk.to_vec();
            data.resize(chunk_size, fill_byte);
            lines.push(LineBlock {
                start_address: address,
                data,
            });
            address = address.saturating_add(chunk_words);
        }

        Ok(lines)
    }
}
