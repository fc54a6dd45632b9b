use super::ParseError;
use crate::{FirmwareImage, WordWidth};

#[derive(Debug, Clone)]
pub struct BinaryWriteOptions {
    /// Byte used for every gap word between blocks.
    pub fill_byte: u8,
}

impl Default for BinaryWriteOptions {
    fn default() -> Self {
        Self { fill_byte: 0xFF }
    }
}

/// Load a raw binary blob as one block at `base_address`.
///
/// The resulting image is marked as having implicit addresses.
pub fn parse_binary(
    data: &[u8],
    base_address: u32,
    width: WordWidth,
) -> Result<FirmwareImage, ParseError> {
    let mut image = FirmwareImage::new(false, width);
    image.set_data(base_address, data)?;
    Ok(image)
}

/// Flatten the image into one blob from its lowest address, gaps filled.
pub fn write_binary(image: &FirmwareImage, options: &BinaryWriteOptions) -> Vec<u8> {
    let filled = image.fill_data(options.fill_byte);
    let total_len: usize = filled.iter().map(|b| b.data().len()).sum();
    let mut out = Vec::with_capacity(total_len);
    for block in &filled {
        out.extend_from_slice(block.data());
    }
    out
}
