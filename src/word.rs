use crate::image::ImageError;

/// Width of the addressable unit of an image.
///
/// Addresses and sizes in the image API count words of this width; every
/// conversion between word counts and byte lengths goes through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordWidth {
    bits: u8,
}

impl WordWidth {
    /// 8-bit words: one address per byte.
    pub const BYTE: WordWidth = WordWidth { bits: 8 };

    /// Create a width from a bit count. Must be a positive multiple of 8.
    pub fn from_bits(bits: u8) -> Result<Self, ImageError> {
        if bits == 0 || !bits.is_multiple_of(8) {
            return Err(ImageError::InvalidBitWidth(bits));
        }
        Ok(Self { bits })
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn word_bytes(&self) -> usize {
        (self.bits / 8) as usize
    }

    pub fn words_to_bytes(&self, words: u32) -> usize {
        words as usize * self.word_bytes()
    }

    /// Number of whole words in `len` bytes. Errors on a partial word.
    pub fn bytes_to_words(&self, len: usize) -> Result<u32, ImageError> {
        let word_bytes = self.word_bytes();
        if !len.is_multiple_of(word_bytes) {
            return Err(ImageError::MisalignedData {
                length: len,
                word_bytes,
            });
        }
        u32::try_from(len / word_bytes).map_err(|_| ImageError::DataTooLarge { length: len })
    }
}

impl Default for WordWidth {
    fn default() -> Self {
        Self::BYTE
    }
}
