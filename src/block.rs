use crate::WordWidth;
use crate::image::ImageError;

/// A contiguous run of words starting at `start_address`.
///
/// Offsets and sizes are in words of the block's width. Blocks are only
/// reshaped by the owning [`crate::FirmwareImage`], which keeps them sorted and
/// disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlock {
    start_address: u32,
    data: Vec<u8>,
    width: WordWidth,
}

impl MemoryBlock {
    pub(crate) fn new(start_address: u32, data: Vec<u8>, width: WordWidth) -> Self {
        debug_assert!(
            data.len().is_multiple_of(width.word_bytes()),
            "block data is not a whole number of words"
        );
        Self {
            start_address,
            data,
            width,
        }
    }

    pub fn start_address(&self) -> u32 {
        self.start_address
    }

    /// One past the last word of the block.
    pub fn end_address(&self) -> u32 {
        self.start_address + self.size()
    }

    /// Size in words.
    pub fn size(&self) -> u32 {
        (self.data.len() / self.width.word_bytes()) as u32
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> WordWidth {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True if `address` lies within the block or exactly at either edge.
    pub fn touches(&self, address: u32) -> bool {
        self.start_address <= address && address <= self.end_address()
    }

    /// True if the block holds every word of `start..end`.
    pub fn covers(&self, start: u32, end: u32) -> bool {
        self.start_address <= start && end <= self.end_address()
    }

    /// Bytes of `words` words starting `offset` words into the block.
    pub(crate) fn words(&self, offset: u32, words: u32) -> &[u8] {
        let from = self.width.words_to_bytes(offset);
        &self.data[from..from + self.width.words_to_bytes(words)]
    }

    /// Bytes from `offset` words into the block to its end.
    pub(crate) fn words_from(&self, offset: u32) -> &[u8] {
        let from = self.width.words_to_bytes(offset).min(self.data.len());
        &self.data[from..]
    }

    /// Write `data` at a word offset relative to the start address.
    ///
    /// A non-negative offset up to the block size overwrites in place and
    /// extends the tail as needed. A negative offset whose data still reaches
    /// the block moves the start address back and replaces the covered head.
    pub(crate) fn write_at_offset(&mut self, offset: i64, data: &[u8]) -> Result<(), ImageError> {
        let words = self.width.bytes_to_words(data.len())?;
        let size = i64::from(self.size());
        let end_offset = offset + i64::from(words);

        if (0..=size).contains(&offset) {
            let from = self.width.words_to_bytes(offset as u32);
            let to = self.width.words_to_bytes(end_offset.min(size) as u32);
            self.data.splice(from..to, data.iter().copied());
            Ok(())
        } else if offset < 0 && end_offset >= 0 {
            let disjoint = ImageError::RegionDisjoint {
                offset,
                words,
                size: self.size(),
            };
            let shift = u32::try_from(-offset).map_err(|_| disjoint.clone())?;
            self.start_address = self.start_address.checked_sub(shift).ok_or(disjoint)?;

            let covered = self.width.words_to_bytes(end_offset.min(size) as u32);
            self.data.splice(..covered, data.iter().copied());
            Ok(())
        } else {
            Err(ImageError::RegionDisjoint {
                offset,
                words,
                size: self.size(),
            })
        }
    }

    pub(crate) fn append(&mut self, tail: &[u8]) {
        debug_assert!(tail.len().is_multiple_of(self.width.word_bytes()));
        self.data.extend_from_slice(tail);
    }

    /// Extend the tail by `words` words of `fill_byte`.
    pub(crate) fn pad(&mut self, words: u32, fill_byte: u8) {
        self.data
            .extend(std::iter::repeat_n(fill_byte, self.width.words_to_bytes(words)));
    }

    /// Drop the first `offset` words, advancing the start address.
    pub(crate) fn trim_before(&mut self, offset: u32) {
        let offset = offset.min(self.size());
        self.data.drain(..self.width.words_to_bytes(offset));
        self.start_address += offset;
    }

    /// Drop every word from `offset` onward.
    pub(crate) fn trim_after(&mut self, offset: u32) {
        self.data.truncate(self.width.words_to_bytes(offset));
    }
}
