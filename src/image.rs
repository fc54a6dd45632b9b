use log::debug;
use thiserror::Error;

use crate::{MemoryBlock, WordWidth};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("invalid bit width {0}: must be a positive multiple of 8")]
    InvalidBitWidth(u8),

    #[error("data length {length} is not aligned to the {word_bytes}-byte word size")]
    MisalignedData { length: usize, word_bytes: usize },

    #[error("data length {length} exceeds the 32-bit address space")]
    DataTooLarge { length: usize },

    #[error("region of {words} words at offset {offset} does not touch a block of {size} words")]
    RegionDisjoint { offset: i64, words: u32, size: u32 },

    #[error("internal error: overlapping blocks at address {address:#X}")]
    InvariantViolation { address: u32 },

    #[error("address overflow: {words} words at {address:#X} exceed the 32-bit address space")]
    AddressOverflow { address: u32, words: u32 },
}

/// Memory image of a device firmware as sparse blocks of words.
///
/// Blocks are kept sorted by start address and never overlap or touch:
/// writes coalesce with any block they reach, erases trim or split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareImage {
    has_explicit_addresses: bool,
    width: WordWidth,
    blocks: Vec<MemoryBlock>,
}

/// Blocks affected by a write, resolved before anything is mutated.
#[derive(Debug, Default)]
struct WritePlan {
    covered: Vec<usize>,
    start_block: Option<usize>,
    end_block: Option<usize>,
}

impl FirmwareImage {
    /// `has_explicit_addresses` records whether addresses came from the source
    /// (e.g. a hex file) or were assumed (e.g. a raw binary).
    pub fn new(has_explicit_addresses: bool, width: WordWidth) -> Self {
        Self {
            has_explicit_addresses,
            width,
            blocks: Vec::new(),
        }
    }

    pub fn has_explicit_addresses(&self) -> bool {
        self.has_explicit_addresses
    }

    pub fn width(&self) -> WordWidth {
        self.width
    }

    pub fn bit_width(&self) -> u8 {
        self.width.bits()
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<MemoryBlock> {
        self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn min_address(&self) -> Option<u32> {
        self.blocks.first().map(MemoryBlock::start_address)
    }

    /// One past the highest defined word.
    pub fn end_address(&self) -> Option<u32> {
        self.blocks.last().map(MemoryBlock::end_address)
    }

    pub fn total_bytes(&self) -> usize {
        self.blocks.iter().map(|b| b.data().len()).sum()
    }

    /// Write `data` at `start_address`, overwriting anything already there.
    ///
    /// Blocks the data overlaps or touches are merged into one; blocks it
    /// covers entirely are dropped. Empty data is a no-op.
    pub fn set_data(&mut self, start_address: u32, data: &[u8]) -> Result<(), ImageError> {
        if data.is_empty() {
            return Ok(());
        }

        let words = self.width.bytes_to_words(data.len())?;
        let end_address =
            start_address
                .checked_add(words)
                .ok_or(ImageError::AddressOverflow {
                    address: start_address,
                    words,
                })?;

        let mut plan = self.plan_write(start_address, end_address)?;

        match (plan.start_block, plan.end_block) {
            (Some(start_index), Some(end_index)) => {
                let end_block = &self.blocks[end_index];
                let tail = end_block
                    .words_from(end_address - end_block.start_address())
                    .to_vec();

                let block = &mut self.blocks[start_index];
                let offset = i64::from(start_address - block.start_address());
                block.write_at_offset(offset, data)?;
                block.append(&tail);

                plan.covered.push(end_index);
            }
            (Some(start_index), None) => {
                let block = &mut self.blocks[start_index];
                let offset = i64::from(start_address - block.start_address());
                block.write_at_offset(offset, data)?;
            }
            (None, Some(end_index)) => {
                let block = &mut self.blocks[end_index];
                let offset = -i64::from(block.start_address() - start_address);
                block.write_at_offset(offset, data)?;
            }
            (None, None) => {}
        }

        self.remove_blocks(&mut plan.covered);

        if plan.start_block.is_none() && plan.end_block.is_none() {
            let index = self
                .blocks
                .partition_point(|b| b.start_address() < start_address);
            self.blocks.insert(
                index,
                MemoryBlock::new(start_address, data.to_vec(), self.width),
            );
        }

        debug!(
            "set {words} words at {start_address:#X}..{end_address:#X}: {} removed, {} blocks",
            plan.covered.len(),
            self.blocks.len()
        );
        Ok(())
    }

    /// Remove `size` words starting at `start_address`.
    ///
    /// Blocks are trimmed, split or dropped as needed. A range reaching past
    /// the address space erases to the end of memory.
    pub fn erase_data(&mut self, start_address: u32, size: u32) {
        if size == 0 {
            return;
        }

        let end_address = start_address.saturating_add(size);
        let before = self.blocks.len();
        let mut blocks = Vec::with_capacity(before + 1);

        for mut block in std::mem::take(&mut self.blocks) {
            let block_start = block.start_address();
            let block_end = block.end_address();

            if block_start < start_address && block_end > end_address {
                let tail = block.words_from(end_address - block_start).to_vec();
                block.trim_after(start_address - block_start);
                blocks.push(block);
                blocks.push(MemoryBlock::new(end_address, tail, self.width));
            } else if block_start >= start_address && block_end <= end_address {
                continue;
            } else if block_start >= start_address && block_start < end_address {
                block.trim_before(end_address - block_start);
                blocks.push(block);
            } else if block_end > start_address && block_end <= end_address {
                block.trim_after(start_address - block_start);
                blocks.push(block);
            } else {
                blocks.push(block);
            }
        }

        self.blocks = blocks;
        debug!(
            "erased {size} words at {start_address:#X}: {before} -> {} blocks",
            self.blocks.len()
        );
    }

    /// Copy of `size` words at `start_address`, if a single block holds them all.
    pub fn get_data(&self, start_address: u32, size: u32) -> Option<Vec<u8>> {
        let end_address = start_address.checked_add(size)?;
        self.blocks
            .iter()
            .find(|b| b.covers(start_address, end_address))
            .map(|b| b.words(start_address - b.start_address(), size).to_vec())
    }

    fn plan_write(&self, start_address: u32, end_address: u32) -> Result<WritePlan, ImageError> {
        let mut plan = WritePlan::default();

        for (index, block) in self.blocks.iter().enumerate() {
            if block.start_address() >= start_address && block.end_address() <= end_address {
                plan.covered.push(index);
                continue;
            }
            if block.touches(start_address) && plan.start_block.replace(index).is_some() {
                return Err(ImageError::InvariantViolation {
                    address: start_address,
                });
            }
            if block.touches(end_address) && plan.end_block.replace(index).is_some() {
                return Err(ImageError::InvariantViolation {
                    address: end_address,
                });
            }
        }

        if plan.end_block == plan.start_block {
            plan.end_block = None;
        }
        Ok(plan)
    }

    fn remove_blocks(&mut self, indices: &mut [usize]) {
        if indices.is_empty() {
            return;
        }
        indices.sort_unstable();
        let mut index = 0;
        self.blocks.retain(|_| {
            let keep = indices.binary_search(&index).is_err();
            index += 1;
            keep
        });
    }
}
