use crate::{FirmwareImage, MemoryBlock};

impl FirmwareImage {
    /// Blocks with every gap padded onto the end of the block before it.
    ///
    /// Each missing word becomes one word of `fill_byte`, so consecutive
    /// blocks in the result are address-contiguous. The last block is copied
    /// as is. The image itself is unchanged.
    pub fn fill_data(&self, fill_byte: u8) -> Vec<MemoryBlock> {
        fill_blocks(self.blocks(), fill_byte)
    }
}

fn fill_blocks(blocks: &[MemoryBlock], fill_byte: u8) -> Vec<MemoryBlock> {
    let mut filled = Vec::with_capacity(blocks.len());

    for pair in blocks.windows(2) {
        let mut block = pair[0].clone();
        let gap = pair[1].start_address() - block.end_address();
        if gap > 0 {
            block.pad(gap, fill_byte);
        }
        filled.push(block);
    }

    if let Some(last) = blocks.last() {
        filled.push(last.clone());
    }

    filled
}
