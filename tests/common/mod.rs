#![allow(dead_code)]

use std::collections::BTreeMap;

use fwimage::{FirmwareImage, WordWidth};

pub fn layout(image: &FirmwareImage) -> Vec<(u32, Vec<u8>)> {
    image
        .blocks()
        .iter()
        .map(|b| (b.start_address(), b.data().to_vec()))
        .collect()
}

pub fn assert_invariants(image: &FirmwareImage) {
    for block in image.blocks() {
        assert!(!block.is_empty(), "empty block at {:#X}", block.start_address());
    }
    for pair in image.blocks().windows(2) {
        assert!(
            pair[0].end_address() < pair[1].start_address(),
            "blocks touch or overlap: {:#X}..{:#X} and {:#X}",
            pair[0].start_address(),
            pair[0].end_address(),
            pair[1].start_address()
        );
    }
}

/// Small deterministic generator so edit sequences are reproducible.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    pub fn below(&mut self, n: u32) -> u32 {
        self.next_u32() % n
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next_u32() as u8).collect()
    }
}

/// Word-by-word reference of what an image should hold.
pub struct ReferenceModel {
    width: WordWidth,
    words: BTreeMap<u32, Vec<u8>>,
}

impl ReferenceModel {
    pub fn new(width: WordWidth) -> Self {
        Self {
            width,
            words: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, address: u32, data: &[u8]) {
        for (i, word) in data.chunks(self.width.word_bytes()).enumerate() {
            self.words.insert(address + i as u32, word.to_vec());
        }
    }

    pub fn erase(&mut self, address: u32, size: u32) {
        let end = address.saturating_add(size);
        let doomed: Vec<u32> = self.words.range(address..end).map(|(&a, _)| a).collect();
        for a in doomed {
            self.words.remove(&a);
        }
    }

    /// Maximal runs of consecutive defined words.
    pub fn runs(&self) -> Vec<(u32, Vec<u8>)> {
        let mut runs: Vec<(u32, Vec<u8>)> = Vec::new();
        let mut next_address = None;
        for (&address, word) in &self.words {
            if next_address == Some(address)
                && let Some((_, data)) = runs.last_mut()
            {
                data.extend_from_slice(word);
            } else {
                runs.push((address, word.clone()));
            }
            next_address = Some(address + 1);
        }
        runs
    }
}
