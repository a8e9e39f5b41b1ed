use edmips_types::image::AssemblyImage;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// 64 KiB pages
const PAGE_SIZE: usize = 64 * 1024;

/// An implementation of paged memory. Pages are materialised lazily on first
/// write; reads of unmapped addresses return 0 without allocating.
#[derive(Default)]
pub struct Memory {
    /// Pages indexed by the top 16 bits of the address
    pages: HashMap<u32, [u8; PAGE_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the byte at the address
    #[inline]
    pub fn get_byte(&self, address: u32) -> u8 {
        if let Some(page) = self.pages.get(&(address >> 16)) {
            page[(address & 0xFFFF) as usize]
        } else {
            0
        }
    }

    /// Get the bytes in the address range
    fn get_range<const N: usize>(&self, address: u32) -> [u8; N] {
        let mut bytes = [0; N];

        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.get_byte(address.wrapping_add(i as u32));
        }

        bytes
    }

    /// Get the halfword (2 bytes) at the address
    pub fn get_half(&self, address: u32) -> u16 {
        u16::from_be_bytes(self.get_range(address))
    }

    /// Get the word (4 bytes) at the address
    pub fn get_word(&self, address: u32) -> u32 {
        u32::from_be_bytes(self.get_range(address))
    }

    /// Set a byte at the address
    #[inline(always)]
    pub fn set_byte(&mut self, address: u32, value: u8) {
        let page = self
            .pages
            .entry(address >> 16)
            .or_insert_with(|| [0; PAGE_SIZE]);

        page[(address & 0xFFFF) as usize] = value;
    }

    /// Set a halfword (2 bytes) at the address
    pub fn set_half(&mut self, address: u32, value: u16) {
        for (i, byte) in value.to_be_bytes().iter().enumerate() {
            self.set_byte(address.wrapping_add(i as u32), *byte);
        }
    }

    /// Set a word (4 bytes) at the address
    pub fn set_word(&mut self, address: u32, value: u32) {
        for (i, byte) in value.to_be_bytes().iter().enumerate() {
            self.set_byte(address.wrapping_add(i as u32), *byte);
        }
    }

    /// Copy out `len` bytes starting at `start`
    pub fn dump(&self, start: u32, len: u32) -> Vec<u8> {
        (0..len)
            .map(|i| self.get_byte(start.wrapping_add(i)))
            .collect()
    }

    /// Copy an assembled image into memory: data bytes at `data_start`, text
    /// words (big-endian) at `text_start`.
    pub fn load_image(&mut self, image: &AssemblyImage) {
        for (i, byte) in image.data_bytes.iter().enumerate() {
            self.set_byte(image.data_start.wrapping_add(i as u32), *byte);
        }

        for (i, word) in image.text_words.iter().enumerate() {
            self.set_word(image.text_start.wrapping_add(4 * i as u32), *word);
        }
    }

    /// Number of pages that have been materialised
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl Debug for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Memory({} pages)", self.pages.len())
    }
}
