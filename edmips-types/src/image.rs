use std::collections::{BTreeMap, HashMap};

/// The output of a successful assembly: the text and data segment contents,
/// the resolved symbol table, and a map from emitted addresses back to the
/// 1-based source lines that produced them.
///
/// Images are ephemeral values; they only exist to be copied into a
/// simulator's memory.
#[derive(Clone, Debug, Default)]
pub struct AssemblyImage {
    /// Base address of the text segment
    pub text_start: u32,
    /// Encoded instructions, one word per text address step of 4
    pub text_words: Vec<u32>,
    /// Base address of the data segment
    pub data_start: u32,
    /// Raw data segment contents, big-endian packed
    pub data_bytes: Vec<u8>,
    /// Lowercased label -> resolved address
    pub symbols: HashMap<String, u32>,
    /// Emitted address -> source line number
    pub source_map: BTreeMap<u32, usize>,
}

impl AssemblyImage {
    /// Size of the text segment in bytes (always a multiple of 4)
    pub fn text_size(&self) -> u32 {
        (self.text_words.len() * 4) as u32
    }

    /// Size of the data segment in bytes
    pub fn data_size(&self) -> u32 {
        self.data_bytes.len() as u32
    }
}
