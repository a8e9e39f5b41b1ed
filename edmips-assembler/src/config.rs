use edmips_types::constants::{DATA_START, TEXT_START};

/// Where the assembler places the two segments.
#[derive(Clone, Debug)]
pub struct AssemblerConfig {
    pub text_start_addr: u32,
    pub data_start_addr: u32,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            text_start_addr: TEXT_START,
            data_start_addr: DATA_START,
        }
    }
}
