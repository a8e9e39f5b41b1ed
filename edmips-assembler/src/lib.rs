//! A two-pass MIPS32 assembler.
//!
//! [`assemble`] turns assembly source into an [`AssemblyImage`]: the encoded
//! text segment, the packed data segment, the symbol table, and a source map.
//! The first pass assigns addresses and collects symbols; the second pass
//! resolves forward references and emits the images.

mod builder;
mod config;
mod encode;
mod errors;
mod ir;
mod lexer;

pub use config::AssemblerConfig;
pub use errors::AsmError;

pub use edmips_types::image::AssemblyImage;

use builder::ImageBuilder;

/// Assemble MIPS source into an image. The whole call fails on the first
/// error; errors carry the 1-based source line they were raised on.
pub fn assemble(source: &str, config: &AssemblerConfig) -> Result<AssemblyImage, AsmError> {
    let lines = lexer::tokenize(source)?;

    let mut builder = ImageBuilder::new(config);
    builder.first_pass(&lines)?;
    builder.second_pass()
}
