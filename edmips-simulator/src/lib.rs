//! A single-cycle MIPS32 simulator.
//!
//! [`Memory`] is a sparse big-endian byte address space; [`Processor`] fetches,
//! decodes, and executes one instruction per [`Processor::step`], reporting
//! anything unusual through an [`Exceptions`] bitmask instead of failing.

mod exception;
mod instruction;
mod memory;
mod operations;
mod processor;
mod registers;

pub use {exception::*, instruction::*, memory::*, processor::*, registers::*};
