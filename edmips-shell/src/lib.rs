//! Driver and debugger shells around the edmips simulator.

pub mod debugger;
pub mod driver;
