use thiserror::Error;

/// An error raised while assembling. Every variant carries the 1-based source
/// line it was raised on; the whole assembly is abandoned on the first error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AsmError {
    #[error("line {line}: unexpected syntax at '{text}'")]
    Syntax { line: usize, text: String },

    #[error("line {line}: unknown instruction '{mnemonic}'")]
    UnknownInstruction { line: usize, mnemonic: String },

    #[error("line {line}: '{mnemonic}' is a multi-instruction pseudo-op; use explicit lui/ori instead")]
    UnsupportedPseudo { line: usize, mnemonic: String },

    #[error("line {line}: wrong operands for '{name}'")]
    BadOperands { line: usize, name: String },

    #[error("line {line}: invalid register '${name}'")]
    InvalidRegister { line: usize, name: String },

    #[error("line {line}: cannot parse literal '{text}'")]
    BadLiteral { line: usize, text: String },

    #[error("line {line}: duplicate definition of label '{label}'")]
    DuplicateLabel { line: usize, label: String },

    #[error("line {line}: instructions are only allowed in the .text segment")]
    InstructionOutsideText { line: usize },

    #[error("line {line}: immediate {value} is out of range")]
    ImmediateOutOfRange { line: usize, value: i64 },

    #[error("line {line}: shift amount {value} is out of range (0-31)")]
    ShiftOutOfRange { line: usize, value: i64 },

    #[error("line {line}: branch target '{label}' is out of range")]
    BranchOutOfRange { line: usize, label: String },

    #[error("line {line}: jump target '{label}' (0x{address:08x}) is not word-aligned")]
    UnalignedJumpTarget {
        line: usize,
        label: String,
        address: u32,
    },

    #[error("line {line}: undefined symbol '{symbol}'")]
    UndefinedSymbol { line: usize, symbol: String },

    #[error("line {line}: trailing tokens after a complete statement")]
    TrailingTokens { line: usize },
}

impl AsmError {
    /// The source line the error was raised on
    pub fn line(&self) -> usize {
        match self {
            AsmError::Syntax { line, .. }
            | AsmError::UnknownInstruction { line, .. }
            | AsmError::UnsupportedPseudo { line, .. }
            | AsmError::BadOperands { line, .. }
            | AsmError::InvalidRegister { line, .. }
            | AsmError::BadLiteral { line, .. }
            | AsmError::DuplicateLabel { line, .. }
            | AsmError::InstructionOutsideText { line }
            | AsmError::ImmediateOutOfRange { line, .. }
            | AsmError::ShiftOutOfRange { line, .. }
            | AsmError::BranchOutOfRange { line, .. }
            | AsmError::UnalignedJumpTarget { line, .. }
            | AsmError::UndefinedSymbol { line, .. }
            | AsmError::TrailingTokens { line } => *line,
        }
    }
}
