//! Encode single instructions into MIPS machine words.
//!
//! Everything that can be encoded from the line alone is encoded here in
//! pass 1; instructions that need the symbol table come back as
//! [`InstructionStub::Unresolved`] and are finalised in pass 2.

use crate::errors::AsmError;
use crate::ir::{InstructionStub, UnresolvedInstruction, UnresolvedKind};
use crate::lexer::{parse_integer, Token};
use edmips_types::constants::{
    FUNCTION_ADD, FUNCTION_ADDU, FUNCTION_AND, FUNCTION_BREAK, FUNCTION_JR, FUNCTION_NOR,
    FUNCTION_OR, FUNCTION_SLL, FUNCTION_SLLV, FUNCTION_SLT, FUNCTION_SLTU, FUNCTION_SRA,
    FUNCTION_SRAV, FUNCTION_SRL, FUNCTION_SRLV, FUNCTION_SUB, FUNCTION_SUBU, FUNCTION_SYSCALL,
    FUNCTION_XOR, OP_ADDI, OP_ADDIU, OP_ANDI, OP_BEQ, OP_BNE, OP_J, OP_JAL, OP_LB, OP_LBU, OP_LH,
    OP_LHU, OP_LUI, OP_LW, OP_ORI, OP_R_TYPE, OP_SB, OP_SH, OP_SLTI, OP_SLTIU, OP_SW, OP_XORI,
    REGISTER_NAMES,
};
use either::Either;

/// Look up a register by number (`0`-`31`) or symbolic name (`t0`, `sp`,
/// `zero`, ...). Names arrive lowercased with the `$` already stripped.
pub(crate) fn parse_register(name: &str, line: usize) -> Result<u8, AsmError> {
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return match name.parse::<u8>() {
            Ok(number) if number < 32 => Ok(number),
            _ => Err(AsmError::InvalidRegister {
                line,
                name: name.to_string(),
            }),
        };
    }

    REGISTER_NAMES
        .iter()
        .position(|known| &known[1..] == name)
        .map(|index| index as u8)
        .ok_or_else(|| AsmError::InvalidRegister {
            line,
            name: name.to_string(),
        })
}

fn encode_r(rs: u8, rt: u8, rd: u8, shift: u8, function: u8) -> u32 {
    (OP_R_TYPE as u32) << 26
        | (rs as u32) << 21
        | (rt as u32) << 16
        | (rd as u32) << 11
        | (shift as u32) << 6
        | function as u32
}

fn encode_i(op_code: u8, rs: u8, rt: u8, immediate: u16) -> u32 {
    (op_code as u32) << 26 | (rs as u32) << 21 | (rt as u32) << 16 | immediate as u32
}

/// Cursor over an instruction's operand tokens. Kind and count mismatches
/// both surface as a single "wrong operands" error naming the mnemonic.
struct Operands<'a> {
    tokens: &'a [Token],
    next: usize,
    mnemonic: &'a str,
    line: usize,
}

impl<'a> Operands<'a> {
    fn new(tokens: &'a [Token], mnemonic: &'a str, line: usize) -> Self {
        Self {
            tokens,
            next: 0,
            mnemonic,
            line,
        }
    }

    fn mismatch(&self) -> AsmError {
        AsmError::BadOperands {
            line: self.line,
            name: self.mnemonic.to_string(),
        }
    }

    fn take(&mut self) -> Result<&'a Token, AsmError> {
        let token = self.tokens.get(self.next).ok_or_else(|| self.mismatch())?;
        self.next += 1;
        Ok(token)
    }

    fn register(&mut self) -> Result<u8, AsmError> {
        let line = self.line;
        match self.take()? {
            Token::RegOpr(name) => parse_register(name, line),
            _ => Err(self.mismatch()),
        }
    }

    fn integer(&mut self) -> Result<i64, AsmError> {
        let line = self.line;
        match self.take()? {
            Token::Integer(raw) => parse_integer(raw, line),
            _ => Err(self.mismatch()),
        }
    }

    fn compound(&mut self) -> Result<(i32, u8), AsmError> {
        let line = self.line;
        match self.take()? {
            Token::ComOpr { offset, reg } => Ok((*offset, parse_register(reg, line)?)),
            _ => Err(self.mismatch()),
        }
    }

    /// An operand slot that accepts an integer or a label reference.
    fn integer_or_label(&mut self) -> Result<Either<i64, String>, AsmError> {
        let line = self.line;
        match self.take()? {
            Token::Integer(raw) => Ok(Either::Left(parse_integer(raw, line)?)),
            Token::Word(label) => Ok(Either::Right(label.clone())),
            _ => Err(self.mismatch()),
        }
    }

    fn label(&mut self) -> Result<String, AsmError> {
        match self.take()? {
            Token::Word(label) => Ok(label.clone()),
            _ => Err(self.mismatch()),
        }
    }

    fn finish(&self) -> Result<(), AsmError> {
        if self.next == self.tokens.len() {
            Ok(())
        } else {
            Err(AsmError::TrailingTokens { line: self.line })
        }
    }
}

fn signed_immediate(value: i64, line: usize) -> Result<u16, AsmError> {
    if (-0x8000..=0x7FFF).contains(&value) {
        Ok(value as u16)
    } else {
        Err(AsmError::ImmediateOutOfRange { line, value })
    }
}

fn unsigned_immediate(value: i64, line: usize) -> Result<u16, AsmError> {
    if (0..=0xFFFF).contains(&value) {
        Ok(value as u16)
    } else {
        Err(AsmError::ImmediateOutOfRange { line, value })
    }
}

/// Encode one instruction, or park it as an unresolved stub if it references
/// a label. `addr` is the instruction's own (word-aligned) text address.
pub(crate) fn encode_instruction(
    mnemonic: &str,
    operands: &[Token],
    addr: u32,
    line: usize,
) -> Result<InstructionStub, AsmError> {
    let lowered = mnemonic.to_lowercase();
    let mut ops = Operands::new(operands, &lowered, line);

    let three_regs = |function: u8, ops: &mut Operands| -> Result<InstructionStub, AsmError> {
        let rd = ops.register()?;
        let rs = ops.register()?;
        let rt = ops.register()?;
        Ok(InstructionStub::Encoded(encode_r(rs, rt, rd, 0, function)))
    };

    let constant_shift = |function: u8, ops: &mut Operands| -> Result<InstructionStub, AsmError> {
        let rd = ops.register()?;
        let rt = ops.register()?;
        let amount = ops.integer()?;
        if !(0..=31).contains(&amount) {
            return Err(AsmError::ShiftOutOfRange {
                line,
                value: amount,
            });
        }
        Ok(InstructionStub::Encoded(encode_r(
            0,
            rt,
            rd,
            amount as u8,
            function,
        )))
    };

    let variable_shift = |function: u8, ops: &mut Operands| -> Result<InstructionStub, AsmError> {
        let rd = ops.register()?;
        let rt = ops.register()?;
        let rs = ops.register()?;
        Ok(InstructionStub::Encoded(encode_r(rs, rt, rd, 0, function)))
    };

    let arith_immediate = |op_code: u8, ops: &mut Operands| -> Result<InstructionStub, AsmError> {
        let rt = ops.register()?;
        let rs = ops.register()?;
        let immediate = signed_immediate(ops.integer()?, line)?;
        Ok(InstructionStub::Encoded(encode_i(op_code, rs, rt, immediate)))
    };

    let logic_immediate = |op_code: u8, ops: &mut Operands| -> Result<InstructionStub, AsmError> {
        let rt = ops.register()?;
        let rs = ops.register()?;
        let immediate = unsigned_immediate(ops.integer()?, line)?;
        Ok(InstructionStub::Encoded(encode_i(op_code, rs, rt, immediate)))
    };

    let load_store = |op_code: u8, ops: &mut Operands| -> Result<InstructionStub, AsmError> {
        let rt = ops.register()?;
        let (offset, rs) = ops.compound()?;
        let immediate = signed_immediate(offset as i64, line)?;
        Ok(InstructionStub::Encoded(encode_i(op_code, rs, rt, immediate)))
    };

    let branch = |op_code: u8, ops: &mut Operands| -> Result<InstructionStub, AsmError> {
        let rt = ops.register()?;
        let rs = ops.register()?;
        let label = ops.label()?;
        Ok(InstructionStub::Unresolved(UnresolvedInstruction {
            kind: UnresolvedKind::Branch,
            opcode: op_code,
            rs,
            rt,
            label,
            addr,
        }))
    };

    let jump = |op_code: u8, ops: &mut Operands| -> Result<InstructionStub, AsmError> {
        match ops.integer_or_label()? {
            Either::Left(target) => {
                if !(0..=u32::MAX as i64).contains(&target) {
                    return Err(AsmError::ImmediateOutOfRange {
                        line,
                        value: target,
                    });
                }
                let target = target as u32;
                if target % 4 != 0 {
                    return Err(AsmError::UnalignedJumpTarget {
                        line,
                        label: format!("0x{:x}", target),
                        address: target,
                    });
                }
                if (target ^ addr) & 0xF000_0000 != 0 {
                    log::warn!(
                        "line {}: jump target 0x{:08x} is outside the current 256 MiB region",
                        line,
                        target
                    );
                }
                Ok(InstructionStub::Encoded(
                    (op_code as u32) << 26 | (target >> 2) & 0x03FF_FFFF,
                ))
            }
            Either::Right(label) => Ok(InstructionStub::Unresolved(UnresolvedInstruction {
                kind: UnresolvedKind::Jump,
                opcode: op_code,
                rs: 0,
                rt: 0,
                label,
                addr,
            })),
        }
    };

    let stub = match lowered.as_str() {
        "add" => three_regs(FUNCTION_ADD, &mut ops)?,
        "addu" => three_regs(FUNCTION_ADDU, &mut ops)?,
        "sub" => three_regs(FUNCTION_SUB, &mut ops)?,
        "subu" => three_regs(FUNCTION_SUBU, &mut ops)?,
        "and" => three_regs(FUNCTION_AND, &mut ops)?,
        "or" => three_regs(FUNCTION_OR, &mut ops)?,
        "xor" => three_regs(FUNCTION_XOR, &mut ops)?,
        "nor" => three_regs(FUNCTION_NOR, &mut ops)?,
        "slt" => three_regs(FUNCTION_SLT, &mut ops)?,
        "sltu" => three_regs(FUNCTION_SLTU, &mut ops)?,

        "sll" => constant_shift(FUNCTION_SLL, &mut ops)?,
        "srl" => constant_shift(FUNCTION_SRL, &mut ops)?,
        "sra" => constant_shift(FUNCTION_SRA, &mut ops)?,
        "sllv" => variable_shift(FUNCTION_SLLV, &mut ops)?,
        "srlv" => variable_shift(FUNCTION_SRLV, &mut ops)?,
        "srav" => variable_shift(FUNCTION_SRAV, &mut ops)?,

        "jr" => {
            let rs = ops.register()?;
            InstructionStub::Encoded(encode_r(rs, 0, 0, 0, FUNCTION_JR))
        }
        "syscall" => InstructionStub::Encoded(FUNCTION_SYSCALL as u32),
        "break" => InstructionStub::Encoded(FUNCTION_BREAK as u32),

        // nop is sll $0, $0, 0: the all-zero word
        "nop" => InstructionStub::Encoded(0),
        // move $rt, $rs is addu $rt, $rs, $0
        "move" => {
            let rd = ops.register()?;
            let rs = ops.register()?;
            InstructionStub::Encoded(encode_r(rs, 0, rd, 0, FUNCTION_ADDU))
        }

        "addi" => arith_immediate(OP_ADDI, &mut ops)?,
        "addiu" => arith_immediate(OP_ADDIU, &mut ops)?,
        "slti" => arith_immediate(OP_SLTI, &mut ops)?,
        "sltiu" => arith_immediate(OP_SLTIU, &mut ops)?,
        "andi" => logic_immediate(OP_ANDI, &mut ops)?,
        "ori" => logic_immediate(OP_ORI, &mut ops)?,
        "xori" => logic_immediate(OP_XORI, &mut ops)?,

        "lui" => {
            let rt = ops.register()?;
            match ops.integer_or_label()? {
                Either::Left(value) => {
                    let immediate = unsigned_immediate(value, line)?;
                    InstructionStub::Encoded(encode_i(OP_LUI, 0, rt, immediate))
                }
                Either::Right(label) => InstructionStub::Unresolved(UnresolvedInstruction {
                    kind: UnresolvedKind::LuiLabel,
                    opcode: OP_LUI,
                    rs: 0,
                    rt,
                    label,
                    addr,
                }),
            }
        }

        "lb" => load_store(OP_LB, &mut ops)?,
        "lbu" => load_store(OP_LBU, &mut ops)?,
        "lh" => load_store(OP_LH, &mut ops)?,
        "lhu" => load_store(OP_LHU, &mut ops)?,
        "lw" => load_store(OP_LW, &mut ops)?,
        "sb" => load_store(OP_SB, &mut ops)?,
        "sh" => load_store(OP_SH, &mut ops)?,
        "sw" => load_store(OP_SW, &mut ops)?,

        "beq" => branch(OP_BEQ, &mut ops)?,
        "bne" => branch(OP_BNE, &mut ops)?,
        "j" => jump(OP_J, &mut ops)?,
        "jal" => jump(OP_JAL, &mut ops)?,

        "li" | "la" => {
            return Err(AsmError::UnsupportedPseudo {
                line,
                mnemonic: lowered.clone(),
            })
        }
        _ => {
            return Err(AsmError::UnknownInstruction {
                line,
                mnemonic: lowered.clone(),
            })
        }
    };

    ops.finish()?;
    Ok(stub)
}
