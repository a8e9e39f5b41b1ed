use crate::exception::Exceptions;
use crate::instruction::Instruction;
use crate::memory::Memory;
use crate::registers::Registers;
use edmips_types::constants::{
    FUNCTION_ADD, FUNCTION_ADDU, FUNCTION_AND, FUNCTION_BREAK, FUNCTION_JR, FUNCTION_NOR,
    FUNCTION_OR, FUNCTION_SLL, FUNCTION_SLLV, FUNCTION_SLT, FUNCTION_SLTU, FUNCTION_SRA,
    FUNCTION_SRAV, FUNCTION_SRL, FUNCTION_SRLV, FUNCTION_SUB, FUNCTION_SUBU, FUNCTION_SYSCALL,
    FUNCTION_XOR, GLOBAL_POINTER, OP_ADDI, OP_ADDIU, OP_ANDI, OP_BEQ, OP_BNE, OP_J, OP_JAL,
    OP_LB, OP_LBU, OP_LH, OP_LHU, OP_LUI, OP_LW, OP_ORI, OP_R_TYPE, OP_SB, OP_SH, OP_SLTI,
    OP_SLTIU, OP_SW, OP_XORI, REG_GP, REG_SP, STACK_START, TEXT_START,
};
use std::fmt;
use std::fmt::{Debug, Formatter};

/// Snapshot handed to the step observer after any step that raised an
/// exception or halted the processor.
#[derive(Copy, Clone, Debug)]
pub struct StepEvent {
    /// Address of the instruction the step executed
    pub pc: u32,
    pub cycle: u64,
    pub exceptions: Exceptions,
    pub halted: bool,
}

type Observer = Box<dyn FnMut(&StepEvent)>;

/// A single-cycle MIPS processor. It owns its memory for the duration of
/// execution; inspectors read state between steps.
pub struct Processor {
    pub(crate) registers: Registers,
    pub(crate) program_counter: u32,
    pub(crate) next_program_counter: u32,
    pub(crate) cycle: u64,
    pub(crate) halted: bool,
    pub(crate) memory: Memory,
    observer: Option<Observer>,
}

impl Processor {
    pub fn new(memory: Memory) -> Self {
        let mut processor = Processor {
            registers: Registers::new(),
            program_counter: 0,
            next_program_counter: 0,
            cycle: 0,
            halted: false,
            memory,
            observer: None,
        };
        processor.reset();
        processor
    }

    /// Restore the architectural state to its power-on values. Memory pages
    /// are kept as-is; `reset` never recreates them.
    pub fn reset(&mut self) {
        self.registers = Registers::new();
        self.registers.set(REG_GP, GLOBAL_POINTER);
        self.registers.set(REG_SP, STACK_START);
        self.program_counter = TEXT_START;
        self.next_program_counter = TEXT_START.wrapping_add(4);
        self.cycle = 0;
        self.halted = false;
    }

    /// Start execution at a non-default address (e.g. a relocated text base)
    pub fn set_entry(&mut self, address: u32) {
        self.program_counter = address;
        self.next_program_counter = address.wrapping_add(4);
    }

    pub fn pc(&self) -> u32 {
        self.program_counter
    }

    /// Number of instructions executed since the last reset
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Install a callback fired after any step whose exception mask is
    /// non-empty or that halted the processor.
    pub fn set_observer(&mut self, observer: impl FnMut(&StepEvent) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Fetch, decode, and execute one instruction. Returns the exceptions the
    /// instruction raised; [`Exceptions::NONE`] on a clean step.
    pub fn step(&mut self) -> Exceptions {
        self.registers.clear_zero();

        let pc = self.program_counter;
        let instruction = Instruction(self.memory.get_word(pc));
        log::debug!("0x{:08x}  {}", pc, instruction.stringify(pc));
        self.next_program_counter = pc.wrapping_add(4);

        let mut exceptions = self.execute(instruction);
        self.cycle += 1;

        // A syscall halts in place; everything else publishes the next PC,
        // rounded up to a word boundary if an instruction misaligned it.
        if !self.halted {
            if self.next_program_counter % 4 != 0 {
                exceptions |= Exceptions::PC_ALIGN;
                self.next_program_counter = (self.next_program_counter.wrapping_add(3)) & !3;
            }
            self.program_counter = self.next_program_counter;
        }

        self.registers.clear_zero();

        if !exceptions.is_clear() || self.halted {
            let event = StepEvent {
                pc,
                cycle: self.cycle,
                exceptions,
                halted: self.halted,
            };
            if let Some(observer) = &mut self.observer {
                observer(&event);
            }
        }

        exceptions
    }

    fn execute(&mut self, instruction: Instruction) -> Exceptions {
        match instruction.op_code() {
            OP_R_TYPE => match instruction.function() {
                FUNCTION_SLL => self.op_sll(instruction),
                FUNCTION_SRL => self.op_srl(instruction),
                FUNCTION_SRA => self.op_sra(instruction),
                FUNCTION_SLLV => self.op_sllv(instruction),
                FUNCTION_SRLV => self.op_srlv(instruction),
                FUNCTION_SRAV => self.op_srav(instruction),
                FUNCTION_JR => self.op_jr(instruction),
                FUNCTION_SYSCALL => self.op_syscall(),
                FUNCTION_BREAK => self.op_break(),
                FUNCTION_ADD => self.op_add(instruction),
                FUNCTION_ADDU => self.op_addu(instruction),
                FUNCTION_SUB => self.op_sub(instruction),
                FUNCTION_SUBU => self.op_subu(instruction),
                FUNCTION_AND => self.op_and(instruction),
                FUNCTION_OR => self.op_or(instruction),
                FUNCTION_XOR => self.op_xor(instruction),
                FUNCTION_NOR => self.op_nor(instruction),
                FUNCTION_SLT => self.op_slt(instruction),
                FUNCTION_SLTU => self.op_sltu(instruction),
                _ => Exceptions::INVALID_INST,
            },
            OP_J => self.op_j(instruction),
            OP_JAL => self.op_jal(instruction),
            OP_BEQ => self.op_beq(instruction),
            OP_BNE => self.op_bne(instruction),
            OP_ADDI => self.op_addi(instruction),
            OP_ADDIU => self.op_addiu(instruction),
            OP_SLTI => self.op_slti(instruction),
            OP_SLTIU => self.op_sltiu(instruction),
            OP_ANDI => self.op_andi(instruction),
            OP_ORI => self.op_ori(instruction),
            OP_XORI => self.op_xori(instruction),
            OP_LUI => self.op_lui(instruction),
            OP_LB => self.op_lb(instruction),
            OP_LBU => self.op_lbu(instruction),
            OP_LH => self.op_lh(instruction),
            OP_LHU => self.op_lhu(instruction),
            OP_LW => self.op_lw(instruction),
            OP_SB => self.op_sb(instruction),
            OP_SH => self.op_sh(instruction),
            OP_SW => self.op_sw(instruction),
            _ => Exceptions::INVALID_INST,
        }
    }
}

impl Debug for Processor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("pc", &format_args!("0x{:08x}", self.program_counter))
            .field("cycle", &self.cycle)
            .field("halted", &self.halted)
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}
