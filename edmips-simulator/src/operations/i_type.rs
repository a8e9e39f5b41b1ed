use crate::exception::Exceptions;
use crate::instruction::Instruction;
use crate::Processor;

impl Processor {
    /// Branch if equal. The shifted offset is applied to the branch's own
    /// address, not to the next instruction's.
    pub(crate) fn op_beq(&mut self, instruction: Instruction) -> Exceptions {
        let s = self.registers.get(instruction.s_register());
        let t = self.registers.get(instruction.t_register());

        if s == t {
            self.next_program_counter = self.branch_target(instruction);
        }
        Exceptions::NONE
    }

    /// Branch if not equal
    pub(crate) fn op_bne(&mut self, instruction: Instruction) -> Exceptions {
        let s = self.registers.get(instruction.s_register());
        let t = self.registers.get(instruction.t_register());

        if s != t {
            self.next_program_counter = self.branch_target(instruction);
        }
        Exceptions::NONE
    }

    fn branch_target(&self, instruction: Instruction) -> u32 {
        let offset = (instruction.immediate() as i32) << 2;
        self.program_counter.wrapping_add(offset as u32)
    }

    /// Add immediate (signed, traps on overflow). The destination still
    /// receives the wrapped value.
    pub(crate) fn op_addi(&mut self, instruction: Instruction) -> Exceptions {
        let a = self.registers.get(instruction.s_register()) as i32;
        let (value, overflow) = a.overflowing_add(instruction.immediate() as i32);
        self.registers.set(instruction.t_register(), value as u32);

        if overflow {
            Exceptions::INT_OVERFLOW
        } else {
            Exceptions::NONE
        }
    }

    /// Add immediate unsigned (wraps)
    pub(crate) fn op_addiu(&mut self, instruction: Instruction) -> Exceptions {
        let a = self.registers.get(instruction.s_register());
        let value = a.wrapping_add(instruction.immediate() as i32 as u32);
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Set if less than immediate (signed compare)
    pub(crate) fn op_slti(&mut self, instruction: Instruction) -> Exceptions {
        let a = self.registers.get(instruction.s_register()) as i32;
        let value = (a < instruction.immediate() as i32) as u32;
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Set if less than immediate (sign-extended, then unsigned compare)
    pub(crate) fn op_sltiu(&mut self, instruction: Instruction) -> Exceptions {
        let a = self.registers.get(instruction.s_register());
        let value = (a < instruction.immediate() as i32 as u32) as u32;
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// And immediate (zero-extended)
    pub(crate) fn op_andi(&mut self, instruction: Instruction) -> Exceptions {
        let a = self.registers.get(instruction.s_register());
        let value = a & instruction.immediate() as u16 as u32;
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Or immediate (zero-extended)
    pub(crate) fn op_ori(&mut self, instruction: Instruction) -> Exceptions {
        let a = self.registers.get(instruction.s_register());
        let value = a | instruction.immediate() as u16 as u32;
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Exclusive or immediate (zero-extended)
    pub(crate) fn op_xori(&mut self, instruction: Instruction) -> Exceptions {
        let a = self.registers.get(instruction.s_register());
        let value = a ^ instruction.immediate() as u16 as u32;
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Load upper immediate
    pub(crate) fn op_lui(&mut self, instruction: Instruction) -> Exceptions {
        let value = (instruction.immediate() as u16 as u32) << 16;
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Load byte (sign-extended)
    pub(crate) fn op_lb(&mut self, instruction: Instruction) -> Exceptions {
        let address = self.effective_address(instruction);
        let value = self.memory.get_byte(address) as i8 as i32 as u32;
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Load byte unsigned
    pub(crate) fn op_lbu(&mut self, instruction: Instruction) -> Exceptions {
        let address = self.effective_address(instruction);
        let value = self.memory.get_byte(address) as u32;
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Load halfword (sign-extended)
    pub(crate) fn op_lh(&mut self, instruction: Instruction) -> Exceptions {
        let address = self.effective_address(instruction);
        if address % 2 != 0 {
            return Exceptions::DATA_ALIGN;
        }

        let value = self.memory.get_half(address) as i16 as i32 as u32;
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Load halfword unsigned
    pub(crate) fn op_lhu(&mut self, instruction: Instruction) -> Exceptions {
        let address = self.effective_address(instruction);
        if address % 2 != 0 {
            return Exceptions::DATA_ALIGN;
        }

        let value = self.memory.get_half(address) as u32;
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Load word. Unaligned addresses raise DATA_ALIGN and touch nothing.
    pub(crate) fn op_lw(&mut self, instruction: Instruction) -> Exceptions {
        let address = self.effective_address(instruction);
        if address % 4 != 0 {
            return Exceptions::DATA_ALIGN;
        }

        let value = self.memory.get_word(address);
        self.registers.set(instruction.t_register(), value);
        Exceptions::NONE
    }

    /// Store byte
    pub(crate) fn op_sb(&mut self, instruction: Instruction) -> Exceptions {
        let address = self.effective_address(instruction);
        let value = self.registers.get(instruction.t_register());
        self.memory.set_byte(address, value as u8);
        Exceptions::NONE
    }

    /// Store halfword
    pub(crate) fn op_sh(&mut self, instruction: Instruction) -> Exceptions {
        let address = self.effective_address(instruction);
        if address % 2 != 0 {
            return Exceptions::DATA_ALIGN;
        }

        let value = self.registers.get(instruction.t_register());
        self.memory.set_half(address, value as u16);
        Exceptions::NONE
    }

    /// Store word. Unaligned addresses raise DATA_ALIGN and touch nothing.
    pub(crate) fn op_sw(&mut self, instruction: Instruction) -> Exceptions {
        let address = self.effective_address(instruction);
        if address % 4 != 0 {
            return Exceptions::DATA_ALIGN;
        }

        let value = self.registers.get(instruction.t_register());
        self.memory.set_word(address, value);
        Exceptions::NONE
    }

    /// Base register plus sign-extended displacement
    fn effective_address(&self, instruction: Instruction) -> u32 {
        let base = self.registers.get(instruction.s_register());
        base.wrapping_add(instruction.immediate() as i32 as u32)
    }
}
