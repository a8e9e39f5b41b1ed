use crate::exception::Exceptions;
use crate::instruction::Instruction;
use crate::Processor;
use edmips_types::constants::REG_RA;

impl Processor {
    pub(crate) fn op_j(&mut self, instruction: Instruction) -> Exceptions {
        self.next_program_counter = instruction.real_address(self.program_counter);
        Exceptions::NONE
    }

    pub(crate) fn op_jal(&mut self, instruction: Instruction) -> Exceptions {
        self.registers
            .set(REG_RA, self.program_counter.wrapping_add(4));
        self.next_program_counter = instruction.real_address(self.program_counter);
        Exceptions::NONE
    }
}
