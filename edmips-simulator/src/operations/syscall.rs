use crate::exception::Exceptions;
use crate::Processor;

impl Processor {
    /// The only supported system call halts the processor in place; the PC is
    /// left pointing at the syscall itself.
    pub(crate) fn op_syscall(&mut self) -> Exceptions {
        log::debug!("syscall: halting at 0x{:08x}", self.program_counter);
        self.halted = true;
        Exceptions::SYSCALL
    }
}
