use edmips_types::constants::{
    FUNCTION_ADD, FUNCTION_ADDU, FUNCTION_AND, FUNCTION_BREAK, FUNCTION_JR, FUNCTION_NOR,
    FUNCTION_OR, FUNCTION_SLL, FUNCTION_SLLV, FUNCTION_SLT, FUNCTION_SLTU, FUNCTION_SRA,
    FUNCTION_SRAV, FUNCTION_SRL, FUNCTION_SRLV, FUNCTION_SUB, FUNCTION_SUBU, FUNCTION_SYSCALL,
    FUNCTION_XOR, OP_ADDI, OP_ADDIU, OP_ANDI, OP_BEQ, OP_BNE, OP_J, OP_JAL, OP_LB, OP_LBU, OP_LH,
    OP_LHU, OP_LUI, OP_LW, OP_ORI, OP_R_TYPE, OP_SB, OP_SH, OP_SLTI, OP_SLTIU, OP_SW, OP_XORI,
    REGISTER_NAMES,
};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A MIPS instruction
#[derive(Copy, Clone, Debug)]
pub struct Instruction(pub u32);

impl Instruction {
    /// Get the operation code
    pub fn op_code(&self) -> u8 {
        ((self.0 & 0xFC00_0000) >> 26) as u8
    }

    /// Get the s register (for R and I type instructions)
    pub fn s_register(&self) -> u8 {
        ((self.0 & 0x03E0_0000) >> 21) as u8
    }

    /// Get the t register (for R and I type instructions)
    pub fn t_register(&self) -> u8 {
        ((self.0 & 0x001F_0000) >> 16) as u8
    }

    /// Get the d register (for R type instructions)
    pub fn d_register(&self) -> u8 {
        ((self.0 & 0x0000_F800) >> 11) as u8
    }

    /// Get the shift amount (for R type instructions)
    pub fn shift_amount(&self) -> u8 {
        ((self.0 & 0x0000_07C0) >> 6) as u8
    }

    /// Get the ALU function (for R type instructions)
    pub fn function(&self) -> u8 {
        (self.0 & 0x0000_003F) as u8
    }

    /// Get the immediate value (for I type instructions)
    pub fn immediate(&self) -> i16 {
        (self.0 & 0x0000_FFFF) as i16
    }

    /// Get the pseudo address (for J type instructions)
    pub fn pseudo_address(&self) -> u32 {
        self.0 & 0x03FF_FFFF
    }

    /// Convert the pseudo address to a full address. The upper four bits are
    /// taken from the program counter and the lower two bits are zeros.
    pub fn real_address(&self, program_counter: u32) -> u32 {
        (0xF000_0000 & program_counter) | (self.pseudo_address() << 2)
    }

    /// Decode and format the instruction. Unknown encodings render as a raw
    /// `.word` instead of failing.
    pub fn stringify(&self, program_counter: u32) -> String {
        match self.op_code() {
            OP_R_TYPE => self.stringify_r_type(),
            OP_J => format!("j 0x{:x}", self.real_address(program_counter)),
            OP_JAL => format!("jal 0x{:x}", self.real_address(program_counter)),
            OP_BEQ => self.branch("beq"),
            OP_BNE => self.branch("bne"),
            OP_ADDI => self.arith_immediate("addi"),
            OP_ADDIU => self.arith_immediate("addiu"),
            OP_SLTI => self.arith_immediate("slti"),
            OP_SLTIU => self.arith_immediate("sltiu"),
            OP_ANDI => self.logic_immediate("andi"),
            OP_ORI => self.logic_immediate("ori"),
            OP_XORI => self.logic_immediate("xori"),
            OP_LUI => format!(
                "lui {}, 0x{:x}",
                Register(self.t_register()),
                self.immediate() as u16
            ),
            OP_LB => self.load_store("lb"),
            OP_LBU => self.load_store("lbu"),
            OP_LH => self.load_store("lh"),
            OP_LHU => self.load_store("lhu"),
            OP_LW => self.load_store("lw"),
            OP_SB => self.load_store("sb"),
            OP_SH => self.load_store("sh"),
            OP_SW => self.load_store("sw"),
            _ => format!(".word 0x{:08x}", self.0),
        }
    }

    fn stringify_r_type(&self) -> String {
        match self.function() {
            FUNCTION_SLL if self.0 == 0 => "nop".to_string(),
            FUNCTION_SLL => self.constant_shift("sll"),
            FUNCTION_SRL => self.constant_shift("srl"),
            FUNCTION_SRA => self.constant_shift("sra"),
            FUNCTION_SLLV => self.variable_shift("sllv"),
            FUNCTION_SRLV => self.variable_shift("srlv"),
            FUNCTION_SRAV => self.variable_shift("srav"),
            FUNCTION_JR => format!("jr {}", Register(self.s_register())),
            FUNCTION_SYSCALL => "syscall".to_string(),
            FUNCTION_BREAK => "break".to_string(),
            FUNCTION_ADD => self.three_regs("add"),
            FUNCTION_ADDU => self.three_regs("addu"),
            FUNCTION_SUB => self.three_regs("sub"),
            FUNCTION_SUBU => self.three_regs("subu"),
            FUNCTION_AND => self.three_regs("and"),
            FUNCTION_OR => self.three_regs("or"),
            FUNCTION_XOR => self.three_regs("xor"),
            FUNCTION_NOR => self.three_regs("nor"),
            FUNCTION_SLT => self.three_regs("slt"),
            FUNCTION_SLTU => self.three_regs("sltu"),
            _ => format!(".word 0x{:08x}", self.0),
        }
    }

    fn three_regs(&self, mnemonic: &str) -> String {
        format!(
            "{} {}, {}, {}",
            mnemonic,
            Register(self.d_register()),
            Register(self.s_register()),
            Register(self.t_register())
        )
    }

    fn constant_shift(&self, mnemonic: &str) -> String {
        format!(
            "{} {}, {}, {}",
            mnemonic,
            Register(self.d_register()),
            Register(self.t_register()),
            self.shift_amount()
        )
    }

    fn variable_shift(&self, mnemonic: &str) -> String {
        format!(
            "{} {}, {}, {}",
            mnemonic,
            Register(self.d_register()),
            Register(self.t_register()),
            Register(self.s_register())
        )
    }

    fn branch(&self, mnemonic: &str) -> String {
        format!(
            "{} {}, {}, {}",
            mnemonic,
            Register(self.t_register()),
            Register(self.s_register()),
            self.immediate()
        )
    }

    fn arith_immediate(&self, mnemonic: &str) -> String {
        format!(
            "{} {}, {}, {}",
            mnemonic,
            Register(self.t_register()),
            Register(self.s_register()),
            self.immediate()
        )
    }

    fn logic_immediate(&self, mnemonic: &str) -> String {
        format!(
            "{} {}, {}, 0x{:x}",
            mnemonic,
            Register(self.t_register()),
            Register(self.s_register()),
            self.immediate() as u16
        )
    }

    fn load_store(&self, mnemonic: &str) -> String {
        format!(
            "{} {}, {}({})",
            mnemonic,
            Register(self.t_register()),
            self.immediate(),
            Register(self.s_register())
        )
    }
}

/// Pretty-print the register using its name
struct Register(u8);

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(REGISTER_NAMES[(self.0 & 0x1F) as usize])
    }
}
