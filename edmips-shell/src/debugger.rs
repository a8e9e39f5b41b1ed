//! Interactive debugger REPL.

use crate::driver::Driver;
use edmips_simulator::Instruction;
use edmips_types::constants::REGISTER_NAMES;
use std::io;
use std::io::Write;

pub struct Debugger {
    pub driver: Driver,
    pub trace: bool,
}

impl Debugger {
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            trace: false,
        }
    }

    /// Run the debugger until the user exits
    pub fn run(&mut self) -> Result<(), io::Error> {
        loop {
            eprint!("edmips> ");
            io::stderr().flush()?;
            let mut input = String::new();

            if io::stdin().read_line(&mut input)? == 0 {
                break;
            }

            if !self.run_command(&input) {
                break;
            }
        }

        Ok(())
    }

    /// Run a command; returns false when the session should end
    pub fn run_command(&mut self, command: &str) -> bool {
        let command: Vec<&str> = command.trim().split_whitespace().collect();

        match command.as_slice() {
            ["step"] | ["s"] => self.step(),
            ["run"] => self.run_to_stop(),
            ["regs"] => self.print_registers(),
            ["mem", start, len] => self.dump_memory(start, len),
            ["trace", option] => self.set_trace(option),
            ["reset"] => {
                self.driver.processor_mut().reset();
                eprintln!("Processor reset");
            }
            ["exit"] | ["quit"] => return false,
            [] => {} // Ignore empty input
            _ => eprintln!("Commands: step (s), run, regs, mem START LEN, trace on|off, reset, exit"),
        }

        true
    }

    /// Execute the next instruction
    fn step(&mut self) {
        if self.trace {
            let processor = self.driver.processor();
            let instruction = Instruction(processor.memory().get_word(processor.pc()));
            eprintln!("0x{:08x}  {}", processor.pc(), instruction.stringify(processor.pc()));
        }

        let exceptions = self.driver.processor_mut().step();

        if !exceptions.is_clear() {
            eprintln!("exceptions: {:?}", exceptions);
        }
        if self.driver.processor().halted() {
            eprintln!("Processor halted");
        }
    }

    fn run_to_stop(&mut self) {
        let outcome = self.driver.run();
        eprintln!(
            "{:?} after {} step(s), pc=0x{:08x}, exceptions: {:?}",
            outcome.reason,
            outcome.steps,
            self.driver.processor().pc(),
            outcome.exceptions
        );
    }

    fn print_registers(&self) {
        let processor = self.driver.processor();
        eprintln!("pc=0x{:08x}  cycle={}  halted={}", processor.pc(), processor.cycle(), processor.halted());

        for (index, value) in processor.registers().as_array().iter().enumerate() {
            eprint!("{:>5}=0x{:08x}", REGISTER_NAMES[index], value);
            if index % 4 == 3 {
                eprintln!();
            }
        }
    }

    fn dump_memory(&self, start: &str, len: &str) {
        let (start, len) = match (parse_number(start), parse_number(len)) {
            (Some(start), Some(len)) => (start, len),
            _ => {
                eprintln!("Usage: mem START LEN (decimal or 0x hex)");
                return;
            }
        };

        let bytes = self.driver.processor().memory().dump(start, len);
        for (index, chunk) in bytes.chunks(16).enumerate() {
            let rendered: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            eprintln!("0x{:08x}  {}", start + 16 * index as u32, rendered.join(" "));
        }
    }

    /// Set the trace option
    fn set_trace(&mut self, option: &str) {
        match option {
            "on" => {
                self.trace = true;
                eprintln!("Instruction tracing is ON");
            }
            "off" => {
                self.trace = false;
                eprintln!("Instruction tracing is OFF");
            }
            _ => eprintln!("Usage: trace on|off"),
        }
    }
}

fn parse_number(src: &str) -> Option<u32> {
    match src.strip_prefix("0x").or_else(|| src.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => src.parse().ok(),
    }
}
