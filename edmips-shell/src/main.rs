use edmips_assembler::{assemble, AssemblerConfig};
use edmips_shell::debugger::Debugger;
use edmips_shell::driver::Driver;
use edmips_simulator::{Instruction, Memory, Processor};
use edmips_types::constants::REGISTER_NAMES;
use std::error::Error;
use std::fs;
use std::num::ParseIntError;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
struct CliArgs {
    /// Drop into the interactive debugger instead of running to completion
    #[structopt(long, short)]
    interactive: bool,

    /// Print each instruction before executing it
    #[structopt(long)]
    trace: bool,

    /// Stop after this many steps
    #[structopt(long)]
    step_limit: Option<u64>,

    /// Base address of the text segment
    #[structopt(long, parse(try_from_str = parse_address), default_value = "0x00040000")]
    text_start: u32,

    /// Base address of the data segment
    #[structopt(long, parse(try_from_str = parse_address), default_value = "0x10000000")]
    data_start: u32,

    #[structopt(parse(from_os_str))]
    file_path: PathBuf,
}

fn parse_address(src: &str) -> Result<u32, ParseIntError> {
    match src.strip_prefix("0x").or_else(|| src.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => src.parse(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Setup logging and parse CLI args
    env_logger::init();
    let args = CliArgs::from_args();

    // Assemble the source and load the image
    let source = fs::read_to_string(&args.file_path)?;
    let image = assemble(
        &source,
        &AssemblerConfig {
            text_start_addr: args.text_start,
            data_start_addr: args.data_start,
        },
    )?;
    log::info!(
        "assembled {} text byte(s), {} data byte(s), {} symbol(s)",
        image.text_size(),
        image.data_size(),
        image.symbols.len()
    );

    let mut memory = Memory::new();
    memory.load_image(&image);

    let mut processor = Processor::new(memory);
    processor.set_entry(args.text_start);

    let mut driver = Driver::new(processor);
    driver.set_step_limit(args.step_limit);

    if args.interactive {
        let mut debugger = Debugger::new(driver);
        debugger.trace = args.trace;
        debugger.run()?;
        return Ok(());
    }

    if args.trace {
        run_traced(&mut driver);
    } else {
        let outcome = driver.run();
        println!(
            "{:?} after {} step(s), exceptions: {:?}",
            outcome.reason, outcome.steps, outcome.exceptions
        );
    }

    print_registers(driver.processor());
    Ok(())
}

/// Step one instruction at a time, printing each before it executes
fn run_traced(driver: &mut Driver) {
    loop {
        let processor = driver.processor();
        if processor.halted() {
            println!("Processor halted at 0x{:08x}", processor.pc());
            break;
        }

        let pc = processor.pc();
        let instruction = Instruction(processor.memory().get_word(pc));
        println!("0x{:08x}  {}", pc, instruction.stringify(pc));

        let exceptions = driver.processor_mut().step();
        if !exceptions.is_clear() {
            println!("exceptions: {:?}", exceptions);
            if !driver.processor().halted() {
                break;
            }
        }
    }
}

fn print_registers(processor: &Processor) {
    println!(
        "pc=0x{:08x}  cycle={}  halted={}",
        processor.pc(),
        processor.cycle(),
        processor.halted()
    );

    for (index, value) in processor.registers().as_array().iter().enumerate() {
        print!("{:>5}=0x{:08x}", REGISTER_NAMES[index], value);
        if index % 4 == 3 {
            println!();
        } else {
            print!("  ");
        }
    }
}
