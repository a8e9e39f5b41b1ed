use edmips_assembler::{assemble, AssemblerConfig};
use std::error::Error;
use std::fs;
use std::num::ParseIntError;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
struct CliArgs {
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
    env_logger::init();
    let args = CliArgs::from_args();

    let source = fs::read_to_string(&args.file_path)?;
    let image = assemble(
        &source,
        &AssemblerConfig {
            text_start_addr: args.text_start,
            data_start_addr: args.data_start,
        },
    )?;

    println!("text ({} bytes):", image.text_size());
    for (index, word) in image.text_words.iter().enumerate() {
        let addr = image.text_start + 4 * index as u32;
        match image.source_map.get(&addr) {
            Some(line) => println!("  0x{:08x}  0x{:08x}  # line {}", addr, word, line),
            None => println!("  0x{:08x}  0x{:08x}", addr, word),
        }
    }

    println!("data ({} bytes):", image.data_size());
    for (index, chunk) in image.data_bytes.chunks(16).enumerate() {
        let addr = image.data_start + 16 * index as u32;
        let bytes: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        println!("  0x{:08x}  {}", addr, bytes.join(" "));
    }

    let mut symbols: Vec<_> = image.symbols.iter().collect();
    symbols.sort_by_key(|(_, &addr)| addr);
    println!("symbols:");
    for (name, addr) in symbols {
        println!("  0x{:08x}  {}", addr, name);
    }

    Ok(())
}
