use anyhow::Result;
use clap::{Parser, ValueEnum};
use mica_backend_x86_64::X86_64Codegen;
use mica_codegen::{Abi, CodeGenerator};
use mica_frontend::parse_file;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
enum AbiArg {
    Linux,
    Macos,
}

#[derive(Parser, Debug)]
#[command(name = "micac")]
#[command(about = "Mica compiler", long_about = None)]
struct Cli {
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[arg(short, long, value_name = "FILE", default_value = "out.asm")]
    out: PathBuf,

    #[arg(long, value_enum, default_value = "linux")]
    abi: AbiArg,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut program = parse_file(&cli.input)?;
    log::info!("parsed {} top-level statements", program.body.len());

    let abi = match cli.abi {
        AbiArg::Linux => Abi::Linux,
        AbiArg::Macos => Abi::MacOs,
    };

    let mut gen = X86_64Codegen::new(abi);
    // The whole program is generated in memory first; the output file
    // is only written on full success, never left truncated.
    let asm = gen.generate(&mut program)?;
    fs::write(&cli.out, asm)?;
    println!("Wrote {}", cli.out.display());
    Ok(())
}
