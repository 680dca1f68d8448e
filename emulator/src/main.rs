use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use libemulator::syscall::SyscallTable;
use libemulator::tracer::Tracer;
use libemulator::{loader, Emulator};

/// Memory words available to a running program.
const MEMORY_SIZE: usize = 300;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the assembled program file.
    program: PathBuf,

    /// Write a per-instruction trace log to this path.
    #[arg(short, long)]
    trace_log: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let program = loader::load_program_file(&args.program, MEMORY_SIZE)?;

    let mut tracer = match &args.trace_log {
        Some(path) => Some(
            Tracer::new(path)
                .with_context(|| format!("Creating trace log {}", path.display()))?,
        ),
        None => None,
    };

    let mut emulator = Emulator::new(
        MEMORY_SIZE,
        program.segments,
        SyscallTable::new(),
        tracer.as_mut(),
    )
    .context("Initializing the machine")?;

    emulator.load_data(&program.data);
    emulator.load_program(&program.instructions);

    emulator.run().context("Program raised a fatal error")?;

    Ok(())
}
