//! Hack Emulator - CLI Entry Point
//!
//! Commands:
//! - `hack-emu run <program>` - Run a `.hack` file headless
//! - `hack-emu debug <program>` - Interactive debugger
//! - `hack-emu disasm <program>` - Disassemble a `.hack` file
//! - `hack-emu keys` - Print the key-code table

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hack-emu")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the 16-bit Hack computer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program headless
    Run {
        /// Path to the .hack file to execute
        program: PathBuf,
        /// JSON run configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Stop after this many instructions
        #[arg(short, long)]
        max_steps: Option<u64>,
        /// Instructions per tick
        #[arg(long)]
        steps_per_tick: Option<u64>,
        /// Run flat out instead of pacing ticks
        #[arg(long)]
        no_pace: bool,
        /// Keep running after the program reaches its end loop
        #[arg(long)]
        keep_going: bool,
        /// Print every executed instruction
        #[arg(short, long)]
        trace: bool,
        /// Preset a RAM cell before running, as ADDR=VALUE
        #[arg(long = "ram", value_parser = parse_assignment)]
        ram: Vec<(i32, i16)>,
        /// Print these RAM cells when done
        #[arg(long = "show")]
        show: Vec<i32>,
        /// Write a JSON snapshot of the final state
        #[arg(long)]
        dump: Option<PathBuf>,
    },
    /// Interactive debugger
    Debug {
        /// Path to the .hack file to debug
        program: PathBuf,
    },
    /// Disassemble a .hack file
    Disasm {
        /// Path to the .hack file
        program: PathBuf,
    },
    /// Print the key-code table
    Keys,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run {
            program,
            config,
            max_steps,
            steps_per_tick,
            no_pace,
            keep_going,
            trace,
            ram,
            show,
            dump,
        }) => {
            let options = RunOptions { max_steps, steps_per_tick, no_pace, keep_going };
            run_program(&program, config, options, trace, &ram, &show, dump)
        }
        Some(Commands::Debug { program }) => debug_program(&program),
        Some(Commands::Disasm { program }) => disassemble_file(&program),
        Some(Commands::Keys) => {
            print_keys();
            Ok(())
        }
        None => {
            println!("Hack Emulator v0.1.0");
            println!("A 16-bit Hack computer emulator");
            println!();
            println!("Use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

/// Parse `ADDR=VALUE`; both sides accept decimal or `0x` hex.
fn parse_assignment(s: &str) -> Result<(i32, i16), String> {
    let (addr, value) = s.split_once('=')
        .ok_or_else(|| format!("expected ADDR=VALUE, got {:?}", s))?;
    let addr = parse_number(addr)?;
    let value = parse_number(value)?;
    let value = i16::try_from(value)
        .or_else(|_| u16::try_from(value).map(|v| v as i16))
        .map_err(|_| format!("value {} does not fit in 16 bits", value))?;
    Ok((addr, value))
}

fn parse_number(s: &str) -> Result<i32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => i32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("{:?}: {}", s, e))
}

struct RunOptions {
    max_steps: Option<u64>,
    steps_per_tick: Option<u64>,
    no_pace: bool,
    keep_going: bool,
}

fn load_config(path: Option<PathBuf>, options: RunOptions) -> Result<hack::RunConfig> {
    let mut config = match path {
        Some(path) => hack::RunConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => hack::RunConfig::default(),
    };

    if options.max_steps.is_some() {
        config.max_steps = options.max_steps;
    }
    if let Some(steps) = options.steps_per_tick {
        config.steps_per_tick = steps;
    }
    if options.no_pace {
        config.paced = false;
    }
    if options.keep_going {
        config.stop_on_halt = false;
    }

    config.validate()?;
    Ok(config)
}

fn run_program(
    path: &PathBuf,
    config: Option<PathBuf>,
    options: RunOptions,
    trace: bool,
    ram: &[(i32, i16)],
    show: &[i32],
    dump: Option<PathBuf>,
) -> Result<()> {
    use hack::{Computer, Runner};

    let config = load_config(config, options)?;

    println!("🔧 Running: {}", path.display());

    let mut computer = Computer::new();
    computer.load_file(path)
        .with_context(|| format!("loading {}", path.display()))?;

    for &(addr, value) in ram {
        computer.write_ram(addr, value)
            .with_context(|| format!("presetting RAM[{}]", addr))?;
    }

    println!();
    println!("━━━ Execution ━━━");

    if trace {
        trace_program(&mut computer, &config)?;
    } else {
        let summary = Runner::new(config).run(&mut computer)?;
        println!(
            "Stopped: {:?} after {} steps ({} ticks)",
            summary.reason, summary.steps, summary.ticks
        );
    }

    let regs = computer.registers();
    println!();
    println!("━━━ Result ━━━");
    println!("Cycles: {}", computer.cpu().cycles);
    println!("A:  {}", regs.a);
    println!("D:  {}", regs.d);
    println!("PC: {}", regs.pc);

    for &addr in show {
        let value = computer.read_ram(addr)
            .with_context(|| format!("reading RAM[{}]", addr))?;
        println!("RAM[{}] = {}", addr, value);
    }

    if let Some(dump) = dump {
        let json = serde_json::to_string_pretty(&computer.snapshot())?;
        std::fs::write(&dump, json)
            .with_context(|| format!("writing {}", dump.display()))?;
        println!("✓ Snapshot saved to {}", dump.display());
    }

    Ok(())
}

/// Step one instruction at a time, printing each, with no pacing.
fn trace_program(computer: &mut hack::Computer, config: &hack::RunConfig) -> Result<()> {
    let limit = config.max_steps.unwrap_or(u64::MAX);
    let mut steps = 0u64;

    while steps < limit {
        if config.stop_on_halt && computer.is_halted() {
            println!("Halted after {} steps", steps);
            break;
        }

        let pc = computer.registers().pc;
        let instr = computer.step()
            .with_context(|| format!("CPU error at PC={}", pc))?;
        let regs = computer.registers();
        println!("{:05}: {:<16} A={} D={}", pc, instr.to_string(), regs.a, regs.d);
        steps += 1;
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn debug_program(path: &PathBuf) -> Result<()> {
    use hack::{load_hack, run_debugger};

    println!("🔍 Loading: {}", path.display());

    let words = load_hack(path)
        .with_context(|| format!("loading {}", path.display()))?;
    if words.is_empty() {
        bail!("no instructions to execute");
    }

    println!("📂 Loaded {} instructions", words.len());
    println!("🚀 Launching debugger...");

    run_debugger(words).context("debugger error")?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn debug_program(_path: &PathBuf) -> Result<()> {
    bail!("this build has no debugger; rebuild with the `tui` feature")
}

fn disassemble_file(path: &PathBuf) -> Result<()> {
    use hack::{disassemble, load_hack};

    println!("📖 Disassembling: {}", path.display());
    println!();

    let words = load_hack(path)
        .with_context(|| format!("loading {}", path.display()))?;
    println!("{}", disassemble(&words));
    Ok(())
}

fn print_keys() {
    use hack::io::NAMED_KEYS;

    println!("━━━ Hack key codes ━━━");
    println!("printable ASCII ' '..'~' → 32..126");
    for (name, code) in NAMED_KEYS {
        println!("{:<12} {}", name, code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("0=5"), Ok((0, 5)));
        assert_eq!(parse_assignment("0x4000=0xFFFF"), Ok((0x4000, -1)));
        assert_eq!(parse_assignment("3=-2"), Ok((3, -2)));
        assert!(parse_assignment("3").is_err());
        assert!(parse_assignment("3=70000").is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let options = RunOptions {
            max_steps: Some(10),
            steps_per_tick: Some(2),
            no_pace: true,
            keep_going: true,
        };

        let config = load_config(None, options).unwrap();

        assert_eq!(config.max_steps, Some(10));
        assert_eq!(config.steps_per_tick, 2);
        assert!(!config.paced);
        assert!(!config.stop_on_halt);
    }
}
