//! # Hack Emulator
//!
//! An emulator of the 16-bit Hack computer: a two-register CPU executing
//! from a 32K-word ROM, with 16K words of RAM, a memory-mapped 512×256
//! monochrome screen and a memory-mapped keyboard register.
//!
//! The CPU only talks to memory through the [`ReadMemory`] and
//! [`WriteMemory`] traits, so front ends can supply their own screen and
//! keyboard devices.

pub mod cpu;
pub mod io;
pub mod program;
pub mod computer;
pub mod config;
pub mod runner;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use cpu::{
    AddressSpace, Cpu, CpuError, Instruction, MemoryError, ReadMemory, ReadWriteMemory, Registers,
    Rom, Word, WriteMemory,
};
pub use io::{key_code, Keyboard, KeyboardHandle, Screen};
pub use program::{disassemble, load_hack, parse_hack, save_hack, ProgramError};
pub use computer::{Computer, Snapshot};
pub use config::{ConfigError, RunConfig};
pub use runner::{RunSummary, Runner, StopReason};

#[cfg(feature = "tui")]
pub use tui::run_debugger;
