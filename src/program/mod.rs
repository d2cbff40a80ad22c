//! Program files and disassembly.
//!
//! This module provides:
//! - The `.hack` text format (load and save)
//! - A disassembler (words → Hack mnemonics)

pub mod hack;
pub mod disasm;

pub use hack::{load_hack, parse_hack, save_hack, to_hack_line, ProgramError};
pub use disasm::{disassemble, disassemble_word};
