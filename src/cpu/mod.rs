//! CPU emulation for the Hack computer.
//!
//! This module implements the complete Hack architecture:
//! - 32K-word instruction ROM
//! - 16K words of RAM with a memory-mapped screen and keyboard
//! - 3 registers: A (address/data), D (data), PC
//! - A-instructions (load immediate) and C-instructions (ALU, dest, jump)

pub mod memory;
pub mod address_space;
pub mod registers;
pub mod alu;
pub mod decode;
pub mod execute;

pub use memory::{
    Address, MemoryError, ReadMemory, ReadWriteMemory, Rom, Word, WriteMemory, ROM_SIZE,
};
pub use address_space::{AddressSpace, KEYBOARD, RAM_SIZE, SCREEN_BASE, SCREEN_WORDS};
pub use registers::Registers;
pub use alu::AluOp;
pub use decode::{Dest, DecodeError, Instruction, Jump, Source};
pub use execute::{Cpu, CpuError};
