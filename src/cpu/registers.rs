//! Hack CPU registers.
//!
//! The Hack CPU has three registers:
//! - A: address/data register, also the jump target
//! - D: data register
//! - PC: program counter into the instruction ROM

use crate::cpu::memory::Word;
use serde::{Serialize, Deserialize};

/// The Hack register file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    pub a: Word,
    pub d: Word,
    pub pc: u16,
}

impl Registers {
    /// Create a new register file with all registers zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart execution at address 0. A and D keep their values.
    pub fn reset(&mut self) {
        self.pc = 0;
    }

    #[inline]
    pub fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }

    /// Jump to the address held in A.
    ///
    /// A negative A becomes a PC above the ROM, which the next fetch
    /// reports as a bad address.
    #[inline]
    pub fn jump_to_a(&mut self) {
        self.pc = self.a as u16;
    }
}

impl std::fmt::Display for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "A={} D={} PC={}", self.a, self.d, self.pc)
    }
}
