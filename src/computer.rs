//! A fully wired Hack computer.
//!
//! Bundles the ROM, the address space with its screen and keyboard, and
//! the CPU, and keeps a keyboard handle for the front end.

use crate::cpu::{
    Address, AddressSpace, Cpu, CpuError, Instruction, Jump, MemoryError, ReadMemory, Registers,
    Rom, Word, WriteMemory,
};
use crate::cpu::decode::decode;
use crate::io::{Keyboard, KeyboardHandle, Screen};
use crate::program::{self, ProgramError};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// The CPU type used by [`Computer`].
pub type Machine = Cpu<Rom, AddressSpace<Screen, Keyboard>>;

/// A Hack computer with a loaded program.
#[derive(Debug)]
pub struct Computer {
    cpu: Machine,
    keys: KeyboardHandle,
}

impl Computer {
    /// Create a computer with an empty ROM.
    pub fn new() -> Self {
        let keyboard = Keyboard::new();
        let keys = keyboard.handle();
        let ram = AddressSpace::new(Screen::new(), keyboard);

        Self {
            cpu: Cpu::new(ram, Rom::new()),
            keys,
        }
    }

    /// Create a computer with `program` loaded at address 0.
    pub fn with_program(program: &[Word]) -> Result<Self, MemoryError> {
        let mut computer = Self::new();
        computer.load_program(program)?;
        Ok(computer)
    }

    /// Replace the program and restart at address 0.
    pub fn load_program(&mut self, program: &[Word]) -> Result<(), MemoryError> {
        self.cpu.rom_mut().load(program)?;
        self.cpu.reset();
        log::info!("loaded program of {} words", program.len());
        Ok(())
    }

    /// Load a `.hack` file and restart at address 0.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ProgramError> {
        let words = program::load_hack(path)?;
        self.load_program(&words)?;
        Ok(())
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<Instruction, CpuError> {
        self.cpu.step()
    }

    /// Execute up to `steps` instructions, returning how many ran.
    pub fn run_batch(&mut self, steps: u64) -> Result<u64, CpuError> {
        self.cpu.run_limited(steps)
    }

    /// Restart at address 0 without touching A, D or memory.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Zero working memory and the screen.
    pub fn clear_memory(&mut self) -> Result<(), MemoryError> {
        self.cpu.ram_mut().clear()
    }

    /// Read through the full address map (RAM, screen, keyboard).
    pub fn read_ram(&self, address: Address) -> Result<Word, MemoryError> {
        self.cpu.ram().read(address)
    }

    /// Write through the full address map.
    pub fn write_ram(&mut self, address: Address, word: Word) -> Result<(), MemoryError> {
        self.cpu.ram_mut().write(address, word)
    }

    /// Press a named key (see [`crate::io::key_code`]).
    pub fn key_down(&self, key: &str) -> bool {
        self.keys.press_key(key)
    }

    pub fn key_up(&self) {
        self.keys.release();
    }

    /// A handle for pressing keys from elsewhere, e.g. an input thread.
    pub fn keyboard(&self) -> KeyboardHandle {
        self.keys.clone()
    }

    pub fn screen(&self) -> &Screen {
        self.cpu.ram().screen()
    }

    pub fn cpu(&self) -> &Machine {
        &self.cpu
    }

    pub fn registers(&self) -> Registers {
        self.cpu.regs
    }

    /// Whether PC sits on the conventional end-of-program loop
    /// `(END) @END / 0;JMP`, which never makes progress.
    pub fn is_halted(&self) -> bool {
        let pc = self.cpu.pc();
        let at = |offset: u16| {
            self.cpu
                .rom()
                .read(pc.wrapping_add(offset).into())
                .ok()
                .and_then(|w| decode(w as u16).ok())
        };

        match (at(0), at(1)) {
            (Some(Instruction::Address(target)), Some(Instruction::Compute { dest, jump, .. })) => {
                target == pc && jump == Jump::Always && !dest.a && !dest.m
            }
            _ => false,
        }
    }

    /// Capture registers and non-zero working memory.
    pub fn snapshot(&self) -> Snapshot {
        let ram = self.cpu.ram().ram()
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w != 0)
            .map(|(addr, &w)| (addr as u16, w))
            .collect();

        Snapshot {
            registers: self.cpu.regs,
            cycles: self.cpu.cycles,
            ram,
        }
    }
}

impl Default for Computer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of machine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub registers: Registers,
    pub cycles: u64,
    /// Non-zero working-memory cells as `(address, value)`.
    pub ram: Vec<(u16, Word)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::KEYBOARD;
    use crate::program::parse_hack;

    const ADD: &str = include_str!("../testdata/add.hack");

    #[test]
    fn test_add_program() {
        let program = parse_hack(ADD).unwrap();
        let mut computer = Computer::with_program(&program).unwrap();

        computer.run_batch(6).unwrap();

        assert_eq!(computer.read_ram(0), Ok(5));
        assert!(computer.is_halted());
    }

    #[test]
    fn test_keyboard_is_mapped() {
        let mut computer = Computer::new();

        assert!(computer.key_down("ArrowLeft"));
        assert_eq!(computer.read_ram(KEYBOARD), Ok(130));
        computer.key_up();
        assert_eq!(computer.read_ram(KEYBOARD), Ok(0));
        assert!(computer.write_ram(KEYBOARD, 1).is_err());
    }

    #[test]
    fn test_screen_writes_land_in_framebuffer() {
        let mut computer = Computer::new();
        computer.write_ram(0x4000, 1).unwrap();
        assert!(computer.screen().pixel(0, 0));
    }

    #[test]
    fn test_clear_memory() {
        let mut computer = Computer::new();
        computer.write_ram(10, 3).unwrap();
        computer.write_ram(0x4001, 3).unwrap();

        computer.clear_memory().unwrap();

        assert_eq!(computer.read_ram(10), Ok(0));
        assert_eq!(computer.read_ram(0x4001), Ok(0));
    }

    #[test]
    fn test_snapshot() {
        let mut computer = Computer::new();
        computer.write_ram(3, 7).unwrap();

        let snapshot = computer.snapshot();
        assert_eq!(snapshot.ram, vec![(3, 7)]);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_not_halted_at_start() {
        let program = parse_hack(ADD).unwrap();
        let computer = Computer::with_program(&program).unwrap();
        assert!(!computer.is_halted());
    }
}
