//! Memory capabilities and the program ROM.
//!
//! Every memory-like component of the machine is expressed through three
//! small traits: [`ReadMemory`], [`WriteMemory`] and [`ReadWriteMemory`].
//! The execution engine and the address space only ever see these traits,
//! so the framebuffer and keyboard can be replaced per front end.

use thiserror::Error;

/// A 16-bit two's-complement machine word.
pub type Word = i16;

/// An address presented to a memory component.
///
/// Signed and wider than a word so that a negative `A` register is reported
/// as-is instead of silently wrapping into range.
pub type Address = i32;

/// Number of words in the instruction ROM.
pub const ROM_SIZE: usize = 0x8000;

/// Something a word can be read from.
pub trait ReadMemory {
    /// Read the word at `address`, failing with [`MemoryError::BadAddress`]
    /// when the address is outside this component.
    fn read(&self, address: Address) -> Result<Word, MemoryError>;
}

/// Something a word can be written to.
pub trait WriteMemory {
    /// Store `word` at `address`, failing with [`MemoryError::BadAddress`]
    /// when the address is outside this component.
    fn write(&mut self, address: Address, word: Word) -> Result<(), MemoryError>;
}

/// Both readable and writable.
pub trait ReadWriteMemory: ReadMemory + WriteMemory {}

impl<T: ReadMemory + WriteMemory + ?Sized> ReadWriteMemory for T {}

impl<T: ReadMemory + ?Sized> ReadMemory for Box<T> {
    fn read(&self, address: Address) -> Result<Word, MemoryError> {
        (**self).read(address)
    }
}

impl<T: WriteMemory + ?Sized> WriteMemory for Box<T> {
    fn write(&mut self, address: Address, word: Word) -> Result<(), MemoryError> {
        (**self).write(address, word)
    }
}

/// Map an address onto an index into a component of `len` cells.
pub(crate) fn index(address: Address, len: usize) -> Result<usize, MemoryError> {
    usize::try_from(address)
        .ok()
        .filter(|&i| i < len)
        .ok_or(MemoryError::BadAddress(address))
}

/// The 32K-word instruction store.
///
/// Read-only from the CPU's point of view; [`Rom::load`] is an
/// administrative operation done before execution starts.
#[derive(Clone)]
pub struct Rom {
    words: Vec<Word>,
}

impl Rom {
    /// Create a ROM filled with zeros (`@0` instructions).
    pub fn new() -> Self {
        Self {
            words: vec![0; ROM_SIZE],
        }
    }

    /// Create a ROM holding `program` at address 0.
    pub fn with_program(program: &[Word]) -> Result<Self, MemoryError> {
        let mut rom = Self::new();
        rom.load(program)?;
        Ok(rom)
    }

    /// Replace the ROM contents wholesale. Cells past the end of the
    /// program are zeroed.
    pub fn load(&mut self, program: &[Word]) -> Result<(), MemoryError> {
        if program.len() > ROM_SIZE {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                available: ROM_SIZE,
            });
        }

        self.words[..program.len()].copy_from_slice(program);
        self.words[program.len()..].fill(0);
        Ok(())
    }

    /// Raw view of the ROM contents.
    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

impl Default for Rom {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadMemory for Rom {
    #[inline]
    fn read(&self, address: Address) -> Result<Word, MemoryError> {
        let i = index(address, ROM_SIZE)?;
        Ok(self.words[i])
    }
}

impl std::fmt::Debug for Rom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1);
        f.debug_struct("Rom")
            .field("used_words", &used)
            .field("total_words", &ROM_SIZE)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Address is outside the component's valid range.
    #[error("invalid address {0} (0x{0:04X})")]
    BadAddress(Address),

    /// Program is too large to fit in the ROM.
    #[error("program size {size} exceeds available space {available}")]
    ProgramTooLarge { size: usize, available: usize },
}
