//! The data address space seen by the CPU.
//!
//! 16K words of working memory, followed by the memory-mapped screen and
//! the keyboard register:
//!
//! | range           | contents                          |
//! |-----------------|-----------------------------------|
//! | 0x0000..=0x3FFF | working memory                    |
//! | 0x4000..=0x5FFF | framebuffer (512×256, 1 bit/px)   |
//! | 0x6000          | keyboard register (read-only)     |

use crate::cpu::memory::{
    index, Address, MemoryError, ReadMemory, ReadWriteMemory, Word, WriteMemory,
};

/// Number of words of working memory.
pub const RAM_SIZE: usize = 0x4000;
/// First address of the framebuffer.
pub const SCREEN_BASE: Address = 0x4000;
/// Number of framebuffer words.
pub const SCREEN_WORDS: usize = 0x2000;
/// Address of the keyboard register, also the highest valid address.
pub const KEYBOARD: Address = 0x6000;

/// Working memory plus forwarding to the screen and keyboard collaborators.
#[derive(Clone)]
pub struct AddressSpace<S, K> {
    ram: Vec<Word>,
    screen: S,
    keyboard: K,
}

impl<S: ReadWriteMemory, K: ReadMemory> AddressSpace<S, K> {
    /// Create an address space with zeroed working memory.
    pub fn new(screen: S, keyboard: K) -> Self {
        Self {
            ram: vec![0; RAM_SIZE],
            screen,
            keyboard,
        }
    }

    /// Zero working memory and every framebuffer word.
    pub fn clear(&mut self) -> Result<(), MemoryError> {
        self.ram.fill(0);
        for offset in 0..SCREEN_WORDS as Address {
            self.screen.write(offset, 0)?;
        }
        log::debug!("cleared working memory and framebuffer");
        Ok(())
    }

    /// The working memory cells (0x0000..=0x3FFF).
    pub fn ram(&self) -> &[Word] {
        &self.ram
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }
}

impl<S: ReadWriteMemory, K: ReadMemory> ReadMemory for AddressSpace<S, K> {
    fn read(&self, address: Address) -> Result<Word, MemoryError> {
        match address {
            KEYBOARD => self.keyboard.read(0),
            SCREEN_BASE..=0x5FFF => self.screen.read(address - SCREEN_BASE),
            _ => {
                let i = index(address, RAM_SIZE)?;
                Ok(self.ram[i])
            }
        }
    }
}

impl<S: ReadWriteMemory, K: ReadMemory> WriteMemory for AddressSpace<S, K> {
    /// The keyboard register cannot be written from the machine side; a
    /// write to it fails like any other bad address.
    fn write(&mut self, address: Address, word: Word) -> Result<(), MemoryError> {
        match address {
            SCREEN_BASE..=0x5FFF => self.screen.write(address - SCREEN_BASE, word),
            _ => {
                let i = index(address, RAM_SIZE)?;
                self.ram[i] = word;
                Ok(())
            }
        }
    }
}

impl<S, K> std::fmt::Debug for AddressSpace<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_zero = self.ram.iter().filter(|&&w| w != 0).count();

        f.debug_struct("AddressSpace")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &RAM_SIZE)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    /// Framebuffer stand-in recording the last write.
    struct FakeScreen {
        cells: Vec<Word>,
        last_write: Option<(Address, Word)>,
    }

    impl FakeScreen {
        fn new() -> Self {
            Self {
                cells: vec![0; SCREEN_WORDS],
                last_write: None,
            }
        }
    }

    impl ReadMemory for FakeScreen {
        fn read(&self, address: Address) -> Result<Word, MemoryError> {
            let i = index(address, SCREEN_WORDS)?;
            Ok(self.cells[i])
        }
    }

    impl WriteMemory for FakeScreen {
        fn write(&mut self, address: Address, word: Word) -> Result<(), MemoryError> {
            let i = index(address, SCREEN_WORDS)?;
            self.cells[i] = word;
            self.last_write = Some((address, word));
            Ok(())
        }
    }

    /// Keyboard stand-in that counts reads.
    struct FakeKeyboard {
        code: Word,
        reads: Cell<usize>,
    }

    impl ReadMemory for FakeKeyboard {
        fn read(&self, address: Address) -> Result<Word, MemoryError> {
            self.reads.set(self.reads.get() + 1);
            match address {
                0 => Ok(self.code),
                _ => Err(MemoryError::BadAddress(address)),
            }
        }
    }

    fn space() -> AddressSpace<FakeScreen, FakeKeyboard> {
        let keyboard = FakeKeyboard {
            code: 75,
            reads: Cell::new(0),
        };
        AddressSpace::new(FakeScreen::new(), keyboard)
    }

    #[test]
    fn test_ram_read_write() {
        let mut mem = space();

        mem.write(0, 17).unwrap();
        mem.write(0x3FFF, -3).unwrap();

        assert_eq!(mem.read(0), Ok(17));
        assert_eq!(mem.read(0x3FFF), Ok(-3));
        assert!(mem.screen().last_write.is_none());
    }

    #[test]
    fn test_screen_is_translated() {
        let mut mem = space();

        mem.write(0x4000, 1).unwrap();
        mem.write(0x5FFF, 2).unwrap();

        assert_eq!(mem.screen().cells[0], 1);
        assert_eq!(mem.screen().cells[SCREEN_WORDS - 1], 2);
        assert_eq!(mem.screen().last_write, Some((0x1FFF, 2)));
        assert_eq!(mem.read(0x4000), Ok(1));
    }

    #[test]
    fn test_keyboard_read_goes_to_offset_zero() {
        let mem = space();

        assert_eq!(mem.read(KEYBOARD), Ok(75));
        assert_eq!(mem.keyboard().reads.get(), 1);
    }

    #[test]
    fn test_keyboard_write_is_rejected() {
        let mut mem = space();

        assert_eq!(mem.write(KEYBOARD, 1), Err(MemoryError::BadAddress(KEYBOARD)));
        assert!(mem.screen().last_write.is_none());
    }

    #[test]
    fn test_out_of_range() {
        let mut mem = space();

        assert_eq!(mem.read(0x6001), Err(MemoryError::BadAddress(0x6001)));
        assert_eq!(mem.read(-1), Err(MemoryError::BadAddress(-1)));
        assert_eq!(mem.write(0x7FFF, 0), Err(MemoryError::BadAddress(0x7FFF)));
    }

    #[test]
    fn test_clear() {
        let mut mem = space();
        mem.write(5, 5).unwrap();
        mem.write(0x4005, 5).unwrap();

        mem.clear().unwrap();

        assert_eq!(mem.read(5), Ok(0));
        assert_eq!(mem.read(0x4005), Ok(0));
    }

    #[test]
    fn test_trait_objects_can_be_injected() {
        let screen: Box<dyn ReadWriteMemory> = Box::new(FakeScreen::new());
        let keyboard: Box<dyn ReadMemory> = Box::new(FakeKeyboard {
            code: 0,
            reads: Cell::new(0),
        });
        let mut mem = AddressSpace::new(screen, keyboard);

        mem.write(0x4001, 9).unwrap();
        assert_eq!(mem.read(0x4001), Ok(9));
    }

    proptest! {
        #[test]
        fn read_succeeds_iff_in_range(address in -0x10000i32..0x10000) {
            let mem = space();
            prop_assert_eq!(mem.read(address).is_ok(), (0..=KEYBOARD).contains(&address));
        }

        #[test]
        fn write_succeeds_iff_below_keyboard(address in -0x10000i32..0x10000, word: i16) {
            let mut mem = space();
            prop_assert_eq!(mem.write(address, word).is_ok(), (0..KEYBOARD).contains(&address));
        }
    }
}
