//! The keyboard register and the Hack key-code table.
//!
//! The register is a single atomic cell. [`Keyboard`] is the read-only
//! view plugged into the address space; [`KeyboardHandle`]s are held by
//! input code, possibly on another thread, to press and release keys.

use crate::cpu::memory::{Address, MemoryError, ReadMemory, Word};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

/// Named keys and their Hack codes. Printable ASCII maps to itself.
pub const NAMED_KEYS: &[(&str, u16)] = &[
    ("Enter", 128),
    ("Backspace", 129),
    ("ArrowLeft", 130),
    ("ArrowUp", 131),
    ("ArrowRight", 132),
    ("ArrowDown", 133),
    ("Home", 134),
    ("End", 135),
    ("PageUp", 136),
    ("PageDown", 137),
    ("Insert", 138),
    ("Delete", 139),
    ("Escape", 140),
    ("F1", 141),
    ("F2", 142),
    ("F3", 143),
    ("F4", 144),
    ("F5", 145),
    ("F6", 146),
    ("F7", 147),
    ("F8", 148),
    ("F9", 149),
    ("F10", 150),
    ("F11", 151),
    ("F12", 152),
];

/// Look up the Hack code for a key name.
///
/// Single printable ASCII characters (`' '..='~'`) map to their code;
/// everything else goes through [`NAMED_KEYS`].
pub fn key_code(key: &str) -> Option<u16> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if (' '..='~').contains(&c) {
            return Some(c as u16);
        }
    }

    NAMED_KEYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, code)| code)
}

/// The read-only keyboard register as seen by the machine.
#[derive(Clone, Default)]
pub struct Keyboard {
    code: Arc<AtomicU16>,
}

impl Keyboard {
    /// Create a keyboard with no key pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that can press and release keys on this keyboard.
    pub fn handle(&self) -> KeyboardHandle {
        KeyboardHandle {
            code: Arc::clone(&self.code),
        }
    }
}

impl ReadMemory for Keyboard {
    #[inline]
    fn read(&self, address: Address) -> Result<Word, MemoryError> {
        match address {
            0 => Ok(self.code.load(Ordering::Relaxed) as Word),
            _ => Err(MemoryError::BadAddress(address)),
        }
    }
}

impl std::fmt::Debug for Keyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyboard")
            .field("code", &self.code.load(Ordering::Relaxed))
            .finish()
    }
}

/// Input-side handle on the keyboard register.
#[derive(Clone, Debug)]
pub struct KeyboardHandle {
    code: Arc<AtomicU16>,
}

impl KeyboardHandle {
    /// Hold down the key with the given Hack code.
    pub fn press(&self, code: u16) {
        self.code.store(code, Ordering::Relaxed);
    }

    /// Hold down a named key. Unknown names release the keyboard and
    /// return `false`.
    pub fn press_key(&self, key: &str) -> bool {
        match key_code(key) {
            Some(code) => {
                self.press(code);
                true
            }
            None => {
                log::debug!("ignoring unmapped key {:?}", key);
                self.release();
                false
            }
        }
    }

    /// No key pressed.
    pub fn release(&self) {
        self.code.store(0, Ordering::Relaxed);
    }

    pub fn current(&self) -> u16 {
        self.code.load(Ordering::Relaxed)
    }
}
