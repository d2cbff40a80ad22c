//! Memory-mapped monochrome framebuffer.
//!
//! 512×256 pixels, 16 pixels per word, 32 words per scanline. Within a
//! word the least significant bit is the leftmost pixel.

use crate::cpu::memory::{index, Address, MemoryError, ReadMemory, Word, WriteMemory};
use crate::cpu::SCREEN_WORDS;

pub const SCREEN_WIDTH: usize = 512;
pub const SCREEN_HEIGHT: usize = 256;
pub const WORDS_PER_ROW: usize = SCREEN_WIDTH / 16;

/// Lit pixel colour used by [`Screen::render_rgba_default`].
pub const PIXEL_ON: [u8; 3] = [0x75, 0xF9, 0x4C];
pub const PIXEL_OFF: [u8; 3] = [0x00, 0x00, 0x00];

/// The framebuffer, addressed by word offset 0..8192.
#[derive(Clone)]
pub struct Screen {
    words: Vec<Word>,
}

impl Screen {
    /// Create a blank screen.
    pub fn new() -> Self {
        Self {
            words: vec![0; SCREEN_WORDS],
        }
    }

    /// Blank every pixel.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Whether the pixel at column `x`, row `y` is lit.
    ///
    /// # Panics
    /// Panics if the coordinates are outside 512×256.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        assert!(x < SCREEN_WIDTH && y < SCREEN_HEIGHT, "pixel ({}, {}) off screen", x, y);
        let word = self.words[y * WORDS_PER_ROW + x / 16] as u16;
        (word >> (x % 16)) & 1 == 1
    }

    /// Raw framebuffer words.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Render to a row-major RGBA buffer of 512×256×4 bytes.
    pub fn render_rgba(&self, on: [u8; 3], off: [u8; 3]) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(SCREEN_WIDTH * SCREEN_HEIGHT * 4);
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                let [r, g, b] = if self.pixel(x, y) { on } else { off };
                pixels.extend_from_slice(&[r, g, b, 0xFF]);
            }
        }
        pixels
    }

    pub fn render_rgba_default(&self) -> Vec<u8> {
        self.render_rgba(PIXEL_ON, PIXEL_OFF)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadMemory for Screen {
    #[inline]
    fn read(&self, address: Address) -> Result<Word, MemoryError> {
        let i = index(address, SCREEN_WORDS)?;
        Ok(self.words[i])
    }
}

impl WriteMemory for Screen {
    #[inline]
    fn write(&mut self, address: Address, word: Word) -> Result<(), MemoryError> {
        let i = index(address, SCREEN_WORDS)?;
        self.words[i] = word;
        Ok(())
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit: u32 = self.words.iter().map(|w| w.count_ones()).sum();
        f.debug_struct("Screen")
            .field("lit_pixels", &lit)
            .finish()
    }
}
