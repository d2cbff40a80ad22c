//! Memory-mapped I/O devices: the framebuffer and the keyboard register.

pub mod screen;
pub mod keyboard;

pub use screen::{Screen, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use keyboard::{key_code, Keyboard, KeyboardHandle, NAMED_KEYS};
