//! WebAssembly bindings for the Hack emulator.
//!
//! This module provides JavaScript-friendly wrappers around the core emulator.

use wasm_bindgen::prelude::*;
use crate::program::{disassemble_word, parse_hack};
use crate::{Computer, Word};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly computer wrapper.
#[wasm_bindgen]
pub struct WasmComputer {
    computer: Computer,
    program: Vec<Word>,
}

#[wasm_bindgen]
impl WasmComputer {
    /// Create a new computer instance.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            computer: Computer::new(),
            program: Vec::new(),
        }
    }

    /// Load a program from `.hack` text. Returns the number of words.
    #[wasm_bindgen]
    pub fn load_hack(&mut self, source: &str) -> Result<usize, JsError> {
        let words = parse_hack(source)
            .map_err(|e| JsError::new(&e.to_string()))?;

        let len = words.len();
        self.computer = Computer::with_program(&words)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.program = words;

        Ok(len)
    }

    /// Step one instruction. Returns the disassembled instruction.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<String, JsError> {
        let instr = self.computer.step()
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(instr.to_string())
    }

    /// Run a batch of instructions, e.g. once per animation frame.
    #[wasm_bindgen]
    pub fn run(&mut self, steps: u32) -> Result<u32, JsError> {
        let ran = self.computer.run_batch(steps.into())
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(ran as u32)
    }

    /// Restart at address 0, keeping A, D and memory.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.computer.reset();
    }

    /// Fresh machine with the loaded program: registers, RAM and screen zeroed.
    #[wasm_bindgen]
    pub fn reboot(&mut self) -> Result<(), JsError> {
        self.computer = Computer::with_program(&self.program)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(())
    }

    /// Press a key by its DOM `KeyboardEvent.key` name.
    #[wasm_bindgen]
    pub fn key_down(&self, key: &str) -> bool {
        self.computer.key_down(key)
    }

    #[wasm_bindgen]
    pub fn key_up(&self) {
        self.computer.key_up();
    }

    #[wasm_bindgen]
    pub fn is_halted(&self) -> bool {
        self.computer.is_halted()
    }

    #[wasm_bindgen]
    pub fn cycles(&self) -> u64 {
        self.computer.cpu().cycles
    }

    #[wasm_bindgen]
    pub fn pc(&self) -> u16 {
        self.computer.registers().pc
    }

    #[wasm_bindgen]
    pub fn a(&self) -> i16 {
        self.computer.registers().a
    }

    #[wasm_bindgen]
    pub fn d(&self) -> i16 {
        self.computer.registers().d
    }

    /// Read any mapped address; out-of-range addresses read as 0.
    #[wasm_bindgen]
    pub fn memory_at(&self, address: i32) -> i16 {
        self.computer.read_ram(address).unwrap_or(0)
    }

    /// The framebuffer as 512×256 RGBA pixels, ready for `ImageData`.
    #[wasm_bindgen]
    pub fn screen_rgba(&self) -> js_sys::Uint8ClampedArray {
        let pixels = self.computer.screen().render_rgba_default();
        js_sys::Uint8ClampedArray::from(&pixels[..])
    }

    /// Registers and non-zero RAM as a JSON string.
    #[wasm_bindgen]
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.computer.snapshot())
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

impl Default for WasmComputer {
    fn default() -> Self {
        Self::new()
    }
}

/// Disassemble a single instruction word.
#[wasm_bindgen]
pub fn wasm_disassemble(word: i16) -> String {
    disassemble_word(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADD: &str = include_str!("../testdata/add.hack");

    #[test]
    fn test_reset_keeps_memory_reboot_clears_it() {
        let mut wasm = WasmComputer::new();
        assert_eq!(wasm.load_hack(ADD).ok(), Some(8));
        assert_eq!(wasm.run(6).ok(), Some(6));

        wasm.reset();
        assert_eq!(wasm.pc(), 0);
        assert_eq!(wasm.d(), 5);
        assert_eq!(wasm.memory_at(0), 5);

        assert!(wasm.reboot().is_ok());
        assert_eq!(wasm.d(), 0);
        assert_eq!(wasm.memory_at(0), 0);
        assert_eq!(wasm.cycles(), 0);
    }
}
