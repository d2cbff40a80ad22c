//! Disassembler for Hack programs.
//!
//! Converts instruction words back to Hack assembly mnemonics.

use crate::cpu::decode::decode;
use crate::cpu::Word;
use crate::program::hack::to_hack_line;

/// Disassemble a single instruction word to text.
pub fn disassemble_word(word: Word) -> String {
    match decode(word as u16) {
        Ok(decoded) => decoded.to_string(),
        Err(_) => format!("??? ; {}", to_hack_line(word)),
    }
}

/// Disassemble a slice of instructions into an addressed listing.
pub fn disassemble(words: &[Word]) -> String {
    let mut output = String::new();
    output.push_str("// Hack Disassembly\n");
    output.push_str("// ----------------\n\n");

    for (addr, &word) in words.iter().enumerate() {
        let line = disassemble_word(word);
        output.push_str(&format!("{:05}: {:<16} // {}\n", addr, line, to_hack_line(word)));
    }

    output
}
