//! `.hack` program files.
//!
//! A `.hack` file is plain text:
//! - One instruction per line
//! - Each line is exactly 16 `0`/`1` characters, most significant bit first
//! - Surrounding whitespace (including a trailing `\r`) is ignored
//!
//! Any other line is a fatal load error.

use crate::cpu::{MemoryError, Word, ROM_SIZE};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// Parse a 16-character binary line into a word.
pub fn parse_line(line: &str) -> Result<Word, String> {
    let bits = line.trim();
    if bits.len() != 16 {
        return Err(format!("expected 16 bits, found {} characters", bits.len()));
    }
    if let Some(c) = bits.chars().find(|c| !matches!(c, '0' | '1')) {
        return Err(format!("unexpected character {:?}", c));
    }

    u16::from_str_radix(bits, 2)
        .map(|w| w as Word)
        .map_err(|e| e.to_string())
}

/// Format a word as a `.hack` line.
pub fn to_hack_line(word: Word) -> String {
    format!("{:016b}", word as u16)
}

/// Parse the text of a `.hack` file.
pub fn parse_hack(text: &str) -> Result<Vec<Word>, ProgramError> {
    read_words(text.lines().map(|l| Ok(l.to_string())))
}

/// Load a `.hack` file from disk.
pub fn load_hack<P: AsRef<Path>>(path: P) -> Result<Vec<Word>, ProgramError> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| ProgramError::IoError(e.to_string()))?;
    let reader = BufReader::new(file);

    let words = read_words(reader.lines())?;
    log::info!("loaded {} words from {}", words.len(), path.as_ref().display());
    Ok(words)
}

fn read_words<I>(lines: I) -> Result<Vec<Word>, ProgramError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut words = Vec::new();

    for (line_num, line_result) in lines.enumerate() {
        let line = line_result.map_err(|e| ProgramError::IoError(e.to_string()))?;

        if words.len() == ROM_SIZE {
            return Err(ProgramError::TooLarge { max: ROM_SIZE });
        }

        let word = parse_line(&line).map_err(|message| ProgramError::ParseError {
            line: line_num + 1,
            message,
        })?;
        words.push(word);
    }

    Ok(words)
}

/// Save words to a `.hack` file.
pub fn save_hack<P: AsRef<Path>>(path: P, words: &[Word]) -> Result<(), ProgramError> {
    let mut file = std::fs::File::create(path.as_ref())
        .map_err(|e| ProgramError::IoError(e.to_string()))?;

    for &word in words {
        writeln!(file, "{}", to_hack_line(word))
            .map_err(|e| ProgramError::IoError(e.to_string()))?;
    }

    Ok(())
}

/// Errors that can occur while loading or saving programs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("program exceeds {max} words")]
    TooLarge { max: usize },

    #[error(transparent)]
    Memory(#[from] MemoryError),
}
