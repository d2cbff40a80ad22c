//! Instruction decoder for the Hack CPU.
//!
//! A word with bit 15 clear is an A-instruction carrying a 15-bit
//! immediate. A word with bit 15 set is a C-instruction:
//!
//! ```text
//!  15 14 13 12 11 10  9  8  7  6  5  4  3  2  1  0
//!   1  x  x  a c1 c2 c3 c4 c5 c6 dA dD dM j1 j2 j3
//! ```
//!
//! Bits 14 and 13 are ignored when decoding and set when encoding.

use crate::cpu::alu::AluOp;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Where the ALU's second operand comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    /// The A register (`a` bit clear).
    A,
    /// The memory word addressed by A (`a` bit set).
    M,
}

/// Destination flags of a C-instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dest {
    pub a: bool,
    pub d: bool,
    pub m: bool,
}

impl Dest {
    pub const NONE: Dest = Dest { a: false, d: false, m: false };

    /// Create from the three dest bits (A, D, M from MSB to LSB).
    pub fn from_bits(bits: u16) -> Self {
        Self {
            a: bits & 0b100 != 0,
            d: bits & 0b010 != 0,
            m: bits & 0b001 != 0,
        }
    }

    pub fn bits(self) -> u16 {
        (self.a as u16) << 2 | (self.d as u16) << 1 | self.m as u16
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

impl std::fmt::Display for Dest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Canonical Hack ordering: AM, AD, MD, AMD.
        if self.a {
            write!(f, "A")?;
        }
        if self.m {
            write!(f, "M")?;
        }
        if self.d {
            write!(f, "D")?;
        }
        Ok(())
    }
}

/// Jump condition, tested against the ALU result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Jump {
    Never,
    Gt,
    Eq,
    Ge,
    Lt,
    Ne,
    Le,
    Always,
}

impl Jump {
    /// Create from the three jump bits.
    pub fn from_bits(bits: u16) -> Self {
        match bits & 0b111 {
            0b000 => Jump::Never,
            0b001 => Jump::Gt,
            0b010 => Jump::Eq,
            0b011 => Jump::Ge,
            0b100 => Jump::Lt,
            0b101 => Jump::Ne,
            0b110 => Jump::Le,
            _ => Jump::Always,
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            Jump::Never => 0b000,
            Jump::Gt => 0b001,
            Jump::Eq => 0b010,
            Jump::Ge => 0b011,
            Jump::Lt => 0b100,
            Jump::Ne => 0b101,
            Jump::Le => 0b110,
            Jump::Always => 0b111,
        }
    }

    /// Whether the jump is taken for `result`.
    #[inline]
    pub fn holds(self, result: i16) -> bool {
        match self {
            Jump::Never => false,
            Jump::Gt => result > 0,
            Jump::Eq => result == 0,
            Jump::Ge => result >= 0,
            Jump::Lt => result < 0,
            Jump::Ne => result != 0,
            Jump::Le => result <= 0,
            Jump::Always => true,
        }
    }

    pub fn mnemonic(self) -> Option<&'static str> {
        match self {
            Jump::Never => None,
            Jump::Gt => Some("JGT"),
            Jump::Eq => Some("JEQ"),
            Jump::Ge => Some("JGE"),
            Jump::Lt => Some("JLT"),
            Jump::Ne => Some("JNE"),
            Jump::Le => Some("JLE"),
            Jump::Always => Some("JMP"),
        }
    }
}

/// Decoded Hack instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// `@value`: A := value
    Address(u16),

    /// `dest=comp;jump`
    Compute {
        source: Source,
        op: AluOp,
        dest: Dest,
        jump: Jump,
    },
}

impl Instruction {
    /// `@value`, truncated to 15 bits.
    pub fn at(value: u16) -> Self {
        Instruction::Address(value & 0x7FFF)
    }

    /// A C-instruction.
    pub fn compute(source: Source, op: AluOp, dest: Dest, jump: Jump) -> Self {
        Instruction::Compute { source, op, dest, jump }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Instruction::Address(value) => write!(f, "@{}", value),
            Instruction::Compute { source, op, dest, jump } => {
                if !dest.is_empty() {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", op.mnemonic(source))?;
                if let Some(j) = jump.mnemonic() {
                    write!(f, ";{}", j)?;
                }
                Ok(())
            }
        }
    }
}

/// Decode a 16-bit instruction word.
pub fn decode(word: u16) -> Result<Instruction, DecodeError> {
    if word & 0x8000 == 0 {
        return Ok(Instruction::Address(word & 0x7FFF));
    }

    let source = if word & 0x1000 != 0 { Source::M } else { Source::A };
    let comp = ((word >> 6) & 0x3F) as u8;
    let op = AluOp::from_bits(comp).ok_or(DecodeError::BadInstruction(word))?;

    Ok(Instruction::Compute {
        source,
        op,
        dest: Dest::from_bits(word >> 3),
        jump: Jump::from_bits(word),
    })
}

/// Encode an instruction back to its canonical 16-bit word.
pub fn encode(instr: &Instruction) -> u16 {
    match *instr {
        Instruction::Address(value) => value & 0x7FFF,
        Instruction::Compute { source, op, dest, jump } => {
            let a = match source {
                Source::A => 0,
                Source::M => 1,
            };
            0xE000 | a << 12 | (op.bits() as u16) << 6 | dest.bits() << 3 | jump.bits()
        }
    }
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The `comp` field matches none of the ALU operations.
    #[error("invalid instruction 0x{0:04X}")]
    BadInstruction(u16),
}
