//! The Hack ALU.
//!
//! Eighteen operations over `D` and a second operand `X`, where `X` is
//! either `A` or `M` depending on the instruction's `a` bit. All
//! arithmetic wraps at 16 bits.

use crate::cpu::decode::Source;
use serde::{Serialize, Deserialize};

/// ALU operation selected by the 6-bit `comp` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AluOp {
    Zero,
    One,
    MinusOne,
    D,
    X,
    NotD,
    NotX,
    NegD,
    /// `-A`. Always uses A, even when the `a` bit selects M.
    NegA,
    DPlusOne,
    XPlusOne,
    DMinusOne,
    XMinusOne,
    DPlusX,
    DMinusX,
    XMinusD,
    DAndX,
    DOrX,
}

impl AluOp {
    /// Every defined operation, in table order.
    pub const ALL: [AluOp; 18] = [
        AluOp::Zero,
        AluOp::One,
        AluOp::MinusOne,
        AluOp::D,
        AluOp::X,
        AluOp::NotD,
        AluOp::NotX,
        AluOp::NegD,
        AluOp::NegA,
        AluOp::DPlusOne,
        AluOp::XPlusOne,
        AluOp::DMinusOne,
        AluOp::XMinusOne,
        AluOp::DPlusX,
        AluOp::DMinusX,
        AluOp::XMinusD,
        AluOp::DAndX,
        AluOp::DOrX,
    ];

    /// Look up the operation for a `comp` bit pattern.
    pub fn from_bits(comp: u8) -> Option<Self> {
        let op = match comp {
            0b101010 => AluOp::Zero,
            0b111111 => AluOp::One,
            0b111010 => AluOp::MinusOne,
            0b001100 => AluOp::D,
            0b110000 => AluOp::X,
            0b001101 => AluOp::NotD,
            0b110001 => AluOp::NotX,
            0b001111 => AluOp::NegD,
            0b110011 => AluOp::NegA,
            0b011111 => AluOp::DPlusOne,
            0b110111 => AluOp::XPlusOne,
            0b001110 => AluOp::DMinusOne,
            0b110010 => AluOp::XMinusOne,
            0b000010 => AluOp::DPlusX,
            0b010011 => AluOp::DMinusX,
            0b000111 => AluOp::XMinusD,
            0b000000 => AluOp::DAndX,
            0b010101 => AluOp::DOrX,
            _ => return None,
        };
        Some(op)
    }

    pub fn bits(self) -> u8 {
        match self {
            AluOp::Zero => 0b101010,
            AluOp::One => 0b111111,
            AluOp::MinusOne => 0b111010,
            AluOp::D => 0b001100,
            AluOp::X => 0b110000,
            AluOp::NotD => 0b001101,
            AluOp::NotX => 0b110001,
            AluOp::NegD => 0b001111,
            AluOp::NegA => 0b110011,
            AluOp::DPlusOne => 0b011111,
            AluOp::XPlusOne => 0b110111,
            AluOp::DMinusOne => 0b001110,
            AluOp::XMinusOne => 0b110010,
            AluOp::DPlusX => 0b000010,
            AluOp::DMinusX => 0b010011,
            AluOp::XMinusD => 0b000111,
            AluOp::DAndX => 0b000000,
            AluOp::DOrX => 0b010101,
        }
    }

    /// Whether the result depends on `X`. Only these operations read `M`.
    pub fn reads_x(self) -> bool {
        matches!(
            self,
            AluOp::X
                | AluOp::NotX
                | AluOp::XPlusOne
                | AluOp::XMinusOne
                | AluOp::DPlusX
                | AluOp::DMinusX
                | AluOp::XMinusD
                | AluOp::DAndX
                | AluOp::DOrX
        )
    }

    /// Compute the result. `a` is the A register, used only by `-A`.
    #[inline]
    pub fn apply(self, d: i16, x: i16, a: i16) -> i16 {
        match self {
            AluOp::Zero => 0,
            AluOp::One => 1,
            AluOp::MinusOne => -1,
            AluOp::D => d,
            AluOp::X => x,
            AluOp::NotD => !d,
            AluOp::NotX => !x,
            AluOp::NegD => d.wrapping_neg(),
            AluOp::NegA => a.wrapping_neg(),
            AluOp::DPlusOne => d.wrapping_add(1),
            AluOp::XPlusOne => x.wrapping_add(1),
            AluOp::DMinusOne => d.wrapping_sub(1),
            AluOp::XMinusOne => x.wrapping_sub(1),
            AluOp::DPlusX => d.wrapping_add(x),
            AluOp::DMinusX => d.wrapping_sub(x),
            AluOp::XMinusD => x.wrapping_sub(d),
            AluOp::DAndX => d & x,
            AluOp::DOrX => d | x,
        }
    }

    /// Assembly mnemonic, with `X` spelled as `A` or `M`.
    pub fn mnemonic(self, source: Source) -> &'static str {
        let m = source == Source::M;
        match self {
            AluOp::Zero => "0",
            AluOp::One => "1",
            AluOp::MinusOne => "-1",
            AluOp::D => "D",
            AluOp::X => if m { "M" } else { "A" },
            AluOp::NotD => "!D",
            AluOp::NotX => if m { "!M" } else { "!A" },
            AluOp::NegD => "-D",
            AluOp::NegA => "-A",
            AluOp::DPlusOne => "D+1",
            AluOp::XPlusOne => if m { "M+1" } else { "A+1" },
            AluOp::DMinusOne => "D-1",
            AluOp::XMinusOne => if m { "M-1" } else { "A-1" },
            AluOp::DPlusX => if m { "D+M" } else { "D+A" },
            AluOp::DMinusX => if m { "D-M" } else { "D-A" },
            AluOp::XMinusD => if m { "M-D" } else { "A-D" },
            AluOp::DAndX => if m { "D&M" } else { "D&A" },
            AluOp::DOrX => if m { "D|M" } else { "D|A" },
        }
    }
}
