//! Single balanced ternary digit and its 2-bit code.
//!
//! # Representation
//!
//! Single Trit: {N, Z, P} = {-1, 0, +1}
//!
//! # Encoding
//!
//! Each trit occupies one 2-bit group, written (high bit, low bit):
//! - `00` = Z (0)
//! - `01` = P (+1)
//! - `10` = N (-1)
//! - `11` = reserved, never produced by [`Trit::encode`]; decodes to Z

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of one encoded trit in bits.
pub const BITS_PER_TRIT: usize = 2;

/// The reserved, never-written 2-bit pattern.
pub const RESERVED_CODE: u8 = 0b11;

/// Code → trit. Index is the 2-bit code; `11` falls back to Z.
const DECODE: [Trit; 4] = [Trit::Z, Trit::P, Trit::N, Trit::Z];

/// Single balanced ternary digit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i8)]
pub enum Trit {
    /// Negative: -1
    N = -1,
    /// Zero: 0
    #[default]
    Z = 0,
    /// Positive: +1
    P = 1,
}

impl fmt::Debug for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trit::N => write!(f, "N"),
            Trit::Z => write!(f, "Z"),
            Trit::P => write!(f, "P"),
        }
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trit::N => write!(f, "-"),
            Trit::Z => write!(f, "0"),
            Trit::P => write!(f, "+"),
        }
    }
}

impl Trit {
    /// All possible trit values in order
    pub const ALL: [Trit; 3] = [Trit::N, Trit::Z, Trit::P];

    /// Convert from an integer, returning None unless it is -1, 0, or 1.
    #[inline]
    pub const fn from_i64_exact(v: i64) -> Option<Self> {
        match v {
            -1 => Some(Trit::N),
            0 => Some(Trit::Z),
            1 => Some(Trit::P),
            _ => None,
        }
    }

    /// Convert to i8
    #[inline]
    pub const fn to_i8(self) -> i8 {
        self as i8
    }

    /// 2-bit code for this trit, as `(high << 1) | low`.
    #[inline]
    pub const fn encode(self) -> u8 {
        match self {
            Trit::Z => 0b00,
            Trit::P => 0b01,
            Trit::N => 0b10,
        }
    }

    /// Decode a 2-bit code. Only the low two bits of `code` are considered.
    ///
    /// The reserved pattern `11` decodes to [`Trit::Z`].
    #[inline]
    pub const fn decode(code: u8) -> Self {
        DECODE[(code & 0b11) as usize]
    }

    /// Parse the display form (`-`, `0`, `+`).
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Trit::N),
            '0' => Some(Trit::Z),
            '+' => Some(Trit::P),
            _ => None,
        }
    }
}

impl From<Trit> for i8 {
    fn from(t: Trit) -> i8 {
        t.to_i8()
    }
}

impl TryFrom<i64> for Trit {
    type Error = i64;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        Trit::from_i64_exact(v).ok_or(v)
    }
}
