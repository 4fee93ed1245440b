//! Error types for packed ternary arrays.

use std::fmt;

/// Errors raised by [`PackedTernaryArray`](crate::PackedTernaryArray) operations.
///
/// Every failing operation leaves the array (or the caller's input) untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TernaryError {
    /// A logical value outside {-1, 0, 1} was supplied.
    InvalidValue {
        /// The rejected value.
        value: i64,
        /// Position in the input sequence, when the value came from one.
        position: Option<usize>,
    },
    /// An index fell outside `[0, len)` after negative-index normalization.
    IndexOutOfRange {
        /// The index as supplied by the caller (before normalization).
        index: isize,
        /// Logical length of the array.
        len: usize,
    },
    /// The generic constructor received neither a size nor a sequence of integers.
    InvalidArgumentType {
        /// Short description of what was received instead.
        found: &'static str,
    },
    /// A raw buffer import did not match the size implied by the element count.
    BufferLengthMismatch {
        /// Expected buffer length (in the unit of the import: words or bytes).
        expected: usize,
        /// Actual buffer length received.
        got: usize,
    },
    /// The reserved `11` bit pattern was found during a strict encoding check.
    ReservedPattern {
        /// Element index holding the reserved pattern.
        index: usize,
    },
}

impl fmt::Display for TernaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryError::InvalidValue {
                value,
                position: Some(position),
            } => {
                write!(
                    f,
                    "Invalid ternary value {} at position {}: must be -1, 0, or 1",
                    value, position
                )
            }
            TernaryError::InvalidValue {
                value,
                position: None,
            } => {
                write!(f, "Invalid ternary value {}: must be -1, 0, or 1", value)
            }
            TernaryError::IndexOutOfRange { index, len } => {
                write!(
                    f,
                    "Ternary array index out of range: index {} for length {}",
                    index, len
                )
            }
            TernaryError::InvalidArgumentType { found } => {
                write!(
                    f,
                    "Argument must be a non-negative size or a sequence of ternary values, got {}",
                    found
                )
            }
            TernaryError::BufferLengthMismatch { expected, got } => {
                write!(f, "Buffer length mismatch: expected {}, got {}", expected, got)
            }
            TernaryError::ReservedPattern { index } => {
                write!(f, "Reserved bit pattern 11 at element {}", index)
            }
        }
    }
}

impl std::error::Error for TernaryError {}
