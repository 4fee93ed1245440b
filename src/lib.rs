//! Packed Ternary - 2-bit ternary storage
//!
//! Copyright (c) 2025 Embeddenator Contributors
//! Licensed under MIT License
//!
//! A fixed-length, random-access array of ternary values {-1, 0, +1} stored
//! at exactly 2 bits per element: a 4x saving over `i8` and 32x over `i64`,
//! aimed at holding ternary-quantized weights compactly.
//!
//! # Quick Start
//!
//! ```
//! use packed_ternary::PackedTernaryArray;
//!
//! let mut weights = PackedTernaryArray::from_values(&[-1, 0, 1, 1, 0, -1, 0, 0, 1])?;
//! weights.set(2, -1)?;
//! assert_eq!(weights.get(-1)?, 1);
//! assert_eq!(weights.to_sequence(), vec![-1, 0, -1, 1, 0, -1, 0, 0, 1]);
//! assert_eq!(weights.bit_len(), 18);
//! # Ok::<(), packed_ternary::TernaryError>(())
//! ```
//!
//! # Modules
//!
//! - [`packed`]: the packed array itself
//! - [`bits`]: word-backed bit buffer underneath it
//! - [`trit`]: single ternary digit and its 2-bit code
//! - [`error`]: error taxonomy
//! - [`cli`]: command-line interface

pub mod bits;
pub mod cli;
pub mod error;
pub mod packed;
pub mod trit;

pub use bits::BitBuffer;
pub use error::TernaryError;
pub use packed::{Iter, PackedTernaryArray};
pub use trit::{Trit, BITS_PER_TRIT};
