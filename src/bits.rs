//! Word-backed bit buffer.
//!
//! The leaf storage primitive under [`PackedTernaryArray`](crate::PackedTernaryArray):
//! pre-cleared allocation, bulk append, fixed-width slice read and in-place
//! slice write.
//!
//! Layout: buffer bit `k` lives in word `k / 64` at bit position `k % 64`
//! (LSB-first). Bits past `len` in the last word are always zero.
//!
//! Patterns passed to [`BitBuffer::push_bits`], [`BitBuffer::read_bits`] and
//! [`BitBuffer::write_bits`] are read MSB-first: the highest of the `width`
//! bits maps to the lowest buffer offset, the same order a bit string like
//! `"01"` is written left to right.

use crate::error::TernaryError;

const WORD_BITS: usize = 64;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitBuffer {
    len: usize,
    words: Vec<u64>,
}

impl BitBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer with room for `bits` bits before reallocating.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            len: 0,
            words: Vec::with_capacity(Self::word_count_for_len(bits)),
        }
    }

    /// Buffer of `len` bits, all cleared.
    pub fn zeroed(len: usize) -> Self {
        Self {
            len,
            words: vec![0u64; Self::word_count_for_len(len)],
        }
    }

    /// Adopt raw words as a buffer of `len` bits.
    ///
    /// `words` must hold exactly `ceil(len / 64)` words. Tail bits past `len`
    /// are cleared.
    pub fn from_words(len: usize, words: Vec<u64>) -> Result<Self, TernaryError> {
        let expected = Self::word_count_for_len(len);
        if words.len() != expected {
            return Err(TernaryError::BufferLengthMismatch {
                expected,
                got: words.len(),
            });
        }
        let mut out = Self { len, words };
        out.clear_tail();
        Ok(out)
    }

    /// Adopt little-endian bytes as a buffer of `len` bits.
    ///
    /// `bytes` must hold exactly `ceil(len / 8)` bytes. Buffer bit `k` is taken
    /// from byte `k / 8`, bit `k % 8`.
    pub fn from_le_bytes(len: usize, bytes: &[u8]) -> Result<Self, TernaryError> {
        let expected = len.div_ceil(8);
        if bytes.len() != expected {
            return Err(TernaryError::BufferLengthMismatch {
                expected,
                got: bytes.len(),
            });
        }
        let words = bytes
            .chunks(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf[..chunk.len()].copy_from_slice(chunk);
                u64::from_le_bytes(buf)
            })
            .collect();
        let mut out = Self { len, words };
        out.clear_tail();
        Ok(out)
    }

    #[inline]
    fn word_count_for_len(len: usize) -> usize {
        len.div_ceil(WORD_BITS)
    }

    #[inline]
    fn last_word_mask(len: usize) -> u64 {
        let used = len % WORD_BITS;
        if used == 0 {
            !0u64
        } else {
            (1u64 << used) - 1
        }
    }

    #[inline]
    fn width_mask(width: usize) -> u64 {
        if width >= WORD_BITS {
            !0u64
        } else {
            (1u64 << width) - 1
        }
    }

    /// Reverse the low `width` bits of `v` (MSB-first pattern ⇄ LSB-first field).
    #[inline]
    fn reverse_low(v: u64, width: usize) -> u64 {
        if width == 0 {
            0
        } else {
            v.reverse_bits() >> (WORD_BITS - width)
        }
    }

    fn clear_tail(&mut self) {
        if let Some(last) = self.words.last_mut() {
            *last &= Self::last_word_mask(self.len);
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Backing words; tail bits past `len` are zero.
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    /// Bytes physically allocated for the backing words.
    pub fn capacity_bytes(&self) -> usize {
        self.words.capacity() * std::mem::size_of::<u64>()
    }

    /// Little-endian byte export of exactly `ceil(len / 8)` bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out: Vec<u8> = self.words.iter().flat_map(|w| w.to_le_bytes()).collect();
        out.truncate(self.len.div_ceil(8));
        out
    }

    /// Append the low `width` bits of `pattern`, MSB-first.
    ///
    /// # Panics
    ///
    /// Panics if `width > 64`.
    pub fn push_bits(&mut self, pattern: u64, width: usize) {
        assert!(width <= WORD_BITS, "bit pattern wider than a word");
        let offset = self.len;
        self.len = match self.len.checked_add(width) {
            Some(len) => len,
            None => panic!("capacity overflow"),
        };
        let words = Self::word_count_for_len(self.len);
        if self.words.len() < words {
            self.words.resize(words, 0u64);
        }
        self.write_bits(offset, width, pattern);
    }

    /// Read `width` bits starting at `offset`, returned MSB-first.
    ///
    /// # Panics
    ///
    /// Panics if `width > 64` or the range extends past `len`.
    pub fn read_bits(&self, offset: usize, width: usize) -> u64 {
        assert!(width <= WORD_BITS, "bit pattern wider than a word");
        assert!(
            offset.checked_add(width).is_some_and(|end| end <= self.len),
            "bit range {}..{} out of bounds for length {}",
            offset,
            offset.saturating_add(width),
            self.len
        );
        if width == 0 {
            return 0;
        }

        let (word, shift) = (offset / WORD_BITS, offset % WORD_BITS);
        let mut field = self.words[word] >> shift;
        if shift + width > WORD_BITS {
            field |= self.words[word + 1] << (WORD_BITS - shift);
        }
        Self::reverse_low(field & Self::width_mask(width), width)
    }

    /// Overwrite `width` bits starting at `offset` with the low `width` bits of
    /// `pattern`, MSB-first. Bits outside the range are untouched.
    ///
    /// # Panics
    ///
    /// Panics if `width > 64` or the range extends past `len`.
    pub fn write_bits(&mut self, offset: usize, width: usize, pattern: u64) {
        assert!(width <= WORD_BITS, "bit pattern wider than a word");
        assert!(
            offset.checked_add(width).is_some_and(|end| end <= self.len),
            "bit range {}..{} out of bounds for length {}",
            offset,
            offset.saturating_add(width),
            self.len
        );
        if width == 0 {
            return;
        }

        let mask = Self::width_mask(width);
        let field = Self::reverse_low(pattern & mask, width);
        let (word, shift) = (offset / WORD_BITS, offset % WORD_BITS);

        let w = &mut self.words[word];
        *w &= !(mask << shift);
        *w |= field << shift;

        // Straddles into the next word.
        if shift + width > WORD_BITS {
            let spill = WORD_BITS - shift;
            let w = &mut self.words[word + 1];
            *w &= !(mask >> spill);
            *w |= field >> spill;
        }
    }

    /// Single bit at `index`.
    pub fn bit(&self, index: usize) -> bool {
        self.read_bits(index, 1) == 1
    }

    /// `"0110..."` rendering, one character per bit in buffer order.
    pub fn to_bit_string(&self) -> String {
        (0..self.len)
            .map(|i| if self.bit(i) { '1' } else { '0' })
            .collect()
    }
}

impl std::fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitBuffer")
            .field("len", &self.len)
            .field("bits", &self.to_bit_string())
            .finish()
    }
}
