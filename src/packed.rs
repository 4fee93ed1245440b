//! Packed ternary array.
//!
//! A fixed-length, random-access container of ternary values stored at
//! 2 bits per element.
//!
//! Representation: 2 bits per element, element `i` at bit offset `2*i`
//! - 00 = Z (0)
//! - 01 = P (+1)
//! - 10 = N (-1)
//! - 11 = unused (treated as Z)
//!
//! Nothing reachable through the safe mutating API writes `11`. It can only
//! show up through [`PackedTernaryArray::from_raw_words`] or
//! [`PackedTernaryArray::from_le_bytes`]; use
//! [`PackedTernaryArray::validate_encoding`] to reject such buffers.

use std::fmt;
use std::iter::FusedIterator;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bits::BitBuffer;
use crate::error::TernaryError;
use crate::trit::{Trit, BITS_PER_TRIT, RESERVED_CODE};

/// Bit count for `len` elements.
///
/// Panics with "capacity overflow" when `2 * len` does not fit in `usize`,
/// the same way `Vec` reports an impossible allocation.
#[inline]
fn bit_len_for(len: usize) -> usize {
    match len.checked_mul(BITS_PER_TRIT) {
        Some(bits) => bits,
        None => panic!("capacity overflow"),
    }
}

/// Fixed-length array of trits packed 2 bits per element.
///
/// Equality compares the underlying bits.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PackedTernaryArray {
    len: usize,
    bits: BitBuffer,
}

impl PackedTernaryArray {
    /// Array of `len` zeros.
    pub fn new_zeroed(len: usize) -> Self {
        let bits = BitBuffer::zeroed(bit_len_for(len));

        #[cfg(feature = "logging")]
        tracing::debug!(len, bits = bits.len(), "allocated zeroed ternary array");

        Self { len, bits }
    }

    /// Build from an ordered sequence of integers, each of which must be -1, 0, or 1.
    ///
    /// Construction is all-or-nothing: the first invalid value aborts with
    /// [`TernaryError::InvalidValue`] carrying the value and its position.
    ///
    /// ```
    /// use packed_ternary::{PackedTernaryArray, TernaryError};
    ///
    /// let arr = PackedTernaryArray::from_values(&[-1, 0, 1]).unwrap();
    /// assert_eq!(arr.to_sequence(), vec![-1, 0, 1]);
    ///
    /// let err = PackedTernaryArray::from_values(&[0, 1, 7]).unwrap_err();
    /// assert_eq!(err, TernaryError::InvalidValue { value: 7, position: Some(2) });
    /// ```
    pub fn from_values<T>(values: &[T]) -> Result<Self, TernaryError>
    where
        T: Copy + Into<i64>,
    {
        let mut bits = BitBuffer::with_capacity(bit_len_for(values.len()));
        for (position, &v) in values.iter().enumerate() {
            let value: i64 = v.into();
            let t = Trit::from_i64_exact(value).ok_or(TernaryError::InvalidValue {
                value,
                position: Some(position),
            })?;
            bits.push_bits(u64::from(t.encode()), BITS_PER_TRIT);
        }

        #[cfg(feature = "logging")]
        tracing::debug!(len = values.len(), "packed ternary array from values");

        Ok(Self {
            len: values.len(),
            bits,
        })
    }

    /// Build from a string of `-`, `0`, `+` characters. Whitespace is ignored.
    pub fn from_trit_str(s: &str) -> Result<Self, TernaryError> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(position, c)| {
                Trit::from_char(c).ok_or(TernaryError::InvalidValue {
                    value: i64::from(u32::from(c)),
                    position: Some(position),
                })
            })
            .collect()
    }

    /// Generic constructor over a JSON value.
    ///
    /// A non-negative integer is taken as a size (zero-filled array); an array
    /// of integers is taken as the element values. Anything else fails with
    /// [`TernaryError::InvalidArgumentType`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, TernaryError> {
        use serde_json::Value;

        match value {
            Value::Number(n) => {
                if let Some(size) = n.as_u64() {
                    let size = usize::try_from(size)
                        .ok()
                        .filter(|size| size.checked_mul(BITS_PER_TRIT).is_some())
                        .ok_or(TernaryError::InvalidArgumentType {
                            found: "size exceeding address space",
                        })?;
                    Ok(Self::new_zeroed(size))
                } else if n.is_i64() {
                    Err(TernaryError::InvalidArgumentType {
                        found: "negative integer",
                    })
                } else {
                    Err(TernaryError::InvalidArgumentType { found: "float" })
                }
            }
            Value::Array(items) => {
                let values = items
                    .iter()
                    .map(|item| {
                        item.as_i64().ok_or(TernaryError::InvalidArgumentType {
                            found: "array containing a non-integer",
                        })
                    })
                    .collect::<Result<Vec<i64>, _>>()?;
                Self::from_values(&values)
            }
            Value::Null => Err(TernaryError::InvalidArgumentType { found: "null" }),
            Value::Bool(_) => Err(TernaryError::InvalidArgumentType { found: "boolean" }),
            Value::String(_) => Err(TernaryError::InvalidArgumentType { found: "string" }),
            Value::Object(_) => Err(TernaryError::InvalidArgumentType { found: "object" }),
        }
    }

    /// Adopt raw backing words for an array of `len` elements.
    ///
    /// `words` must hold exactly `ceil(2 * len / 64)` words laid out as
    /// [`PackedTernaryArray::as_words`] returns them. Tail bits are cleared.
    /// Reserved `11` groups are accepted and read back as 0.
    pub fn from_raw_words(len: usize, words: Vec<u64>) -> Result<Self, TernaryError> {
        let bits = BitBuffer::from_words(bit_len_for(len), words)?;
        Ok(Self::adopt(len, bits))
    }

    /// Adopt a little-endian byte buffer for an array of `len` elements.
    ///
    /// `bytes` must hold exactly `ceil(2 * len / 8)` bytes, as produced by
    /// [`PackedTernaryArray::to_le_bytes`]. Reserved `11` groups are accepted
    /// and read back as 0.
    pub fn from_le_bytes(len: usize, bytes: &[u8]) -> Result<Self, TernaryError> {
        let bits = BitBuffer::from_le_bytes(bit_len_for(len), bytes)?;
        Ok(Self::adopt(len, bits))
    }

    fn adopt(len: usize, bits: BitBuffer) -> Self {
        let out = Self { len, bits };

        #[cfg(feature = "logging")]
        {
            let reserved = out.reserved_count();
            if reserved > 0 {
                tracing::debug!(len, reserved, "raw import contains reserved 11 groups");
            } else {
                tracing::debug!(len, "raw import");
            }
        }

        out
    }

    /// Logical element count.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Physical bit count; always `2 * len()`.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Bytes allocated for the packed storage.
    pub fn byte_len(&self) -> usize {
        self.bits.capacity_bytes()
    }

    /// Resolve a possibly negative index to a position in `[0, len)`.
    #[inline]
    fn normalize(&self, index: isize) -> Result<usize, TernaryError> {
        let out_of_range = TernaryError::IndexOutOfRange {
            index,
            len: self.len,
        };
        let i = if index < 0 {
            // Lengths above isize::MAX cannot be allocated.
            let len = isize::try_from(self.len).map_err(|_| out_of_range.clone())?;
            index + len
        } else {
            index
        };
        match usize::try_from(i) {
            Ok(i) if i < self.len => Ok(i),
            _ => Err(out_of_range),
        }
    }

    #[inline]
    fn code_at(&self, i: usize) -> u8 {
        // Width 2 keeps the result in 0..=3.
        self.bits.read_bits(i * BITS_PER_TRIT, BITS_PER_TRIT) as u8
    }

    /// Element at `index`; negative indices count from the end.
    pub fn get(&self, index: isize) -> Result<i8, TernaryError> {
        let i = self.normalize(index)?;
        Ok(Trit::decode(self.code_at(i)).to_i8())
    }

    /// Overwrite the element at `index`; negative indices count from the end.
    ///
    /// The value is checked before the index, so a bad value reports
    /// [`TernaryError::InvalidValue`] even when the index is also out of range.
    pub fn set(&mut self, index: isize, value: impl Into<i64>) -> Result<(), TernaryError> {
        let value = value.into();
        let t = Trit::from_i64_exact(value).ok_or(TernaryError::InvalidValue {
            value,
            position: None,
        })?;
        let i = self.normalize(index)?;
        self.write(i, t);
        Ok(())
    }

    #[inline]
    fn write(&mut self, i: usize, t: Trit) {
        self.bits
            .write_bits(i * BITS_PER_TRIT, BITS_PER_TRIT, u64::from(t.encode()));
    }

    /// Typed access; negative indices count from the end. `None` when out of range.
    pub fn get_trit(&self, index: isize) -> Option<Trit> {
        let i = self.normalize(index).ok()?;
        Some(Trit::decode(self.code_at(i)))
    }

    /// Typed write; negative indices count from the end.
    ///
    /// Fails with [`TernaryError::IndexOutOfRange`] carrying `index` as given.
    pub fn set_trit(&mut self, index: isize, t: Trit) -> Result<(), TernaryError> {
        let i = self.normalize(index)?;
        self.write(i, t);
        Ok(())
    }

    /// Iterate over the decoded elements in index order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            array: self,
            front: 0,
            back: self.len,
        }
    }

    /// Decode every element into a freshly allocated vector.
    pub fn to_sequence(&self) -> Vec<i8> {
        self.iter().map(Trit::to_i8).collect()
    }

    /// `-`/`0`/`+` rendering, one character per element.
    pub fn to_trit_string(&self) -> String {
        self.iter().map(|t| t.to_string()).collect()
    }

    /// Raw bit rendering, two characters per element.
    pub fn to_bit_string(&self) -> String {
        self.bits.to_bit_string()
    }

    /// Backing words. Element `i` occupies bits `2*i` (high) and `2*i + 1` (low)
    /// of the buffer, LSB-first within each word.
    pub fn as_words(&self) -> &[u64] {
        self.bits.as_words()
    }

    /// Little-endian byte export of exactly `ceil(2 * len / 8)` bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.bits.to_le_bytes()
    }

    /// Number of elements holding the reserved `11` pattern.
    pub fn reserved_count(&self) -> usize {
        (0..self.len)
            .filter(|&i| self.code_at(i) == RESERVED_CODE)
            .count()
    }

    /// Strict check that no element holds the reserved `11` pattern.
    pub fn validate_encoding(&self) -> Result<(), TernaryError> {
        match (0..self.len).find(|&i| self.code_at(i) == RESERVED_CODE) {
            Some(index) => Err(TernaryError::ReservedPattern { index }),
            None => Ok(()),
        }
    }
}

impl Default for PackedTernaryArray {
    fn default() -> Self {
        Self::new_zeroed(0)
    }
}

impl fmt::Display for PackedTernaryArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedTernaryArray([")?;
        for (i, t) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", t.to_i8())?;
        }
        write!(f, "])")
    }
}

impl fmt::Debug for PackedTernaryArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedTernaryArray")
            .field("len", &self.len)
            .field("bits", &self.to_bit_string())
            .finish()
    }
}

impl FromIterator<Trit> for PackedTernaryArray {
    fn from_iter<I: IntoIterator<Item = Trit>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bits = BitBuffer::with_capacity(iter.size_hint().0.saturating_mul(BITS_PER_TRIT));
        let mut len = 0usize;
        for t in iter {
            bits.push_bits(u64::from(t.encode()), BITS_PER_TRIT);
            len += 1;
        }
        Self { len, bits }
    }
}

impl From<&[Trit]> for PackedTernaryArray {
    fn from(trits: &[Trit]) -> Self {
        trits.iter().copied().collect()
    }
}

impl<'a> IntoIterator for &'a PackedTernaryArray {
    type Item = Trit;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the decoded trits of a [`PackedTernaryArray`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    array: &'a PackedTernaryArray,
    front: usize,
    back: usize,
}

impl Iterator for Iter<'_> {
    type Item = Trit;

    fn next(&mut self) -> Option<Trit> {
        if self.front >= self.back {
            return None;
        }
        let t = Trit::decode(self.array.code_at(self.front));
        self.front += 1;
        Some(t)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Trit> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(Trit::decode(self.array.code_at(self.back)))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl Serialize for PackedTernaryArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(Trit::to_i8))
    }
}

impl<'de> Deserialize<'de> for PackedTernaryArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<i64>::deserialize(deserializer)?;
        Self::from_values(&values).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: [i8; 9] = [-1, 0, 1, 1, 0, -1, 0, 0, 1];

    #[test]
    fn zeroed_reads_zero() {
        let arr = PackedTernaryArray::new_zeroed(40);
        assert_eq!(arr.len(), 40);
        assert_eq!(arr.bit_len(), 80);
        assert_eq!(arr.to_sequence(), vec![0; 40]);
    }

    #[test]
    fn empty_array() {
        let arr = PackedTernaryArray::new_zeroed(0);
        assert!(arr.is_empty());
        assert_eq!(arr.bit_len(), 0);
        assert!(arr.to_sequence().is_empty());
        assert_eq!(arr.to_string(), "PackedTernaryArray([])");
        assert_eq!(
            arr.get(0),
            Err(TernaryError::IndexOutOfRange { index: 0, len: 0 })
        );
        assert_eq!(
            arr.get(-1),
            Err(TernaryError::IndexOutOfRange { index: -1, len: 0 })
        );
    }

    #[test]
    fn concrete_scenario() {
        let mut arr = PackedTernaryArray::from_values(&SCENARIO).unwrap();
        assert_eq!(arr.len(), 9);
        assert_eq!(arr.bit_len(), 18);
        assert_eq!(arr.to_bit_string(), "100001010010000001");

        arr.set(2, -1).unwrap();
        assert_eq!(arr.to_sequence(), vec![-1, 0, -1, 1, 0, -1, 0, 0, 1]);
        assert_eq!(arr.len(), 9);
        assert_eq!(arr.bit_len(), 18);
    }

    #[test]
    fn negative_indices_wrap() {
        let mut arr = PackedTernaryArray::from_values(&SCENARIO).unwrap();
        assert_eq!(arr.get(-1).unwrap(), 1);
        assert_eq!(arr.get(-9).unwrap(), -1);
        arr.set(-9, 1).unwrap();
        assert_eq!(arr.get(0).unwrap(), 1);
    }

    #[test]
    fn index_bounds() {
        let mut arr = PackedTernaryArray::new_zeroed(3);
        assert_eq!(
            arr.get(3),
            Err(TernaryError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            arr.get(-4),
            Err(TernaryError::IndexOutOfRange { index: -4, len: 3 })
        );
        assert_eq!(
            arr.set(3, 0),
            Err(TernaryError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(arr.get(isize::MIN).is_err());
    }

    #[test]
    fn set_validates_value_before_index() {
        let mut arr = PackedTernaryArray::new_zeroed(3);
        assert_eq!(
            arr.set(99, 2),
            Err(TernaryError::InvalidValue {
                value: 2,
                position: None
            })
        );
        assert_eq!(arr.to_sequence(), vec![0, 0, 0]);
    }

    #[test]
    fn set_touches_only_its_group() {
        let mut arr = PackedTernaryArray::from_values(&[1, 1, 1, 1]).unwrap();
        arr.set(1, -1).unwrap();
        arr.set(2, 0).unwrap();
        assert_eq!(arr.to_bit_string(), "01100001");
    }

    #[test]
    fn from_values_reports_first_bad_position() {
        let err = PackedTernaryArray::from_values(&[0i64, 1, 7, -3]).unwrap_err();
        assert_eq!(
            err,
            TernaryError::InvalidValue {
                value: 7,
                position: Some(2)
            }
        );
    }

    #[test]
    fn trit_string_roundtrip() {
        let arr = PackedTernaryArray::from_trit_str("-0++ 0-00+").unwrap();
        assert_eq!(arr.to_sequence(), SCENARIO.to_vec());
        assert_eq!(arr.to_trit_string(), "-0++0-00+");

        let err = PackedTernaryArray::from_trit_str("+0x").unwrap_err();
        assert_eq!(
            err,
            TernaryError::InvalidValue {
                value: 'x' as i64,
                position: Some(2)
            }
        );
    }

    #[test]
    fn typed_access() {
        let mut arr = PackedTernaryArray::new_zeroed(70);
        arr.set_trit(65, Trit::N).unwrap();
        assert_eq!(arr.get_trit(65), Some(Trit::N));
        assert_eq!(arr.get_trit(64), Some(Trit::Z));
        assert_eq!(arr.get_trit(70), None);
        assert_eq!(arr.get_trit(-5), Some(Trit::N));
        assert_eq!(arr.get_trit(-71), None);
        assert_eq!(
            arr.set_trit(isize::MAX, Trit::P),
            Err(TernaryError::IndexOutOfRange {
                index: isize::MAX,
                len: 70
            })
        );
        arr.set_trit(-1, Trit::P).unwrap();
        assert_eq!(arr.get(69).unwrap(), 1);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn zeroed_rejects_overflowing_bit_count() {
        let _ = PackedTernaryArray::new_zeroed(usize::MAX / 2 + 1);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn raw_import_rejects_overflowing_bit_count() {
        let _ = PackedTernaryArray::from_raw_words(usize::MAX, Vec::new());
    }

    #[test]
    fn json_size_with_overflowing_bit_count_is_rejected() {
        use serde_json::json;

        for size in [u64::MAX, u64::MAX / 2 + 1] {
            assert_eq!(
                PackedTernaryArray::from_json(&json!(size)),
                Err(TernaryError::InvalidArgumentType {
                    found: "size exceeding address space"
                })
            );
        }
    }

    #[test]
    fn iter_both_ends() {
        let arr = PackedTernaryArray::from_values(&[1, 0, -1]).unwrap();
        let mut it = arr.iter();
        assert_eq!(it.len(), 3);
        assert_eq!(it.next(), Some(Trit::P));
        assert_eq!(it.next_back(), Some(Trit::N));
        assert_eq!(it.next(), Some(Trit::Z));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);

        let rev: Vec<Trit> = arr.iter().rev().collect();
        assert_eq!(rev, vec![Trit::N, Trit::Z, Trit::P]);
    }

    #[test]
    fn from_trits() {
        let trits = [Trit::N, Trit::P, Trit::Z];
        let arr = PackedTernaryArray::from(&trits[..]);
        assert_eq!(arr.to_sequence(), vec![-1, 1, 0]);
        assert_eq!(arr.bit_len(), 6);
    }

    #[test]
    fn display_and_debug() {
        let arr = PackedTernaryArray::from_values(&[-1, 0, 1]).unwrap();
        assert_eq!(arr.to_string(), "PackedTernaryArray([-1, 0, 1])");
        let dbg = format!("{:?}", arr);
        assert!(dbg.contains("len: 3"));
        assert!(dbg.contains("100001"));
    }

    #[test]
    fn json_constructor() {
        use serde_json::json;

        let arr = PackedTernaryArray::from_json(&json!(4)).unwrap();
        assert_eq!(arr.to_sequence(), vec![0; 4]);

        let arr = PackedTernaryArray::from_json(&json!([1, -1, 0])).unwrap();
        assert_eq!(arr.to_sequence(), vec![1, -1, 0]);

        assert_eq!(
            PackedTernaryArray::from_json(&json!([0, 2])),
            Err(TernaryError::InvalidValue {
                value: 2,
                position: Some(1)
            })
        );
        for (bad, found) in [
            (json!(-3), "negative integer"),
            (json!(1.5), "float"),
            (json!("abc"), "string"),
            (json!(null), "null"),
            (json!(true), "boolean"),
            (json!({"len": 3}), "object"),
            (json!([0, 0.5]), "array containing a non-integer"),
        ] {
            assert_eq!(
                PackedTernaryArray::from_json(&bad),
                Err(TernaryError::InvalidArgumentType { found })
            );
        }
    }

    #[test]
    fn raw_import_reserved_pattern_reads_as_zero() {
        // Element 1 holds 11 (buffer bits 2 and 3).
        let arr = PackedTernaryArray::from_raw_words(3, vec![0b1100]).unwrap();
        assert_eq!(arr.get(1).unwrap(), 0);
        assert_eq!(arr.reserved_count(), 1);
        assert_eq!(
            arr.validate_encoding(),
            Err(TernaryError::ReservedPattern { index: 1 })
        );
    }

    #[test]
    fn set_clears_reserved_pattern() {
        let mut arr = PackedTernaryArray::from_raw_words(2, vec![0b1111]).unwrap();
        assert_eq!(arr.reserved_count(), 2);
        arr.set(0, 1).unwrap();
        arr.set(1, 0).unwrap();
        assert_eq!(arr.reserved_count(), 0);
        assert!(arr.validate_encoding().is_ok());
        assert_eq!(arr.to_sequence(), vec![1, 0]);
    }

    #[test]
    fn raw_import_length_checked() {
        assert_eq!(
            PackedTernaryArray::from_raw_words(33, vec![0]),
            Err(TernaryError::BufferLengthMismatch {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            PackedTernaryArray::from_le_bytes(5, &[0]),
            Err(TernaryError::BufferLengthMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn byte_export_roundtrip() {
        let arr = PackedTernaryArray::from_values(&SCENARIO).unwrap();
        let bytes = arr.to_le_bytes();
        assert_eq!(bytes.len(), 3);
        let back = PackedTernaryArray::from_le_bytes(arr.len(), &bytes).unwrap();
        assert_eq!(back, arr);
        assert!(back.validate_encoding().is_ok());
    }

    #[test]
    fn serde_json_uses_decoded_sequence() {
        let arr = PackedTernaryArray::from_values(&[1, 0, -1]).unwrap();
        let s = serde_json::to_string(&arr).unwrap();
        assert_eq!(s, "[1,0,-1]");
        let back: PackedTernaryArray = serde_json::from_str(&s).unwrap();
        assert_eq!(back, arr);

        let err = serde_json::from_str::<PackedTernaryArray>("[1,5]").unwrap_err();
        assert!(err.to_string().contains("Invalid ternary value 5"));
    }
}
