//! Concrete string evaluation.
//!
//! When every operand of a string operation is concrete the engine evaluates
//! it here instead of building a query. Results match what a solver reports
//! for the same fully-concrete SMT-LIB term: positions and lengths count
//! Unicode scalar values, `substr` takes an inclusive `[start, end]` range
//! (the same convention `StrSubstr` uses when translated), and integer results
//! are fixed-width bitvectors.

use std::fmt;

use crate::error::BackendError;
use crate::normalize::signed_value;

/// A concrete string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringValue {
    value: String,
}

impl StringValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }
}

impl From<&str> for StringValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StringValue {
    fn from(value: String) -> Self {
        Self { value }
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A concrete fixed-width bitvector, stored modulo `2^width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitVecValue {
    bits: u128,
    width: u32,
}

impl BitVecValue {
    /// Truncate `value` to `width` bits. Widths outside `1..=128` are rejected.
    pub fn new(value: i128, width: u32) -> Result<Self, BackendError> {
        Self::from_bits(value as u128, width)
    }

    fn from_bits(bits: u128, width: u32) -> Result<Self, BackendError> {
        if !(1..=128).contains(&width) {
            return Err(BackendError::malformed(
                "BVV",
                format!("bitvector width {width} outside 1..=128"),
            ));
        }
        let mask = if width == 128 {
            u128::MAX
        } else {
            (1u128 << width) - 1
        };
        Ok(Self {
            bits: bits & mask,
            width,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn unsigned(&self) -> u128 {
        self.bits
    }

    /// Two's-complement reading.
    pub fn signed(&self) -> i128 {
        signed_value(self.bits as i128, self.width)
    }
}

impl fmt::Display for BitVecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.bits, self.width)
    }
}

/// Concatenate in order.
pub fn concat<'a>(values: impl IntoIterator<Item = &'a StringValue>) -> StringValue {
    let value: String = values.into_iter().map(StringValue::as_str).collect();
    StringValue::from(value)
}

/// Characters `start..=end` of `s`.
///
/// Empty when `start` is negative, `start` is past the end, or `end < start`.
/// `end` is clamped to the last character.
pub fn substr(start: i128, end: i128, s: &StringValue) -> StringValue {
    let len = s.char_len() as i128;
    if start < 0 || start >= len || end < start {
        return StringValue::default();
    }
    let last = end.min(len - 1);
    let value: String = s
        .as_str()
        .chars()
        .skip(start as usize)
        .take((last - start + 1) as usize)
        .collect();
    StringValue::from(value)
}

/// Replace the first occurrence of `pattern`; `s` is returned unchanged if
/// there is none. An empty pattern matches at the start.
pub fn replace(s: &StringValue, pattern: &StringValue, replacement: &StringValue) -> StringValue {
    StringValue::from(s.as_str().replacen(pattern.as_str(), replacement.as_str(), 1))
}

/// Length of `s` as a `width`-bit value.
pub fn length(s: &StringValue, width: u32) -> Result<BitVecValue, BackendError> {
    BitVecValue::from_bits(s.char_len() as u128, width)
}

pub fn contains(s: &StringValue, sub: &StringValue) -> bool {
    s.as_str().contains(sub.as_str())
}

/// Whether `s` starts with the literal `prefix`.
pub fn prefix_of(prefix: &StringValue, s: &StringValue) -> bool {
    s.as_str().starts_with(prefix.as_str())
}

/// Whether `s` ends with the literal `suffix`.
pub fn suffix_of(suffix: &StringValue, s: &StringValue) -> bool {
    s.as_str().ends_with(suffix.as_str())
}

/// Character index of the first occurrence of `sub` in `s`, or `-1`.
pub fn index_of(
    s: &StringValue,
    sub: &StringValue,
    width: u32,
) -> Result<BitVecValue, BackendError> {
    let index = match s.as_str().find(sub.as_str()) {
        Some(byte) => s.as_str()[..byte].chars().count() as i128,
        None => -1,
    };
    BitVecValue::new(index, width)
}

/// Decimal value of a non-empty all-digit string, or `-1`.
///
/// Values too large for `width` bits wrap.
pub fn to_int(s: &StringValue, width: u32) -> Result<BitVecValue, BackendError> {
    let text = s.as_str();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return BitVecValue::new(-1, width);
    }
    let bits = text.bytes().fold(0u128, |acc, b| {
        acc.wrapping_mul(10).wrapping_add(u128::from(b - b'0'))
    });
    BitVecValue::from_bits(bits, width)
}
