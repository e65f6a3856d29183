//! Numeric values.

use std::cmp::Ordering;
use std::fmt;

/// Numeric magnitude of a value.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    /// Signed integer.
    Signed(i64),
    /// Unsigned integer too large for `i64` (Counter64 ranges).
    Unsigned(u64),
    /// Floating point; only used for the `PLUS-INFINITY` / `MINUS-INFINITY`
    /// sentinels of REAL types.
    Float(f64),
}

impl Number {
    /// Integer magnitude, or `None` for floating values.
    #[must_use]
    pub fn as_i128(self) -> Option<i128> {
        match self {
            Self::Signed(v) => Some(i128::from(v)),
            Self::Unsigned(v) => Some(i128::from(v)),
            Self::Float(_) => None,
        }
    }

    /// Value as `f64` (lossy for very large integers).
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Signed(v) => v as f64,
            Self::Unsigned(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Check if this is a floating value.
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Integer value as a `u32` arc, if it fits.
    #[must_use]
    pub fn as_u32(self) -> Option<u32> {
        self.as_i128().and_then(|v| u32::try_from(v).ok())
    }

    /// Compare two numbers by magnitude.
    ///
    /// Integers compare exactly; as soon as one side is floating both are
    /// compared as `f64` with a total order.
    #[must_use]
    pub fn compare(self, other: Self) -> Ordering {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(*other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Self::Signed(v)
    }
}

impl From<u64> for Number {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Self::Unsigned(v), Self::Signed)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Float(v) if v.is_infinite() && *v > 0.0 => write!(f, "PLUS-INFINITY"),
            Self::Float(v) if v.is_infinite() => write!(f, "MINUS-INFINITY"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Radix the number was written in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NumberFormat {
    /// Plain decimal.
    #[default]
    Decimal,
    /// Binary string, `'0101'B`.
    Binary,
    /// Hexadecimal string, `'FF00'H`.
    Hex,
}

/// A numeric value with its original formatting hint.
///
/// Equality ignores the formatting: `'FF'H` equals `255`.
#[derive(Clone, Copy, Debug)]
pub struct NumberValue {
    /// The magnitude.
    pub number: Number,
    /// Radix hint for display.
    pub format: NumberFormat,
    /// Minimum digit count for binary/hex display (leading zeros).
    pub min_digits: u32,
}

impl PartialEq for NumberValue {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for NumberValue {}

impl NumberValue {
    /// Create a decimal number.
    #[must_use]
    pub fn new(number: impl Into<Number>) -> Self {
        Self {
            number: number.into(),
            format: NumberFormat::Decimal,
            min_digits: 0,
        }
    }

    /// Create a floating number.
    #[must_use]
    pub fn float(v: f64) -> Self {
        Self {
            number: Number::Float(v),
            format: NumberFormat::Decimal,
            min_digits: 0,
        }
    }

    /// Create a hex-formatted number with a minimum digit width.
    #[must_use]
    pub fn hex(v: u64, min_digits: u32) -> Self {
        Self {
            number: Number::from(v),
            format: NumberFormat::Hex,
            min_digits,
        }
    }

    /// Create a binary-formatted number with a minimum digit width.
    #[must_use]
    pub fn binary(v: u64, min_digits: u32) -> Self {
        Self {
            number: Number::from(v),
            format: NumberFormat::Binary,
            min_digits,
        }
    }

    /// Check if this was written as a binary or hex string.
    #[must_use]
    pub fn is_radix_string(&self) -> bool {
        self.format != NumberFormat::Decimal
    }

    /// Octet length implied by a binary or hex string, `None` for decimals.
    #[must_use]
    pub fn octet_length(&self) -> Option<u32> {
        let digits = self.digits();
        match self.format {
            NumberFormat::Decimal => None,
            NumberFormat::Hex => Some(digits.len().div_ceil(2) as u32),
            NumberFormat::Binary => Some(digits.len().div_ceil(8) as u32),
        }
    }

    fn digits(&self) -> String {
        let raw = match (self.format, self.number.as_i128()) {
            (NumberFormat::Hex, Some(v)) => format!("{v:X}"),
            (NumberFormat::Binary, Some(v)) => format!("{v:b}"),
            _ => return self.number.to_string(),
        };
        let width = self.min_digits as usize;
        if raw.len() < width {
            format!("{raw:0>width$}")
        } else {
            raw
        }
    }
}

impl fmt::Display for NumberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            NumberFormat::Decimal => write!(f, "{}", self.number),
            NumberFormat::Hex => write!(f, "'{}'H", self.digits()),
            NumberFormat::Binary => write!(f, "'{}'B", self.digits()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_format() {
        assert_eq!(NumberValue::hex(255, 2), NumberValue::new(255i64));
        assert_eq!(Number::Unsigned(5), Number::Signed(5));
        assert_ne!(Number::Signed(5), Number::Signed(6));
    }

    #[test]
    fn test_from_u64_prefers_signed() {
        assert!(matches!(Number::from(7u64), Number::Signed(7)));
        assert!(matches!(Number::from(u64::MAX), Number::Unsigned(u64::MAX)));
    }

    #[test]
    fn test_compare_mixed() {
        assert_eq!(
            Number::Signed(-1).compare(Number::Unsigned(u64::MAX)),
            Ordering::Less
        );
        assert_eq!(
            Number::Float(f64::INFINITY).compare(Number::Unsigned(u64::MAX)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_display_radix() {
        assert_eq!(NumberValue::hex(0xA, 4).to_string(), "'000A'H");
        assert_eq!(NumberValue::binary(5, 8).to_string(), "'00000101'B");
        assert_eq!(NumberValue::new(-3i64).to_string(), "-3");
        assert_eq!(NumberValue::float(f64::NEG_INFINITY).to_string(), "MINUS-INFINITY");
    }

    #[test]
    fn test_octet_length() {
        assert_eq!(NumberValue::hex(0xFF00, 4).octet_length(), Some(2));
        assert_eq!(NumberValue::binary(1, 8).octet_length(), Some(1));
        assert_eq!(NumberValue::new(10i64).octet_length(), None);
    }
}
