use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;

/// A parsed reading value.
///
/// Values travel as strings (`"50"`, `"1234.5"`) but are compared as decimal
/// numbers. Only finite values parse; `NaN` and infinities are rejected so
/// that the ordering is total, and `-0` is stored as `0`.
///
/// Precision is that of `f64`: integers above 2^53 may compare equal to
/// their neighbours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReadingValue(f64);

impl ReadingValue {
    /// Parse a wire-format value, tolerating surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let parsed: f64 = raw.trim().parse().map_err(|_| TypeError::InvalidValue {
            value: raw.to_string(),
        })?;
        if !parsed.is_finite() {
            return Err(TypeError::InvalidValue {
                value: raw.to_string(),
            });
        }
        // total_cmp orders -0.0 below 0.0.
        if parsed == 0.0 {
            return Ok(Self(0.0));
        }
        Ok(Self(parsed))
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }

    /// Returns `true` if this value is strictly below `other`.
    pub fn is_below(&self, other: &Self) -> bool {
        self.0 < other.0
    }
}

impl Eq for ReadingValue {}

impl PartialOrd for ReadingValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReadingValue {
    fn cmp(&self, other: &Self) -> Ordering {
        // Finite by construction.
        self.0.total_cmp(&other.0)
    }
}

impl FromStr for ReadingValue {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_integers_and_decimals() {
        assert_eq!(ReadingValue::parse("50").unwrap().as_f64(), 50.0);
        assert_eq!(ReadingValue::parse("1234.5").unwrap().as_f64(), 1234.5);
        assert_eq!(ReadingValue::parse(" 7 ").unwrap().as_f64(), 7.0);
    }

    #[test]
    fn compares_numerically_not_lexically() {
        let nine = ReadingValue::parse("9").unwrap();
        let hundred = ReadingValue::parse("100").unwrap();
        assert!(nine < hundred);
        assert!(nine.is_below(&hundred));
    }

    #[test]
    fn equal_values_are_not_below() {
        let a = ReadingValue::parse("50").unwrap();
        let b = ReadingValue::parse("50.0").unwrap();
        assert_eq!(a, b);
        assert!(!a.is_below(&b));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            ReadingValue::parse("fifty"),
            Err(TypeError::InvalidValue { .. })
        ));
        assert!(ReadingValue::parse("").is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(ReadingValue::parse("NaN").is_err());
        assert!(ReadingValue::parse("inf").is_err());
    }

    #[test]
    fn negative_zero_equals_zero() {
        let neg = ReadingValue::parse("-0").unwrap();
        let zero = ReadingValue::parse("0").unwrap();
        assert_eq!(neg, zero);
        assert_eq!(neg.cmp(&zero), Ordering::Equal);
        assert_eq!(neg.to_string(), "0");
    }

    #[test]
    fn precision_is_limited_above_two_pow_53() {
        let lower = ReadingValue::parse("9007199254740992").unwrap();
        let higher = ReadingValue::parse("9007199254740993").unwrap();
        assert_eq!(lower, higher);
        assert!(!higher.is_below(&lower));
    }

    proptest! {
        #[test]
        fn ordering_matches_integer_ordering(a in 0u32..1_000_000, b in 0u32..1_000_000) {
            let va = ReadingValue::parse(&a.to_string()).unwrap();
            let vb = ReadingValue::parse(&b.to_string()).unwrap();
            prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
        }
    }
}
