//! Signed fixed-point decimal with 18 fractional digits.
//!
//! Used for the auto-restake ratio and for delegation shares. All arithmetic
//! is exact integer arithmetic on the scaled `i128` representation so every
//! replica computes bit-identical results. Conversions to token amounts
//! always truncate toward zero.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional decimal digits.
pub const PRECISION: u32 = 18;

const SCALE: i128 = 10i128.pow(PRECISION);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dec(i128);

impl Dec {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(SCALE);

    /// Build from the scaled representation (`raw / 10^18`).
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> i128 {
        self.0
    }

    /// Build from a whole number of units; `None` if it does not fit.
    pub fn from_int(units: u128) -> Option<Self> {
        i128::try_from(units)
            .ok()?
            .checked_mul(SCALE)
            .map(Self)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// `floor(amount * self)`; `None` for a negative decimal or on overflow.
    pub fn checked_mul_int_truncate(&self, amount: u128) -> Option<u128> {
        if self.is_negative() {
            return None;
        }
        mul_div_floor(amount, self.0 as u128, SCALE as u128)
    }
}

/// `floor(a * b / d)` without intermediate overflow where the result fits.
///
/// Splits `a = q*d + r` so that `a*b/d = q*b + r*b/d`. `None` when `d` is
/// zero or the result does not fit.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    let q = a / d;
    let r = a % d;
    let whole = q.checked_mul(b)?;
    let frac = match r.checked_mul(b) {
        Some(rb) => rb / d,
        None => {
            let (bq, br) = (b / d, b % d);
            r.checked_mul(bq)?.checked_add(r.checked_mul(br)? / d)?
        }
    };
    whole.checked_add(frac)
}

impl FromStr for Dec {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidDecimal(s.to_string());
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty()
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
            || frac_part.len() > PRECISION as usize
            || (body.contains('.') && frac_part.is_empty())
        {
            return Err(invalid());
        }

        let int_value: i128 = int_part.parse().map_err(|_| invalid())?;
        let mut frac_value: i128 = 0;
        if !frac_part.is_empty() {
            frac_value = frac_part.parse().map_err(|_| invalid())?;
            frac_value *= 10i128.pow(PRECISION - frac_part.len() as u32);
        }
        let raw = int_value
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac_value))
            .ok_or_else(invalid)?;
        Ok(Self(if negative { -raw } else { raw }))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u128;
        let int = abs / scale;
        let frac = abs % scale;
        if frac == 0 {
            return write!(f, "{sign}{int}");
        }
        let digits = format!("{:0width$}", frac, width = PRECISION as usize);
        write!(f, "{sign}{int}.{}", digits.trim_end_matches('0'))
    }
}

impl TryFrom<String> for Dec {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Dec> for String {
    fn from(d: Dec) -> Self {
        d.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Dec {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats() {
        assert_eq!(dec("0.25").to_string(), "0.25");
        assert_eq!(dec("1").to_string(), "1");
        assert_eq!(dec("1.000").to_string(), "1");
        assert_eq!(dec("-0.01").to_string(), "-0.01");
        assert_eq!(dec("0.000000000000000001").raw(), 1);
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", ".5", "1.", "abc", "1.2.3", "0.0000000000000000001", "--1", "+1"] {
            assert!(bad.parse::<Dec>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn ordering_matches_value() {
        assert!(dec("-0.01") < Dec::ZERO);
        assert!(dec("1.01") > Dec::ONE);
        assert!(dec("0.999999999999999999") < Dec::ONE);
    }

    #[test]
    fn mul_truncates_toward_zero() {
        assert_eq!(dec("0.25").checked_mul_int_truncate(1000), Some(250));
        assert_eq!(dec("0.25").checked_mul_int_truncate(3), Some(0));
        assert_eq!(dec("0.333").checked_mul_int_truncate(10), Some(3));
        assert_eq!(dec("-0.5").checked_mul_int_truncate(10), None);
    }

    #[test]
    fn mul_handles_large_amounts() {
        let big = u128::MAX / 2;
        assert_eq!(Dec::ONE.checked_mul_int_truncate(big), Some(big));
        assert_eq!(dec("0.5").checked_mul_int_truncate(big), Some(big / 2));
    }
}
