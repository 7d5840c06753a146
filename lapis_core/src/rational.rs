//! Exact rational arithmetic for the Decimal class.
//!
//! A [`Rational`] is a reduced fraction of arbitrary-precision integers
//! with a positive denominator. Decimal literals parse digit-for-digit
//! into a rational, so `0.1 + 0.2` is exactly `0.3` in this tower; the
//! double-precision projection happens only at the Numeric coercion seam.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

/// A reduced rational number with a positive denominator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

fn gcd(mut a: BigInt, mut b: BigInt) -> BigInt {
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

impl Rational {
    /// Build a rational from numerator and denominator.
    ///
    /// Returns `None` when the denominator is zero. The result is reduced
    /// and sign-normalised.
    pub fn new(num: BigInt, den: BigInt) -> Option<Rational> {
        if den.is_zero() {
            return None;
        }
        let (mut num, mut den) = if den.is_negative() {
            (-num, -den)
        } else {
            (num, den)
        };
        let g = gcd(num.abs(), den.clone());
        if !g.is_zero() && !g.is_one() {
            num /= &g;
            den /= &g;
        }
        Some(Rational { num, den })
    }

    /// The rational equal to `value`.
    pub fn from_integer(value: i64) -> Rational {
        Rational {
            num: BigInt::from(value),
            den: BigInt::one(),
        }
    }

    /// Parse a plain decimal string: optional sign, digits, optional
    /// fractional digits. Exponents and fraction slashes are rejected.
    pub fn from_decimal_str(text: &str) -> Option<Rational> {
        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, text.strip_prefix('+').unwrap_or(text)),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if int_part.is_empty()
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let mut num: BigInt = int_part.parse().ok()?;
        let mut den = BigInt::one();
        if !frac_part.is_empty() {
            let frac: BigInt = frac_part.parse().ok()?;
            let scale = BigInt::from(10u32).pow(frac_part.len() as u32);
            num = num * &scale + frac;
            den = scale;
        }
        Rational::new(num * sign, den)
    }

    /// Numerator of the reduced form.
    pub fn numerator(&self) -> &BigInt {
        &self.num
    }

    /// Denominator of the reduced form; always positive.
    pub fn denominator(&self) -> &BigInt {
        &self.den
    }

    /// Project into double precision. Values beyond the range of `f64`
    /// saturate to infinities.
    pub fn to_f64(&self) -> f64 {
        let num = self.num.to_f64().unwrap_or(f64::NAN);
        let den = self.den.to_f64().unwrap_or(f64::NAN);
        num / den
    }

    /// Truncate toward zero.
    pub fn truncated(&self) -> BigInt {
        &self.num / &self.den
    }

    /// Truncate toward zero into an `i64`, if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.truncated().to_i64()
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.num.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    pub fn add(&self, other: &Rational) -> Rational {
        Rational::new(
            &self.num * &other.den + &other.num * &self.den,
            &self.den * &other.den,
        )
        .unwrap()
    }

    pub fn sub(&self, other: &Rational) -> Rational {
        Rational::new(
            &self.num * &other.den - &other.num * &self.den,
            &self.den * &other.den,
        )
        .unwrap()
    }

    pub fn mul(&self, other: &Rational) -> Rational {
        Rational::new(&self.num * &other.num, &self.den * &other.den).unwrap()
    }

    /// Exact division; `None` when `other` is zero.
    pub fn div(&self, other: &Rational) -> Option<Rational> {
        if other.is_zero() {
            return None;
        }
        Rational::new(&self.num * &other.den, &self.den * &other.num)
    }

    /// Whether the reduced denominator is of the form 2^a * 5^b, i.e. the
    /// value has a terminating decimal expansion.
    fn terminating(&self) -> Option<(u32, u32)> {
        let mut rest = self.den.clone();
        let two = BigInt::from(2u32);
        let five = BigInt::from(5u32);
        let mut twos = 0u32;
        let mut fives = 0u32;
        while (&rest % &two).is_zero() {
            rest /= &two;
            twos += 1;
        }
        while (&rest % &five).is_zero() {
            rest /= &five;
            fives += 1;
        }
        if rest.is_one() {
            Some((twos, fives))
        } else {
            None
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Rational) -> Ordering {
        // Denominators are positive, so cross-multiplication preserves order.
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

impl fmt::Display for Rational {
    /// Exact decimal form when the expansion terminates, `n/d` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.terminating() {
            Some((twos, fives)) => {
                let places = twos.max(fives);
                if places == 0 {
                    return write!(f, "{}", self.num);
                }
                let scale = BigInt::from(2u32).pow(places - twos)
                    * BigInt::from(5u32).pow(places - fives);
                let scaled = (self.num.abs() * scale).to_string();
                let places = places as usize;
                let padded = if scaled.len() <= places {
                    format!("{}{}", "0".repeat(places + 1 - scaled.len()), scaled)
                } else {
                    scaled
                };
                let split = padded.len() - places;
                let sign = if self.num.is_negative() { "-" } else { "" };
                write!(f, "{}{}.{}", sign, &padded[..split], &padded[split..])
            }
            None => write!(f, "{}/{}", self.num, self.den),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(text: &str) -> Rational {
        Rational::from_decimal_str(text).unwrap()
    }

    #[test]
    fn test_parse_and_print() {
        assert_eq!(dec("100.1").to_string(), "100.1");
        assert_eq!(dec("-0.5").to_string(), "-0.5");
        assert_eq!(dec("3.14159265358979").to_string(), "3.14159265358979");
        assert_eq!(dec("42").to_string(), "42");
        assert_eq!(dec("0.750").to_string(), "0.75");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Rational::from_decimal_str("").is_none());
        assert!(Rational::from_decimal_str(".5").is_none());
        assert!(Rational::from_decimal_str("1e3").is_none());
        assert!(Rational::from_decimal_str("1/3").is_none());
        assert!(Rational::from_decimal_str("1.2.3").is_none());
    }

    #[test]
    fn test_exact_arithmetic() {
        let sum = dec("0.1").add(&dec("0.2"));
        assert_eq!(sum, dec("0.3"));
        assert_eq!(sum.to_string(), "0.3");
    }

    #[test]
    fn test_non_terminating_prints_as_fraction() {
        let third = Rational::from_integer(1)
            .div(&Rational::from_integer(3))
            .unwrap();
        assert_eq!(third.to_string(), "1/3");
    }

    #[test]
    fn test_division_by_zero() {
        assert!(dec("1.5").div(&Rational::from_integer(0)).is_none());
    }

    #[test]
    fn test_truncation() {
        assert_eq!(dec("100.9").to_i64(), Some(100));
        assert_eq!(dec("-100.9").to_i64(), Some(-100));
    }

    #[test]
    fn test_ordering() {
        assert!(dec("0.1") < dec("0.2"));
        assert!(dec("-1.5") < dec("0"));
        assert_eq!(dec("2.50").cmp(&dec("2.5")), Ordering::Equal);
    }

    proptest! {
        #[test]
        fn prop_display_roundtrips(int in -10_000i64..10_000, frac in 0u32..10_000) {
            let text = format!("{int}.{frac:04}");
            let parsed = dec(&text);
            let reparsed = dec(&parsed.to_string());
            prop_assert_eq!(parsed, reparsed);
        }

        #[test]
        fn prop_add_sub_inverse(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            let ra = Rational::from_integer(a);
            let rb = Rational::from_integer(b);
            prop_assert_eq!(ra.add(&rb).sub(&rb), ra);
        }

        #[test]
        fn prop_order_agrees_with_f64(a in -1_000i32..1_000, b in -1_000i32..1_000) {
            let ra = Rational::new(a.into(), 7.into()).unwrap();
            let rb = Rational::new(b.into(), 7.into()).unwrap();
            let expected = ra.to_f64().partial_cmp(&rb.to_f64()).unwrap();
            prop_assert_eq!(ra.cmp(&rb), expected);
        }
    }
}
