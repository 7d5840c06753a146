//! The numeric tower: Integer, Float, Decimal, and the Numeric capability.
//!
//! The capability does not demand equal representation; it demands one
//! projection into double precision that mixed-type arithmetic and
//! comparison agree on.

use lapis_core::Rational;

/// The Numeric capability: "I can be projected to a double-precision real
/// for the purposes of arithmetic and comparison."
pub trait Numeric {
    fn float_value(&self) -> f64;
}

/// Payload of an Integer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerObject {
    pub value: i64,
}

impl IntegerObject {
    /// The exact integer value; only integers offer this.
    #[inline]
    pub fn integer_value(&self) -> i64 {
        self.value
    }
}

impl Numeric for IntegerObject {
    #[inline]
    fn float_value(&self) -> f64 {
        self.value as f64
    }
}

/// Payload of a Float object: a native double.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatObject {
    pub value: f64,
}

impl Numeric for FloatObject {
    #[inline]
    fn float_value(&self) -> f64 {
        self.value
    }
}

/// Payload of a Decimal object: an exact rational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalObject {
    pub value: Rational,
}

impl Numeric for DecimalObject {
    #[inline]
    fn float_value(&self) -> f64 {
        self.value.to_f64()
    }
}

/// Render a double the way programs observe it: shortest round-trip
/// representation, never exponential, with `.0` appended when the
/// rendering would otherwise read as an integer. Non-finite values print
/// bare (`NaN`, `inf`, `-inf`).
pub fn format_float(value: f64) -> String {
    let rendered = format!("{value}");
    let integral = rendered
        .bytes()
        .all(|b| b.is_ascii_digit() || b == b'-');
    if integral {
        format!("{rendered}.0")
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_value_projections_agree() {
        let int = IntegerObject { value: 3 };
        let float = FloatObject { value: 3.0 };
        let decimal = DecimalObject {
            value: Rational::from_integer(3),
        };
        assert_eq!(int.float_value(), 3.0);
        assert_eq!(float.float_value(), 3.0);
        assert_eq!(decimal.float_value(), 3.0);
    }

    #[test]
    fn test_format_float_appends_point_zero() {
        assert_eq!(format_float(3.0), "3.0");
        assert_eq!(format_float(-2.0), "-2.0");
        assert_eq!(format_float(3.1), "3.1");
        assert_eq!(format_float(-0.5), "-0.5");
    }

    #[test]
    fn test_format_float_round_trips() {
        for value in [3.1, 0.1, 123.456, -7.25, 1e-8] {
            let parsed: f64 = format_float(value).parse().unwrap();
            assert_eq!(parsed.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn test_format_float_non_finite_prints_bare() {
        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    }
}
