//! Language-level error kinds and message formats.
//!
//! Built-in methods signal faults by returning an error object; the kind
//! and message text live here so every builtin reports identically. The
//! formats are part of the user-visible surface and must not change
//! casually.

use std::fmt;

/// The kind of a language-level error object.
///
/// Each kind doubles as the name of a top-level class, so `rescue`-style
/// constructs in the surface language can match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An operand had the wrong class.
    TypeError,
    /// Wrong number of arguments, or an argument value out of domain.
    ArgumentError,
    /// Division or modulo by exact zero.
    ZeroDivisionError,
    /// Method lookup failed on the receiver's ancestry.
    NoMethodError,
    /// Constant or top-level class lookup failed.
    NameError,
    /// The operation is recognised but deliberately unsupported.
    NotImplementedError,
    /// The machine detected its own state is corrupt.
    InternalError,
}

impl ErrorKind {
    /// The class name this kind is registered under.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ArgumentError => "ArgumentError",
            ErrorKind::ZeroDivisionError => "ZeroDivisionError",
            ErrorKind::NoMethodError => "NoMethodError",
            ErrorKind::NameError => "NameError",
            ErrorKind::NotImplementedError => "NotImplementedError",
            ErrorKind::InternalError => "InternalError",
        }
    }

    /// Every kind, in registration order.
    pub const ALL: &'static [ErrorKind] = &[
        ErrorKind::TypeError,
        ErrorKind::ArgumentError,
        ErrorKind::ZeroDivisionError,
        ErrorKind::NoMethodError,
        ErrorKind::NameError,
        ErrorKind::NotImplementedError,
        ErrorKind::InternalError,
    ];
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Message for divide-by-zero faults.
pub const DIVIDED_BY_ZERO: &str = "Divided by 0";

/// Message for an argument of the wrong class.
///
/// `expected` is a type tag, not necessarily a concrete class name; the
/// numeric builtins pass `"Numeric"`.
pub fn wrong_argument_type(expected: &str, got: &str) -> String {
    format!("Expect argument to be {expected}. got: {got}")
}

/// Message for an exact-arity mismatch.
pub fn wrong_number_of_arguments(expected: usize, got: usize) -> String {
    format!("Expect {expected} argument(s). got={got}")
}

/// Message for an arity mismatch against an inclusive range.
pub fn wrong_number_of_arguments_range(min: usize, max: usize, got: usize) -> String {
    format!("Expect {min}..{max} argument(s). got={got}")
}

/// Message for a string that does not parse as a decimal number.
pub fn invalid_numeric_string(got: &str) -> String {
    format!("Invalid numeric string. got: {got}")
}

/// Message for a failed method lookup.
pub fn undefined_method(name: &str, class_name: &str) -> String {
    format!("Undefined Method '{name}' for {class_name}")
}

/// Message for a failed constant or class lookup.
pub fn uninitialized_constant(name: &str) -> String {
    format!("Uninitialized constant {name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_display() {
        for kind in ErrorKind::ALL {
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_message_formats() {
        assert_eq!(
            wrong_argument_type("Numeric", "Integer"),
            "Expect argument to be Numeric. got: Integer"
        );
        assert_eq!(wrong_number_of_arguments(1, 3), "Expect 1 argument(s). got=3");
        assert_eq!(
            wrong_number_of_arguments_range(0, 1, 2),
            "Expect 0..1 argument(s). got=2"
        );
        assert_eq!(
            undefined_method("new", "Float"),
            "Undefined Method 'new' for Float"
        );
    }
}
