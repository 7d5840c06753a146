//! Canonical names of the built-in top-level classes.
//!
//! The class registry is keyed by name; these constants keep the spelling
//! in one place so builtins, the bootstrap sequence, and error messages
//! cannot drift apart.

/// Root of the inheritance chain.
pub const OBJECT_CLASS: &str = "Object";
/// The class of class objects.
pub const CLASS_CLASS: &str = "Class";
/// Fixed-width signed integers.
pub const INTEGER_CLASS: &str = "Integer";
/// Double-precision floating point numbers.
pub const FLOAT_CLASS: &str = "Float";
/// Exact decimal numbers backed by rationals.
pub const DECIMAL_CLASS: &str = "Decimal";
/// UTF-8 strings.
pub const STRING_CLASS: &str = "String";
/// The two canonical booleans.
pub const BOOLEAN_CLASS: &str = "Boolean";
/// The class of the single `nil` object.
pub const NULL_CLASS: &str = "Null";
/// Ordered object sequences.
pub const ARRAY_CLASS: &str = "Array";
/// String-keyed maps.
pub const HASH_CLASS: &str = "Hash";
/// Integer ranges.
pub const RANGE_CLASS: &str = "Range";
/// First-class closures.
pub const BLOCK_CLASS: &str = "Block";
/// Host-opaque values carrying a raw pointer address.
pub const OPAQUE_CLASS: &str = "Opaque";

/// Names of every class installed at bootstrap, in installation order.
pub const BOOTSTRAP_CLASSES: &[&str] = &[
    OBJECT_CLASS,
    CLASS_CLASS,
    INTEGER_CLASS,
    FLOAT_CLASS,
    DECIMAL_CLASS,
    STRING_CLASS,
    BOOLEAN_CLASS,
    NULL_CLASS,
    ARRAY_CLASS,
    HASH_CLASS,
    RANGE_CLASS,
    BLOCK_CLASS,
    OPAQUE_CLASS,
];
