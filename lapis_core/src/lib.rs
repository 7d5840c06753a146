//! Shared leaf types for the Lapis virtual machine.
//!
//! This crate holds the pieces every other Lapis crate agrees on but that
//! carry no execution state of their own:
//!
//! - [`classes`] - canonical names of the built-in top-level classes
//! - [`errors`] - language-level error kinds and their message formats
//! - [`intern`] - the process-wide string intern table
//! - [`rational`] - exact rational arithmetic backing the Decimal class

pub mod classes;
pub mod errors;
pub mod intern;
pub mod rational;

pub use errors::ErrorKind;
pub use intern::Interner;
pub use rational::Rational;
