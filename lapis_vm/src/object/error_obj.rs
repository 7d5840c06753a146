//! First-class error objects.
//!
//! Built-in methods signal faults by returning one of these; the
//! interpreter checks every builtin result and unwinds when it sees an
//! error kind. Uncaught errors surface to the embedder with their kind,
//! message, and source line intact.

use lapis_core::ErrorKind;
use std::fmt;

/// Payload of an error object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorObject {
    pub kind: ErrorKind,
    pub message: String,
    /// Line in the original program text the fault is attributed to.
    pub source_line: usize,
}

impl ErrorObject {
    pub fn new(kind: ErrorKind, source_line: usize, message: impl Into<String>) -> ErrorObject {
        ErrorObject {
            kind,
            message: message.into(),
            source_line,
        }
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pairs_kind_and_message() {
        let error = ErrorObject::new(ErrorKind::TypeError, 3, "Expect argument to be Numeric. got: String");
        assert_eq!(
            error.to_string(),
            "TypeError: Expect argument to be Numeric. got: String"
        );
        assert_eq!(error.source_line, 3);
    }
}
