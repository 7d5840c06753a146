//! Fatal machine faults.
//!
//! Language-level faults travel as error objects (see
//! [`crate::object::error_obj`]); the variants here are the faults the
//! machine never recovers from, plus the carrier for an error object that
//! reached the top of a thread uncaught.

use crate::object::error_obj::ErrorObject;
use std::fmt;

/// Result alias used throughout the VM.
pub type VmResult<T> = Result<T, VmError>;

/// A fault that aborts the executing thread.
#[derive(Debug, Clone)]
pub enum VmError {
    /// Push onto a full operand stack. Signals interpreter corruption.
    StackOverflow { capacity: usize },
    /// Pop from an empty operand stack. Signals interpreter corruption.
    StackUnderflow,
    /// Pop from an empty call-frame stack. Signals interpreter corruption.
    FrameUnderflow,
    /// Call-frame depth exceeded the configured limit.
    FrameOverflow { limit: usize },
    /// An instruction's operands did not match its action's contract.
    MalformedInstruction { action: &'static str },
    /// The thread was cancelled between instructions.
    Cancelled,
    /// An error object reached the top of the thread uncaught.
    Uncaught(ErrorObject),
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::StackOverflow { capacity } => {
                write!(f, "InternalError: operand stack overflow (capacity {capacity})")
            }
            VmError::StackUnderflow => f.write_str("InternalError: operand stack underflow"),
            VmError::FrameUnderflow => f.write_str("InternalError: call-frame stack underflow"),
            VmError::FrameOverflow { limit } => {
                write!(f, "InternalError: call-frame depth exceeded {limit}")
            }
            VmError::MalformedInstruction { action } => {
                write!(f, "InternalError: malformed operands for '{action}'")
            }
            VmError::Cancelled => f.write_str("thread cancelled"),
            VmError::Uncaught(error) => {
                write!(f, "{}: {} (line {})", error.kind, error.message, error.source_line)
            }
        }
    }
}

impl std::error::Error for VmError {}

#[cfg(test)]
mod tests {
    use super::*;
    use lapis_core::ErrorKind;

    #[test]
    fn test_uncaught_display_carries_line() {
        let error = VmError::Uncaught(ErrorObject {
            kind: ErrorKind::ZeroDivisionError,
            message: "Divided by 0".to_string(),
            source_line: 7,
        });
        assert_eq!(error.to_string(), "ZeroDivisionError: Divided by 0 (line 7)");
    }
}
