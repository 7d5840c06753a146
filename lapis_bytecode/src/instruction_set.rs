//! Labelled instruction sequences: one compilation unit each.

use crate::instruction::Instruction;
use std::fmt;
use std::sync::Arc;

/// What kind of program text an instruction set was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetKind {
    /// Top-level program text.
    Program,
    /// A method body.
    Method,
    /// A block body; frames executing it capture their defining
    /// environment.
    Block,
}

impl fmt::Display for SetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SetKind::Program => "program",
            SetKind::Method => "method",
            SetKind::Block => "block",
        };
        f.write_str(text)
    }
}

/// The label distinguishing one compilation unit from another.
#[derive(Debug, Clone)]
pub struct Label {
    pub name: Arc<str>,
    pub kind: SetKind,
}

/// An ordered, labelled sequence of instructions.
///
/// Instruction sets are immutable once built and shared across frames and
/// threads behind `Arc`. Method and block sets additionally carry their
/// positional parameter names and the total number of local slots their
/// frames need.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    pub label: Label,
    pub instructions: Vec<Instruction>,
    /// Positional parameter names; parameters occupy the first local slots.
    pub parameters: Vec<Arc<str>>,
    /// Total local slots, parameters included.
    pub local_count: usize,
}

impl InstructionSet {
    /// Number of positional parameters.
    #[inline]
    pub fn arg_count(&self) -> usize {
        self.parameters.len()
    }

    /// Number of instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Debugging projection: the label on one line, then one instruction
    /// per line.
    pub fn inspect(&self) -> String {
        let mut out = format!("<{}>\n", self.label.name);
        for instruction in &self.instructions {
            out.push_str(&instruction.inspect());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{Action, Instruction, Operand};

    #[test]
    fn test_inspect_lists_instructions() {
        let set = InstructionSet {
            label: Label {
                name: "main".into(),
                kind: SetKind::Program,
            },
            instructions: vec![
                Instruction::new(Action::PutObject, [Operand::Integer(1)], 1),
                Instruction::new(Action::Leave, [], 1),
            ],
            parameters: vec![],
            local_count: 0,
        };
        assert_eq!(set.inspect(), "<main>\nput_object: 1\nleave: \n");
    }

    #[test]
    fn test_arg_count_tracks_parameters() {
        let set = InstructionSet {
            label: Label {
                name: "add".into(),
                kind: SetKind::Method,
            },
            instructions: vec![],
            parameters: vec!["a".into(), "b".into()],
            local_count: 3,
        };
        assert_eq!(set.arg_count(), 2);
        assert!(set.is_empty());
    }
}
