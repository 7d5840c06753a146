//! Construction API for instruction sets.
//!
//! Compilers emit forward jumps before their targets exist; the builder
//! hands out [`JumpLabel`]s, records which jump operands reference them,
//! and patches absolute targets in at [`finish`](InstructionSetBuilder::finish).

use crate::instruction::{Action, Instruction, Operand};
use crate::instruction_set::{InstructionSet, Label, SetKind};
use std::fmt;
use std::sync::Arc;

/// A not-yet-resolved jump target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpLabel(usize);

/// Errors surfaced when finishing a builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A jump referenced a label that was never bound to a position.
    UnboundLabel(usize),
}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderError::UnboundLabel(id) => write!(f, "jump label {id} was never bound"),
        }
    }
}

impl std::error::Error for BuilderError {}

/// Incremental builder for one [`InstructionSet`].
pub struct InstructionSetBuilder {
    label: Label,
    parameters: Vec<Arc<str>>,
    extra_locals: usize,
    instructions: Vec<Instruction>,
    labels: Vec<Option<usize>>,
    /// (instruction index, label id) pairs whose first operand is patched
    /// to the label's absolute position.
    patches: Vec<(usize, usize)>,
}

impl InstructionSetBuilder {
    fn new(name: &str, kind: SetKind) -> Self {
        Self {
            label: Label {
                name: name.into(),
                kind,
            },
            parameters: Vec::new(),
            extra_locals: 0,
            instructions: Vec::new(),
            labels: Vec::new(),
            patches: Vec::new(),
        }
    }

    /// Builder for top-level program text.
    pub fn program(name: &str) -> Self {
        Self::new(name, SetKind::Program)
    }

    /// Builder for a method body.
    pub fn method(name: &str) -> Self {
        Self::new(name, SetKind::Method)
    }

    /// Builder for a block body.
    pub fn block(name: &str) -> Self {
        Self::new(name, SetKind::Block)
    }

    /// Declare positional parameters; they occupy the first local slots.
    pub fn parameters(mut self, names: &[&str]) -> Self {
        self.parameters = names.iter().map(|n| Arc::from(*n)).collect();
        self
    }

    /// Reserve local slots beyond the parameters.
    pub fn locals(mut self, count: usize) -> Self {
        self.extra_locals = count;
        self
    }

    /// Append an instruction.
    pub fn emit(
        mut self,
        action: Action,
        params: impl IntoIterator<Item = Operand>,
        source_line: usize,
    ) -> Self {
        self.instructions
            .push(Instruction::new(action, params, source_line));
        self
    }

    /// Allocate a fresh jump label.
    pub fn jump_label(&mut self) -> JumpLabel {
        self.labels.push(None);
        JumpLabel(self.labels.len() - 1)
    }

    /// Append a jump-family instruction targeting `label`. The target
    /// operand is patched when the builder finishes.
    pub fn emit_jump(mut self, action: Action, label: JumpLabel, source_line: usize) -> Self {
        self.patches.push((self.instructions.len(), label.0));
        self.instructions.push(Instruction::new(
            action,
            [Operand::Integer(0)],
            source_line,
        ));
        self
    }

    /// Bind `label` to the position of the next emitted instruction.
    pub fn bind(mut self, label: JumpLabel) -> Self {
        self.labels[label.0] = Some(self.instructions.len());
        self
    }

    /// Patch jumps and produce the finished set.
    pub fn finish(mut self) -> Result<Arc<InstructionSet>, BuilderError> {
        for (index, label_id) in &self.patches {
            let target = self.labels[*label_id].ok_or(BuilderError::UnboundLabel(*label_id))?;
            self.instructions[*index].params[0] = Operand::Integer(target as i64);
        }
        let local_count = self.parameters.len() + self.extra_locals;
        Ok(Arc::new(InstructionSet {
            label: self.label,
            instructions: self.instructions,
            parameters: self.parameters,
            local_count,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_jump_is_patched() {
        let mut builder = InstructionSetBuilder::program("main");
        let done = builder.jump_label();
        let set = builder
            .emit(Action::PutObject, [Operand::Boolean(true)], 1)
            .emit_jump(Action::BranchIf, done, 1)
            .emit(Action::PutObject, [Operand::Integer(0)], 2)
            .bind(done)
            .emit(Action::Leave, [], 3)
            .finish()
            .unwrap();

        assert_eq!(set.instructions[1].int_param(0), Some(3));
    }

    #[test]
    fn test_unbound_label_is_an_error() {
        let mut builder = InstructionSetBuilder::program("main");
        let nowhere = builder.jump_label();
        let result = builder.emit_jump(Action::Jump, nowhere, 1).finish();
        assert_eq!(result.unwrap_err(), BuilderError::UnboundLabel(0));
    }

    #[test]
    fn test_parameters_count_into_locals() {
        let set = InstructionSetBuilder::method("add")
            .parameters(&["a", "b"])
            .locals(1)
            .emit(Action::Leave, [], 1)
            .finish()
            .unwrap();
        assert_eq!(set.arg_count(), 2);
        assert_eq!(set.local_count, 3);
    }
}
