//! Instructions: an action plus an operand sequence.

use crate::instruction_set::InstructionSet;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Action
// =============================================================================

/// The closed catalogue of instruction actions.
///
/// The set of actions is the contract between the compiler and the VM;
/// handlers live in the VM. Stack effects noted per action refer to the
/// operand stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Push a literal operand. `[] -> [value]`
    PutObject,
    /// Push the current frame's `self`. `[] -> [self]`
    PutSelf,
    /// Push the canonical nil. `[] -> [nil]`
    PutNull,
    /// Discard the top of stack. `[a] -> []`
    Pop,
    /// Duplicate the top of stack. `[a] -> [a, a]`
    Dup,
    /// Push a local slot; operands are depth and index. `[] -> [value]`
    GetLocal,
    /// Store the top of stack into a local slot, leaving it pushed.
    SetLocal,
    /// Push a named top-level constant or class. `[] -> [value]`
    GetConstant,
    /// Bind the top of stack to a named constant on the current class.
    SetConstant,
    /// Push an instance variable of `self`. `[] -> [value]`
    GetInstanceVariable,
    /// Store the top of stack into an instance variable of `self`.
    SetInstanceVariable,
    /// Collect the top N stack values into an array. `[a..n] -> [array]`
    NewArray,
    /// Collect the top 2N stack values into key/value pairs. `[k,v,..] -> [hash]`
    NewHash,
    /// Build a range from the two topmost integers. `[lo, hi] -> [range]`
    NewRange,
    /// Invoke a named method: receiver below N arguments; an optional
    /// instruction-set operand carries a trailing block literal.
    /// `[recv, a1..aN] -> [result]`
    Send,
    /// Invoke the block passed to the current method. `[a1..aN] -> [result]`
    InvokeBlock,
    /// Unconditional jump to an absolute instruction index.
    Jump,
    /// Jump when the popped value is truthy. `[cond] -> []`
    BranchIf,
    /// Jump when the popped value is falsy. `[cond] -> []`
    BranchUnless,
    /// Return from the current frame; the return value is on top of stack.
    Leave,
    /// Define an instance method on the class of `self`.
    DefMethod,
    /// Define a class method on `self` (which must be a class).
    DefClassMethod,
    /// Create or reopen a named top-level class and execute its body.
    DefClass,
}

impl Action {
    /// Lowercase action name, as shown by instruction inspection.
    pub const fn name(self) -> &'static str {
        match self {
            Action::PutObject => "put_object",
            Action::PutSelf => "put_self",
            Action::PutNull => "put_null",
            Action::Pop => "pop",
            Action::Dup => "dup",
            Action::GetLocal => "get_local",
            Action::SetLocal => "set_local",
            Action::GetConstant => "get_constant",
            Action::SetConstant => "set_constant",
            Action::GetInstanceVariable => "get_instance_variable",
            Action::SetInstanceVariable => "set_instance_variable",
            Action::NewArray => "new_array",
            Action::NewHash => "new_hash",
            Action::NewRange => "new_range",
            Action::Send => "send",
            Action::InvokeBlock => "invoke_block",
            Action::Jump => "jump",
            Action::BranchIf => "branch_if",
            Action::BranchUnless => "branch_unless",
            Action::Leave => "leave",
            Action::DefMethod => "def_method",
            Action::DefClassMethod => "def_class_method",
            Action::DefClass => "def_class",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Operand
// =============================================================================

/// One instruction parameter.
///
/// Operands are data to the instruction container; only the action's
/// handler gives them meaning.
#[derive(Debug, Clone)]
pub enum Operand {
    Integer(i64),
    Float(f64),
    Str(Arc<str>),
    Boolean(bool),
    Null,
    /// A nested compilation unit (method or block body).
    Set(Arc<InstructionSet>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Integer(value) => write!(f, "{value}"),
            Operand::Float(value) => write!(f, "{value}"),
            Operand::Str(value) => write!(f, "{value}"),
            Operand::Boolean(value) => write!(f, "{value}"),
            Operand::Null => f.write_str("nil"),
            Operand::Set(set) => write!(f, "<{}>", set.label.name),
        }
    }
}

// =============================================================================
// Instruction
// =============================================================================

/// One executable step: an action, its operands, and the source line the
/// compiler attributed it to.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub action: Action,
    pub params: SmallVec<[Operand; 2]>,
    pub source_line: usize,
}

impl Instruction {
    pub fn new(
        action: Action,
        params: impl IntoIterator<Item = Operand>,
        source_line: usize,
    ) -> Self {
        Self {
            action,
            params: params.into_iter().collect(),
            source_line,
        }
    }

    /// Operand at `index`, if present.
    #[inline]
    pub fn param(&self, index: usize) -> Option<&Operand> {
        self.params.get(index)
    }

    /// Integer operand at `index`.
    #[inline]
    pub fn int_param(&self, index: usize) -> Option<i64> {
        match self.param(index) {
            Some(Operand::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// String operand at `index`.
    #[inline]
    pub fn str_param(&self, index: usize) -> Option<&Arc<str>> {
        match self.param(index) {
            Some(Operand::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Nested instruction-set operand at `index`.
    #[inline]
    pub fn set_param(&self, index: usize) -> Option<&Arc<InstructionSet>> {
        match self.param(index) {
            Some(Operand::Set(set)) => Some(set),
            _ => None,
        }
    }

    /// Debugging projection: `"{action}: {p1}, {p2}"`.
    pub fn inspect(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        format!("{}: {}", self.action, params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_format() {
        let inst = Instruction::new(
            Action::GetLocal,
            [Operand::Integer(0), Operand::Integer(2)],
            4,
        );
        assert_eq!(inst.inspect(), "get_local: 0, 2");
    }

    #[test]
    fn test_inspect_without_params() {
        let inst = Instruction::new(Action::Leave, [], 9);
        assert_eq!(inst.inspect(), "leave: ");
    }

    #[test]
    fn test_typed_param_accessors() {
        let inst = Instruction::new(
            Action::Send,
            [Operand::Str("each".into()), Operand::Integer(0)],
            1,
        );
        assert_eq!(inst.str_param(0).map(|s| &**s), Some("each"));
        assert_eq!(inst.int_param(1), Some(0));
        assert!(inst.int_param(0).is_none());
        assert!(inst.set_param(1).is_none());
    }
}
