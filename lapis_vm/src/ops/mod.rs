//! Action handlers, grouped by category.
//!
//! Each handler reads its operands, touches the operand stack and frames,
//! and reports a [`ControlFlow`]. Malformed operands are a fatal
//! [`VmError::MalformedInstruction`]: the compiler contract was broken,
//! not the program.

pub(crate) mod calls;
pub(crate) mod containers;
pub(crate) mod control;
pub(crate) mod definitions;
pub(crate) mod load_store;

use crate::error::{VmError, VmResult};
use crate::interpreter::ControlFlow;
use crate::thread::Thread;
use lapis_bytecode::{Action, Instruction};

/// Dispatch one instruction to its handler.
pub(crate) fn dispatch(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    match inst.action {
        Action::PutObject => load_store::put_object(t, inst),
        Action::PutSelf => load_store::put_self(t, inst),
        Action::PutNull => load_store::put_null(t, inst),
        Action::Pop => load_store::pop(t, inst),
        Action::Dup => load_store::dup(t, inst),
        Action::GetLocal => load_store::get_local(t, inst),
        Action::SetLocal => load_store::set_local(t, inst),
        Action::GetConstant => load_store::get_constant(t, inst),
        Action::SetConstant => load_store::set_constant(t, inst),
        Action::GetInstanceVariable => load_store::get_instance_variable(t, inst),
        Action::SetInstanceVariable => load_store::set_instance_variable(t, inst),
        Action::NewArray => containers::new_array(t, inst),
        Action::NewHash => containers::new_hash(t, inst),
        Action::NewRange => containers::new_range(t, inst),
        Action::Send => calls::send(t, inst),
        Action::InvokeBlock => calls::invoke_block(t, inst),
        Action::Jump => control::jump(t, inst),
        Action::BranchIf => control::branch_if(t, inst),
        Action::BranchUnless => control::branch_unless(t, inst),
        Action::Leave => control::leave(t, inst),
        Action::DefMethod => definitions::def_method(t, inst),
        Action::DefClassMethod => definitions::def_class_method(t, inst),
        Action::DefClass => definitions::def_class(t, inst),
    }
}

/// Fatal fault for operands that do not match the action's contract.
pub(crate) fn malformed(inst: &Instruction) -> VmError {
    VmError::MalformedInstruction {
        action: inst.action.name(),
    }
}
