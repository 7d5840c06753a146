//! Jumps, branches, and frame returns.

use crate::error::VmResult;
use crate::interpreter::ControlFlow;
use crate::ops::malformed;
use crate::thread::Thread;
use lapis_bytecode::Instruction;

/// Jump target: unconditional jump to an absolute instruction index.
pub(crate) fn jump(_t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let target = inst.int_param(0).ok_or_else(|| malformed(inst))? as usize;
    Ok(ControlFlow::Jump(target))
}

/// BranchIf target: jump when the popped condition is truthy.
pub(crate) fn branch_if(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let target = inst.int_param(0).ok_or_else(|| malformed(inst))? as usize;
    let condition = t.stack.pop()?;
    if condition.is_truthy() {
        Ok(ControlFlow::Jump(target))
    } else {
        Ok(ControlFlow::Continue)
    }
}

/// BranchUnless target: jump when the popped condition is falsy.
pub(crate) fn branch_unless(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let target = inst.int_param(0).ok_or_else(|| malformed(inst))? as usize;
    let condition = t.stack.pop()?;
    if condition.is_truthy() {
        Ok(ControlFlow::Continue)
    } else {
        Ok(ControlFlow::Jump(target))
    }
}

/// Leave: return from the executing frame with the top of stack as the
/// return value. Also ends a block body.
pub(crate) fn leave(_t: &mut Thread, _inst: &Instruction) -> VmResult<ControlFlow> {
    Ok(ControlFlow::Return)
}
