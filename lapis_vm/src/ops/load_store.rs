//! Literals, locals, constants, and instance variables.

use crate::error::{VmError, VmResult};
use crate::interpreter::ControlFlow;
use crate::ops::malformed;
use crate::thread::Thread;
use lapis_bytecode::{Instruction, Operand};
use lapis_core::{errors, ErrorKind};

/// PutObject: push a literal operand.
pub(crate) fn put_object(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let value = match inst.param(0) {
        Some(Operand::Integer(value)) => t.integer(*value),
        Some(Operand::Float(value)) => t.float(*value),
        Some(Operand::Str(value)) => t.string(value.to_string()),
        Some(Operand::Boolean(value)) => t.boolean(*value),
        Some(Operand::Null) => t.null(),
        _ => return Err(malformed(inst)),
    };
    t.stack.push(value)?;
    Ok(ControlFlow::Continue)
}

/// PutSelf: push the executing frame's `self`.
pub(crate) fn put_self(t: &mut Thread, _inst: &Instruction) -> VmResult<ControlFlow> {
    let receiver = t
        .frames
        .top()
        .ok_or(VmError::FrameUnderflow)?
        .self_obj
        .clone();
    t.stack.push(receiver)?;
    Ok(ControlFlow::Continue)
}

/// PutNull: push the canonical nil.
pub(crate) fn put_null(t: &mut Thread, _inst: &Instruction) -> VmResult<ControlFlow> {
    let null = t.null();
    t.stack.push(null)?;
    Ok(ControlFlow::Continue)
}

/// Pop: discard the top of stack.
pub(crate) fn pop(t: &mut Thread, _inst: &Instruction) -> VmResult<ControlFlow> {
    t.stack.pop()?;
    Ok(ControlFlow::Continue)
}

/// Dup: duplicate the top of stack.
pub(crate) fn dup(t: &mut Thread, _inst: &Instruction) -> VmResult<ControlFlow> {
    let top = t.stack.top()?;
    t.stack.push(top)?;
    Ok(ControlFlow::Continue)
}

/// GetLocal depth, index: push a local; unset slots read as nil.
pub(crate) fn get_local(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let depth = inst.int_param(0).ok_or_else(|| malformed(inst))? as usize;
    let index = inst.int_param(1).ok_or_else(|| malformed(inst))? as usize;
    let frame = t.frames.top().ok_or(VmError::FrameUnderflow)?;
    let value = frame.env.get(depth, index).unwrap_or_else(|| t.null());
    t.stack.push(value)?;
    Ok(ControlFlow::Continue)
}

/// SetLocal depth, index: store the top of stack, leaving it pushed
/// (assignment evaluates to its value).
pub(crate) fn set_local(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let depth = inst.int_param(0).ok_or_else(|| malformed(inst))? as usize;
    let index = inst.int_param(1).ok_or_else(|| malformed(inst))? as usize;
    let value = t.stack.top()?;
    let frame = t.frames.top().ok_or(VmError::FrameUnderflow)?;
    if !frame.env.set(depth, index, value) {
        return Err(malformed(inst));
    }
    Ok(ControlFlow::Continue)
}

/// GetConstant name: search the lexical class chain; top-level classes
/// are constants on Object.
pub(crate) fn get_constant(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let name = inst.str_param(0).ok_or_else(|| malformed(inst))?.clone();
    let frame = t.frames.top().ok_or(VmError::FrameUnderflow)?;
    let lexical_class = match frame.self_obj.as_class() {
        Some(class) => class.clone(),
        None => frame.self_obj.class_ref().clone(),
    };
    match lexical_class.lookup_constant(&name) {
        Some(value) => {
            t.stack.push(value)?;
            Ok(ControlFlow::Continue)
        }
        None => Ok(ControlFlow::Raise(t.init_error_object(
            ErrorKind::NameError,
            inst.source_line,
            errors::uninitialized_constant(&name),
        ))),
    }
}

/// SetConstant name: bind the top of stack on the lexical class, leaving
/// the value pushed.
pub(crate) fn set_constant(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let name = inst.str_param(0).ok_or_else(|| malformed(inst))?.clone();
    let value = t.stack.top()?;
    let frame = t.frames.top().ok_or(VmError::FrameUnderflow)?;
    let target = match frame.self_obj.as_class() {
        Some(class) => class.clone(),
        None => frame.self_obj.class_ref().clone(),
    };
    target.set_constant(t.vm().intern(&name), value);
    Ok(ControlFlow::Continue)
}

/// GetInstanceVariable name: unset variables read as nil.
pub(crate) fn get_instance_variable(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let name = inst.str_param(0).ok_or_else(|| malformed(inst))?;
    let frame = t.frames.top().ok_or(VmError::FrameUnderflow)?;
    let value = frame
        .self_obj
        .get_ivar(name)
        .unwrap_or_else(|| t.null());
    t.stack.push(value)?;
    Ok(ControlFlow::Continue)
}

/// SetInstanceVariable name: store the top of stack, leaving it pushed.
pub(crate) fn set_instance_variable(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let name = inst.str_param(0).ok_or_else(|| malformed(inst))?.clone();
    let value = t.stack.top()?;
    let interned = t.vm().intern(&name);
    let frame = t.frames.top().ok_or(VmError::FrameUnderflow)?;
    frame.self_obj.set_ivar(interned, value);
    Ok(ControlFlow::Continue)
}
