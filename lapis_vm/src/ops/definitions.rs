//! Method and class definition.

use crate::class::MethodEntry;
use crate::error::{VmError, VmResult};
use crate::frame::CallFrame;
use crate::interpreter::{run_frame, ControlFlow};
use crate::ops::malformed;
use crate::thread::Thread;
use lapis_bytecode::{Instruction, Operand};
use lapis_core::{errors, ErrorKind};

/// DefMethod name, body: install an instance method on the class of
/// `self` (or on `self` itself inside a class body). Publication happens
/// under the method-table lock before this instruction completes.
pub(crate) fn def_method(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let name = inst.str_param(0).ok_or_else(|| malformed(inst))?.clone();
    let body = inst.set_param(1).ok_or_else(|| malformed(inst))?.clone();

    let interned = t.vm().intern(&name);
    let frame = t.frames.top().ok_or(VmError::FrameUnderflow)?;
    let target = match frame.self_obj.as_class() {
        Some(class) => class.clone(),
        None => frame.self_obj.class_ref().clone(),
    };
    target.define_method(interned, MethodEntry::Bytecode(body), false);

    let null = t.null();
    t.stack.push(null)?;
    Ok(ControlFlow::Continue)
}

/// DefClassMethod name, body: install a class method; `self` must be a
/// class.
pub(crate) fn def_class_method(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let name = inst.str_param(0).ok_or_else(|| malformed(inst))?.clone();
    let body = inst.set_param(1).ok_or_else(|| malformed(inst))?.clone();

    let frame = t.frames.top().ok_or(VmError::FrameUnderflow)?;
    let Some(target) = frame.self_obj.as_class().cloned() else {
        return Ok(ControlFlow::Raise(t.init_error_object(
            ErrorKind::InternalError,
            inst.source_line,
            "class method defined outside a class",
        )));
    };
    let interned = t.vm().intern(&name);
    target.define_method(interned, MethodEntry::Bytecode(body), true);

    let null = t.null();
    t.stack.push(null)?;
    Ok(ControlFlow::Continue)
}

/// DefClass name, body, [superclass]: create or reopen a top-level class,
/// execute its body with the class as `self`, and push the class.
pub(crate) fn def_class(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let name = inst.str_param(0).ok_or_else(|| malformed(inst))?.clone();
    let body = inst.set_param(1).ok_or_else(|| malformed(inst))?.clone();

    let class = t.vm().initialize_class(&name);

    if let Some(Operand::Str(super_name)) = inst.param(2) {
        match t.vm().top_level_class(super_name) {
            Some(superclass) => class.set_superclass(superclass),
            None => {
                return Ok(ControlFlow::Raise(t.init_error_object(
                    ErrorKind::NameError,
                    inst.source_line,
                    errors::uninitialized_constant(super_name),
                )))
            }
        }
    }

    let wrapper = t.class_object(&class);
    let body_frame = CallFrame::program(body, wrapper.clone());
    match run_frame(t, body_frame)? {
        Ok(_body_value) => {
            t.stack.push(wrapper)?;
            Ok(ControlFlow::Continue)
        }
        Err(error) => Ok(ControlFlow::Raise(error)),
    }
}
