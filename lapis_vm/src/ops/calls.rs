//! Method dispatch and block invocation.

use crate::class::MethodEntry;
use crate::error::{VmError, VmResult};
use crate::frame::CallFrame;
use crate::interpreter::{lookup_method, ControlFlow};
use crate::object::block::BlockObject;
use crate::object::ObjectRef;
use crate::ops::malformed;
use crate::thread::Thread;
use lapis_bytecode::Instruction;
use lapis_core::ErrorKind;
use smallvec::SmallVec;

/// Pop `count` values pushed left-to-right, restoring their order.
fn pop_args(t: &mut Thread, count: usize) -> VmResult<SmallVec<[ObjectRef; 4]>> {
    let mut args: SmallVec<[ObjectRef; 4]> = SmallVec::with_capacity(count);
    for _ in 0..count {
        args.push(t.stack.pop()?);
    }
    args.reverse();
    Ok(args)
}

/// Send name, argc, [block set]: dispatch a named method.
///
/// The receiver sits below the arguments. A block-literal operand closes
/// over the executing frame's environment and `self` at this point, which
/// is what keeps captured locals alive after this frame returns.
pub(crate) fn send(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let name = inst.str_param(0).ok_or_else(|| malformed(inst))?.clone();
    let argc = inst.int_param(1).ok_or_else(|| malformed(inst))? as usize;

    let block = match inst.set_param(2) {
        Some(set) => {
            let frame = t.frames.top().ok_or(VmError::FrameUnderflow)?;
            Some(BlockObject::new(
                set.clone(),
                frame.env.clone(),
                frame.self_obj.clone(),
            ))
        }
        None => None,
    };

    let args = pop_args(t, argc)?;
    let receiver = t.stack.pop()?;

    match lookup_method(&receiver, &name) {
        None => Ok(ControlFlow::Raise(t.no_method_error(
            inst.source_line,
            &name,
            &receiver,
        ))),
        Some(MethodEntry::Builtin(method)) => {
            let result = (method.func)(&receiver, inst.source_line, t, &args, block.as_ref());
            if result.is_error() {
                return Ok(ControlFlow::Raise(result));
            }
            t.stack.push(result)?;
            Ok(ControlFlow::Continue)
        }
        Some(MethodEntry::Bytecode(iset)) => {
            if args.len() != iset.arg_count() {
                return Ok(ControlFlow::Raise(t.arity_error(
                    inst.source_line,
                    iset.arg_count(),
                    args.len(),
                )));
            }
            let frame = CallFrame::method(iset, receiver, &args, block);
            t.frames.push(frame)?;
            Ok(ControlFlow::Continue)
        }
    }
}

/// InvokeBlock argc: yield to the block given to the nearest enclosing
/// method frame.
pub(crate) fn invoke_block(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let argc = inst.int_param(0).ok_or_else(|| malformed(inst))? as usize;
    let args = pop_args(t, argc)?;

    let block = t
        .frames
        .nearest_method_frame()
        .and_then(|frame| frame.block.clone());
    let Some(block) = block else {
        return Ok(ControlFlow::Raise(t.init_error_object(
            ErrorKind::InternalError,
            inst.source_line,
            "can't yield without a block",
        )));
    };

    let frame = CallFrame::block(&block, &args);
    t.frames.push(frame)?;
    Ok(ControlFlow::Continue)
}
