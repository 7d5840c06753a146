//! The fetch/dispatch loop.
//!
//! Per step the interpreter fetches the instruction at the executing
//! frame's program counter, dispatches on its action, applies the
//! resulting [`ControlFlow`], and advances. Method calls and block
//! invocations push frames into the same loop; builtins run to completion
//! inside one step.
//!
//! Two error channels exist. Language-level faults travel as error
//! objects through [`ControlFlow::Raise`] (or the thread's pending-error
//! cell) and unwind frames; machine faults are `VmError` and abort the
//! thread.

use crate::class::MethodEntry;
use crate::error::{VmError, VmResult};
use crate::frame::CallFrame;
use crate::object::block::BlockObject;
use crate::object::ObjectRef;
use crate::ops;
use crate::thread::Thread;
use lapis_bytecode::InstructionSet;
use lapis_core::ErrorKind;
use std::sync::Arc;

/// What a dispatched instruction asks the loop to do next.
pub enum ControlFlow {
    /// Proceed to the next instruction.
    Continue,
    /// Move the executing frame's program counter to an absolute index.
    Jump(usize),
    /// Pop the executing frame; the return value is on the operand stack.
    Return,
    /// Unwind with a language-level error object.
    Raise(ObjectRef),
}

/// How a run of frames ended, before mapping to the caller's preference.
enum Unwind {
    Fatal(VmError),
    Raised(ObjectRef),
}

impl From<VmError> for Unwind {
    fn from(error: VmError) -> Unwind {
        Unwind::Fatal(error)
    }
}

/// Execute a root instruction set on `t` until its terminal `leave` pops
/// the last frame, and return the produced value.
pub(crate) fn run_root(t: &mut Thread, iset: Arc<InstructionSet>) -> VmResult<ObjectRef> {
    let frame = CallFrame::program(iset, t.vm().main_object());
    match run_frame(t, frame)? {
        Ok(value) => Ok(value),
        Err(error) => Err(Thread::uncaught(&error)),
    }
}

/// Push `frame` and run until it returns.
///
/// `Ok(Ok(value))` is a normal return, `Ok(Err(error))` a raised error
/// object (frames already unwound), `Err` a fatal machine fault.
pub(crate) fn run_frame(
    t: &mut Thread,
    frame: CallFrame,
) -> VmResult<Result<ObjectRef, ObjectRef>> {
    let base = t.frames.depth();
    t.frames.push(frame)?;
    match run_until(t, base) {
        Ok(()) => Ok(Ok(t.stack.pop()?)),
        Err(Unwind::Fatal(fault)) => Err(fault),
        Err(Unwind::Raised(error)) => Ok(Err(error)),
    }
}

/// Invoke `block` with `args` to completion. Raised errors come back as
/// the returned error object, ready to propagate out of a builtin.
pub(crate) fn invoke_block(
    t: &mut Thread,
    block: &BlockObject,
    args: &[ObjectRef],
) -> VmResult<ObjectRef> {
    let frame = CallFrame::block(block, args);
    Ok(run_frame(t, frame)?.unwrap_or_else(|error| error))
}

/// Method lookup: the receiver's class, then its superclass chain; for a
/// class receiver the class-method tables take precedence. First hit wins.
pub(crate) fn lookup_method(receiver: &ObjectRef, name: &str) -> Option<MethodEntry> {
    match receiver.as_class() {
        Some(class) => class
            .lookup_class_method(name)
            .or_else(|| receiver.class_ref().lookup_instance_method(name)),
        None => receiver.class_ref().lookup_instance_method(name),
    }
}

/// Dispatch `name` on `receiver` outside the instruction loop (used by
/// `Object.new`, `Block#call`, and embedders). Faults come back as error
/// objects.
pub(crate) fn call_method(
    t: &mut Thread,
    receiver: &ObjectRef,
    name: &str,
    args: &[ObjectRef],
    block: Option<&BlockObject>,
) -> VmResult<ObjectRef> {
    let line = t.source_line();
    match lookup_method(receiver, name) {
        None => Ok(t.no_method_error(line, name, receiver)),
        Some(MethodEntry::Builtin(method)) => {
            let result = (method.func)(receiver, line, t, args, block);
            match t.take_fatal() {
                Some(fault) => Err(fault),
                None => Ok(result),
            }
        }
        Some(MethodEntry::Bytecode(iset)) => {
            if args.len() != iset.arg_count() {
                return Ok(t.arity_error(line, iset.arg_count(), args.len()));
            }
            let frame = CallFrame::method(iset, receiver.clone(), args, block.cloned());
            Ok(run_frame(t, frame)?.unwrap_or_else(|error| error))
        }
    }
}

/// The loop proper: run until the frame stack returns to `base_depth`.
fn run_until(t: &mut Thread, base_depth: usize) -> Result<(), Unwind> {
    while t.frames.depth() > base_depth {
        if t.is_cancelled() {
            return Err(Unwind::Fatal(VmError::Cancelled));
        }

        let Some(frame) = t.frames.top_mut() else {
            return Err(Unwind::Fatal(VmError::FrameUnderflow));
        };

        if frame.pc >= frame.iset.len() {
            // A set that runs off its end returns nil implicitly.
            t.frames.pop()?;
            let null = t.null();
            t.stack.push(null)?;
            continue;
        }

        let instruction = frame.iset.instructions[frame.pc].clone();
        frame.pc += 1;
        frame.source_line = instruction.source_line;
        t.set_source_line(instruction.source_line);

        if t.vm().config().trace_instructions {
            log::trace!(
                "dispatch {} @ line {}",
                instruction.inspect(),
                instruction.source_line
            );
            log::trace!("{}", t.stack.inspect());
        }

        let flow = ops::dispatch(t, &instruction).map_err(Unwind::Fatal)?;

        if let Some(fault) = t.take_fatal() {
            return Err(Unwind::Fatal(fault));
        }
        if let Some(error) = t.take_pending_error() {
            unwind_to(t, base_depth)?;
            return Err(Unwind::Raised(error));
        }

        match flow {
            ControlFlow::Continue => {}
            ControlFlow::Jump(target) => {
                if let Some(frame) = t.frames.top_mut() {
                    frame.pc = target;
                }
            }
            ControlFlow::Return => {
                t.frames.pop()?;
            }
            ControlFlow::Raise(error) => {
                unwind_to(t, base_depth)?;
                return Err(Unwind::Raised(error));
            }
        }
    }
    Ok(())
}

/// Release frames down to `base_depth`; locals captured by surviving
/// blocks stay alive through the blocks' environment handles.
fn unwind_to(t: &mut Thread, base_depth: usize) -> Result<(), Unwind> {
    while t.frames.depth() > base_depth {
        t.frames.pop()?;
    }
    Ok(())
}

/// Shared helper for builtins that need "yield or fail": invoke the given
/// block or produce the no-block error.
pub(crate) fn yield_or_error(
    t: &mut Thread,
    source_line: usize,
    block: Option<&BlockObject>,
    args: &[ObjectRef],
) -> VmResult<ObjectRef> {
    match block {
        Some(block) => invoke_block(t, block, args),
        None => Ok(t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "can't yield without a block",
        )),
    }
}
