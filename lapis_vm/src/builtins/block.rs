//! The Block class: first-class closures.

use crate::class::{BuiltinMethod, ClassRef};
use crate::object::block::BlockObject;
use crate::object::ObjectRef;
use crate::thread::Thread;
use lapis_core::ErrorKind;

pub(crate) fn install(class: &ClassRef) {
    class.set_builtin_methods(CLASS_METHODS, true);
    class.set_builtin_methods(INSTANCE_METHODS, false);
}

const CLASS_METHODS: &[BuiltinMethod] = &[BuiltinMethod { name: "new", func: new }];

/// Reify the block literal at the call site into a first-class Block
/// object: `counter = Block.new do ... end`.
fn new(
    _receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    block: Option<&BlockObject>,
) -> ObjectRef {
    if !args.is_empty() {
        return t.arity_error(source_line, 0, args.len());
    }
    match block {
        Some(block) => t.block_object(block.clone()),
        None => t.init_error_object(
            ErrorKind::ArgumentError,
            source_line,
            "Expect a block",
        ),
    }
}

const INSTANCE_METHODS: &[BuiltinMethod] = &[BuiltinMethod { name: "call", func: call }];

/// Invoke the closure with the given positional arguments.
fn call(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    let Some(block) = receiver.as_block().cloned() else {
        return t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Block method dispatched on a non-Block receiver",
        );
    };
    match t.yield_block(&block, args) {
        Ok(result) => result,
        Err(fault) => t.fatal_error(fault),
    }
}
