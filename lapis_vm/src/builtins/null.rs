//! The Null class and its single `nil` object.

use crate::builtins::{check_arity, unavailable_new};
use crate::class::{BuiltinMethod, ClassRef};
use crate::object::block::BlockObject;
use crate::object::ObjectRef;
use crate::thread::Thread;

pub(crate) fn install(class: &ClassRef) {
    class.set_builtin_methods(CLASS_METHODS, true);
    class.set_builtin_methods(INSTANCE_METHODS, false);
}

const CLASS_METHODS: &[BuiltinMethod] = &[BuiltinMethod {
    name: "new",
    func: unavailable_new,
}];

const INSTANCE_METHODS: &[BuiltinMethod] = &[
    BuiltinMethod { name: "nil?", func: is_nil },
    BuiltinMethod { name: "!", func: not },
];

fn is_nil(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    let _ = receiver;
    t.boolean(true)
}

fn not(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    let _ = receiver;
    t.boolean(true)
}
