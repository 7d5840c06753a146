//! Methods shared by every error class.

use crate::builtins::{check_arity, unavailable_new};
use crate::class::{BuiltinMethod, ClassRef};
use crate::object::block::BlockObject;
use crate::object::ObjectRef;
use crate::thread::Thread;
use lapis_core::ErrorKind;

pub(crate) fn install(class: &ClassRef) {
    class.set_builtin_methods(CLASS_METHODS, true);
    class.set_builtin_methods(INSTANCE_METHODS, false);
}

const CLASS_METHODS: &[BuiltinMethod] = &[BuiltinMethod {
    name: "new",
    func: unavailable_new,
}];

const INSTANCE_METHODS: &[BuiltinMethod] = &[
    BuiltinMethod { name: "message", func: message },
    BuiltinMethod { name: "line", func: line },
];

fn message(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    match receiver.as_error() {
        Some(payload) => t.string(payload.message.clone()),
        None => t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "error method dispatched on a non-error receiver",
        ),
    }
}

fn line(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    match receiver.as_error() {
        Some(payload) => t.integer(payload.source_line as i64),
        None => t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "error method dispatched on a non-error receiver",
        ),
    }
}
