//! Instance methods of the `Class` class; receivers are class objects.

use crate::builtins::check_arity;
use crate::class::{BuiltinMethod, ClassRef};
use crate::object::block::BlockObject;
use crate::object::ObjectRef;
use crate::thread::Thread;
use lapis_core::ErrorKind;

pub(crate) fn install(class: &ClassRef) {
    class.set_builtin_methods(INSTANCE_METHODS, false);
}

const INSTANCE_METHODS: &[BuiltinMethod] = &[
    BuiltinMethod { name: "name", func: name },
    BuiltinMethod { name: "superclass", func: superclass },
];

fn name(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    match receiver.as_class() {
        Some(class) => t.string(class.name().to_string()),
        None => t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Class method dispatched on a non-class receiver",
        ),
    }
}

fn superclass(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    match receiver.as_class() {
        Some(class) => match class.superclass() {
            Some(superclass) => t.class_object(&superclass),
            None => t.null(),
        },
        None => t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Class method dispatched on a non-class receiver",
        ),
    }
}
