//! The Hash class: string-keyed maps, value-model minimum.

use crate::builtins::{check_arity, unavailable_new};
use crate::class::{BuiltinMethod, ClassRef};
use crate::object::block::BlockObject;
use crate::object::{ObjectKind, ObjectRef};
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
    BuiltinMethod { name: "[]", func: at },
    BuiltinMethod { name: "[]=", func: at_put },
    BuiltinMethod { name: "length", func: length },
];

fn at(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 1) {
        return error;
    }
    let Some(key) = args[0].as_str() else {
        return t.wrong_type_error(source_line, "String", args[0].class_name());
    };
    let ObjectKind::Hash(pairs) = receiver.kind() else {
        return t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Hash method dispatched on a non-Hash receiver",
        );
    };
    pairs.read().get(key).cloned().unwrap_or_else(|| t.null())
}

fn at_put(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 2) {
        return error;
    }
    let Some(key) = args[0].as_str() else {
        return t.wrong_type_error(source_line, "String", args[0].class_name());
    };
    let ObjectKind::Hash(pairs) = receiver.kind() else {
        return t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Hash method dispatched on a non-Hash receiver",
        );
    };
    pairs.write().insert(key.to_string(), args[1].clone());
    args[1].clone()
}

fn length(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    let ObjectKind::Hash(pairs) = receiver.kind() else {
        return t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Hash method dispatched on a non-Hash receiver",
        );
    };
    let length = pairs.read().len() as i64;
    t.integer(length)
}
