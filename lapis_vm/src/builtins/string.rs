//! The String class: the value-model minimum (the full string library is
//! a separate concern).

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
    BuiltinMethod { name: "+", func: concat },
    BuiltinMethod { name: "length", func: length },
    BuiltinMethod { name: "to_s", func: to_s },
];

fn receiver_value<'a>(
    receiver: &'a ObjectRef,
    source_line: usize,
    t: &Thread,
) -> Result<&'a str, ObjectRef> {
    match receiver.as_str() {
        Some(value) => Ok(value),
        None => Err(t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "String method dispatched on a non-String receiver",
        )),
    }
}

fn concat(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 1) {
        return error;
    }
    let left = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    let Some(right) = args[0].as_str() else {
        return t.wrong_type_error(source_line, "String", args[0].class_name());
    };
    t.string(format!("{left}{right}"))
}

/// Length in characters, not bytes.
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
    match receiver_value(receiver, source_line, t) {
        Ok(value) => t.integer(value.chars().count() as i64),
        Err(error) => error,
    }
}

fn to_s(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    receiver.clone()
}
