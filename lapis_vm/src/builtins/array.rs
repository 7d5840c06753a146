//! The Array class: the value-model minimum.

use crate::builtins::{check_arity, unavailable_new};
use crate::class::{BuiltinMethod, ClassRef};
use crate::interpreter::yield_or_error;
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
    BuiltinMethod { name: "push", func: push },
    BuiltinMethod { name: "length", func: length },
    BuiltinMethod { name: "each", func: each },
];

fn elements(receiver: &ObjectRef, source_line: usize, t: &Thread) -> Result<Vec<ObjectRef>, ObjectRef> {
    match receiver.kind() {
        ObjectKind::Array(elements) => Ok(elements.read().clone()),
        _ => Err(t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Array method dispatched on a non-Array receiver",
        )),
    }
}

/// Resolve a possibly negative index against `length`.
fn resolve_index(index: i64, length: usize) -> Option<usize> {
    if index < 0 {
        let back = index.unsigned_abs() as usize;
        length.checked_sub(back)
    } else {
        Some(index as usize)
    }
}

/// Out-of-range reads answer nil; negative indices count from the end.
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
    let Some(index) = args[0].as_integer() else {
        return t.wrong_type_error(source_line, "Integer", args[0].class_name());
    };
    let elements = match elements(receiver, source_line, t) {
        Ok(elements) => elements,
        Err(error) => return error,
    };
    resolve_index(index, elements.len())
        .and_then(|index| elements.get(index).cloned())
        .unwrap_or_else(|| t.null())
}

/// Writing past the end fills the gap with nil.
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
    let Some(index) = args[0].as_integer() else {
        return t.wrong_type_error(source_line, "Integer", args[0].class_name());
    };
    let value = args[1].clone();
    let ObjectKind::Array(elements) = receiver.kind() else {
        return t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Array method dispatched on a non-Array receiver",
        );
    };
    let mut elements = elements.write();
    let Some(index) = resolve_index(index, elements.len()) else {
        return t.init_error_object(
            ErrorKind::ArgumentError,
            source_line,
            format!("index {index} out of range"),
        );
    };
    if index >= elements.len() {
        elements.resize_with(index + 1, || t.null());
    }
    elements[index] = value.clone();
    value
}

fn push(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 1) {
        return error;
    }
    let ObjectKind::Array(elements) = receiver.kind() else {
        return t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Array method dispatched on a non-Array receiver",
        );
    };
    elements.write().push(args[0].clone());
    receiver.clone()
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
    match elements(receiver, source_line, t) {
        Ok(elements) => t.integer(elements.len() as i64),
        Err(error) => error,
    }
}

/// Yields each element in order; returns the receiver.
fn each(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    let elements = match elements(receiver, source_line, t) {
        Ok(elements) => elements,
        Err(error) => return error,
    };
    for element in elements {
        let result = match yield_or_error(t, source_line, block, &[element]) {
            Ok(result) => result,
            Err(fault) => return t.fatal_error(fault),
        };
        if result.is_error() {
            return result;
        }
    }
    receiver.clone()
}
