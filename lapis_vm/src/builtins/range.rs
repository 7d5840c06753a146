//! The Range class: inclusive integer ranges, value-model minimum.

use crate::builtins::{check_arity, unavailable_new};
use crate::class::{BuiltinMethod, ClassRef};
use crate::interpreter::yield_or_error;
use crate::object::block::BlockObject;
use crate::object::{ObjectRef, RangeObject};
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
    BuiltinMethod { name: "to_a", func: to_a },
    BuiltinMethod { name: "each", func: each },
    BuiltinMethod { name: "length", func: length },
];

fn receiver_range(
    receiver: &ObjectRef,
    source_line: usize,
    t: &Thread,
) -> Result<RangeObject, ObjectRef> {
    match receiver.as_range() {
        Some(range) => Ok(range),
        None => Err(t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Range method dispatched on a non-Range receiver",
        )),
    }
}

fn to_a(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    match receiver_range(receiver, source_line, t) {
        Ok(range) => {
            let elements = (range.start..=range.end).map(|i| t.integer(i)).collect();
            t.array(elements)
        }
        Err(error) => error,
    }
}

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
    let range = match receiver_range(receiver, source_line, t) {
        Ok(range) => range,
        Err(error) => return error,
    };
    for value in range.start..=range.end {
        let argument = t.integer(value);
        let result = match yield_or_error(t, source_line, block, &[argument]) {
            Ok(result) => result,
            Err(fault) => return t.fatal_error(fault),
        };
        if result.is_error() {
            return result;
        }
    }
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
    match receiver_range(receiver, source_line, t) {
        Ok(range) => t.integer((range.end - range.start + 1).max(0)),
        Err(error) => error,
    }
}
