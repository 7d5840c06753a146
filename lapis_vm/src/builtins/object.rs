//! Methods every object inherits, plus the generic `new` class method.

use crate::builtins::check_arity;
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

const INSTANCE_METHODS: &[BuiltinMethod] = &[
    BuiltinMethod { name: "==", func: eq },
    BuiltinMethod { name: "!=", func: ne },
    BuiltinMethod { name: "!", func: not },
    BuiltinMethod { name: "to_s", func: to_s },
    BuiltinMethod { name: "inspect", func: inspect },
    BuiltinMethod { name: "to_json", func: to_json },
    BuiltinMethod { name: "nil?", func: is_nil },
    BuiltinMethod { name: "class", func: class_of },
];

/// Generic constructor for user-defined classes: allocate an instance and
/// run `initialize` when the class defines one. Value classes override
/// this with a deliberate NoMethodError.
fn new(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    block: Option<&BlockObject>,
) -> ObjectRef {
    let Some(class) = receiver.as_class().cloned() else {
        return t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "new dispatched on a non-class receiver",
        );
    };
    let instance = t.vm().init_instance(class.clone());
    if class.lookup_instance_method("initialize").is_some() {
        let result = match t.call_method(&instance, "initialize", args, block) {
            Ok(result) => result,
            Err(fault) => return t.fatal_error(fault),
        };
        if result.is_error() {
            return result;
        }
    } else if !args.is_empty() {
        return t.arity_error(source_line, 0, args.len());
    }
    instance
}

fn eq(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 1) {
        return error;
    }
    t.boolean(receiver.value_eq(&args[0]))
}

fn ne(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 1) {
        return error;
    }
    t.boolean(!receiver.value_eq(&args[0]))
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
    t.boolean(!receiver.is_truthy())
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
    t.string(receiver.to_string())
}

fn inspect(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    t.string(receiver.inspect())
}

fn to_json(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    let json = receiver.to_json(t);
    t.string(json)
}

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
    t.boolean(false)
}

fn class_of(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    t.class_object(receiver.class_ref())
}
