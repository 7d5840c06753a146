//! The Decimal class: exact rationals.
//!
//! Decimal arithmetic never drifts: `0.1 + 0.2` of Decimals is exactly
//! `0.3`. Integer operands join the exact tower directly; Float operands
//! convert through their shortest decimal rendering. The double-precision
//! projection happens only at the Numeric seam (`to_f`, mixed comparison
//! against Float).

use crate::builtins::{check_arity, unavailable_new};
use crate::class::{BuiltinMethod, ClassRef};
use crate::object::block::BlockObject;
use crate::object::ObjectRef;
use crate::thread::Thread;
use lapis_core::{errors, ErrorKind, Rational};
use std::cmp::Ordering;

pub(crate) fn install(class: &ClassRef) {
    class.set_builtin_methods(CLASS_METHODS, true);
    class.set_builtin_methods(INSTANCE_METHODS, false);
}

const CLASS_METHODS: &[BuiltinMethod] = &[BuiltinMethod {
    name: "new",
    func: unavailable_new,
}];

const INSTANCE_METHODS: &[BuiltinMethod] = &[
    BuiltinMethod { name: "+", func: add },
    BuiltinMethod { name: "-", func: sub },
    BuiltinMethod { name: "*", func: mul },
    BuiltinMethod { name: "/", func: div },
    BuiltinMethod { name: ">", func: gt },
    BuiltinMethod { name: ">=", func: ge },
    BuiltinMethod { name: "<", func: lt },
    BuiltinMethod { name: "<=", func: le },
    BuiltinMethod { name: "<=>", func: spaceship },
    BuiltinMethod { name: "==", func: eq },
    BuiltinMethod { name: "!=", func: ne },
    BuiltinMethod { name: "to_d", func: to_d },
    BuiltinMethod { name: "to_f", func: to_f },
    BuiltinMethod { name: "to_i", func: to_i },
    BuiltinMethod { name: "to_s", func: to_s },
    BuiltinMethod { name: "abs", func: abs },
    BuiltinMethod { name: "zero?", func: zero },
    BuiltinMethod { name: "positive?", func: positive },
    BuiltinMethod { name: "negative?", func: negative },
];

fn receiver_value(
    receiver: &ObjectRef,
    source_line: usize,
    t: &Thread,
) -> Result<Rational, ObjectRef> {
    match receiver.as_decimal() {
        Some(decimal) => Ok(decimal.value.clone()),
        None => Err(t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Decimal method dispatched on a non-Decimal receiver",
        )),
    }
}

/// Lift the right operand into the exact tower. Floats go through their
/// shortest decimal rendering; a non-finite Float cannot and reports the
/// decimal-parse fault.
fn coerce_exact(t: &Thread, source_line: usize, arg: &ObjectRef) -> Result<Rational, ObjectRef> {
    if let Some(decimal) = arg.as_decimal() {
        return Ok(decimal.value.clone());
    }
    if let Some(value) = arg.as_integer() {
        return Ok(Rational::from_integer(value));
    }
    if let Some(value) = arg.as_float() {
        let rendered = format!("{value}");
        return Rational::from_decimal_str(&rendered).ok_or_else(|| {
            t.init_error_object(
                ErrorKind::ArgumentError,
                source_line,
                errors::invalid_numeric_string(&rendered),
            )
        });
    }
    Err(t.wrong_type_error(source_line, "Numeric", arg.class_name()))
}

fn arithmetic(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    operation: fn(&Rational, &Rational) -> Option<Rational>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 1) {
        return error;
    }
    let left = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    let right = match coerce_exact(t, source_line, &args[0]) {
        Ok(value) => value,
        Err(error) => return error,
    };
    match operation(&left, &right) {
        Some(result) => t.decimal(result),
        None => t.zero_division_error(source_line),
    }
}

fn comparison(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    accepts: fn(Ordering) -> bool,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 1) {
        return error;
    }
    let left = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    match ordering(t, source_line, &left, &args[0]) {
        Ok(Some(ordering)) => t.boolean(accepts(ordering)),
        Ok(None) => t.boolean(false),
        Err(error) => error,
    }
}

/// Exact order against Decimal and Integer operands, double-precision
/// order against Float. `None` means incomparable (NaN).
fn ordering(
    t: &Thread,
    source_line: usize,
    left: &Rational,
    arg: &ObjectRef,
) -> Result<Option<Ordering>, ObjectRef> {
    if let Some(decimal) = arg.as_decimal() {
        return Ok(Some(left.cmp(&decimal.value)));
    }
    if let Some(value) = arg.as_integer() {
        return Ok(Some(left.cmp(&Rational::from_integer(value))));
    }
    if let Some(value) = arg.as_float() {
        return Ok(left.to_f64().partial_cmp(&value));
    }
    Err(t.wrong_type_error(source_line, "Numeric", arg.class_name()))
}

fn add(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, |a, b| Some(a.add(b)))
}

fn sub(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, |a, b| Some(a.sub(b)))
}

fn mul(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, |a, b| Some(a.mul(b)))
}

/// Exact division; dividing by zero faults.
fn div(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, Rational::div)
}

fn gt(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    comparison(receiver, source_line, t, args, Ordering::is_gt)
}

fn ge(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    comparison(receiver, source_line, t, args, Ordering::is_ge)
}

fn lt(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    comparison(receiver, source_line, t, args, Ordering::is_lt)
}

fn le(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    comparison(receiver, source_line, t, args, Ordering::is_le)
}

fn spaceship(
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
    match ordering(t, source_line, &left, &args[0]) {
        Ok(Some(Ordering::Less)) => t.integer(-1),
        Ok(Some(Ordering::Greater)) => t.integer(1),
        Ok(Some(Ordering::Equal)) | Ok(None) => t.integer(0),
        Err(error) => error,
    }
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
    let left = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    match ordering(t, source_line, &left, &args[0]) {
        Ok(result) => t.boolean(result == Some(Ordering::Equal)),
        // A non-numeric operand is simply unequal.
        Err(_) => t.boolean(false),
    }
}

fn ne(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    let equal = eq(receiver, source_line, t, args, None);
    match equal.as_error() {
        Some(_) => equal,
        None => t.boolean(!equal.is_truthy()),
    }
}

fn to_d(
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

fn to_f(
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
        Ok(value) => t.float(value.to_f64()),
        Err(error) => error,
    }
}

/// Truncates toward zero; the result carries the conversion subflag.
fn to_i(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    let value = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    match value.to_i64() {
        Some(truncated) => t.integer_converted(truncated),
        None => t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "integer operation overflowed",
        ),
    }
}

/// Exact decimal form when the expansion terminates, `n/d` otherwise.
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
    match receiver_value(receiver, source_line, t) {
        Ok(value) => t.string(value.to_string()),
        Err(error) => error,
    }
}

fn abs(
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
        Ok(value) => {
            if value.is_negative() {
                t.decimal(Rational::from_integer(0).sub(&value))
            } else {
                t.decimal(value)
            }
        }
        Err(error) => error,
    }
}

fn zero(
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
        Ok(value) => t.boolean(value.is_zero()),
        Err(error) => error,
    }
}

fn positive(
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
        Ok(value) => t.boolean(value.is_positive()),
        Err(error) => error,
    }
}

fn negative(
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
        Ok(value) => t.boolean(value.is_negative()),
        Err(error) => error,
    }
}
