//! The Integer class: fixed-width signed integers.
//!
//! Integer arithmetic stays exact: an Integer right operand produces an
//! Integer (overflow is an InternalError, not a silent wrap), while a
//! Float right operand promotes the whole operation to double precision.
//! Comparisons coerce any Numeric, unlike Float's strict checks.

use crate::builtins::{check_arity, coerce_numeric, unavailable_new};
use crate::class::{BuiltinMethod, ClassRef};
use crate::interpreter::yield_or_error;
use crate::object::block::BlockObject;
use crate::object::ObjectRef;
use crate::thread::Thread;
use lapis_core::{ErrorKind, Rational};

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
    BuiltinMethod { name: "%", func: modulo },
    BuiltinMethod { name: "**", func: pow },
    BuiltinMethod { name: ">", func: gt },
    BuiltinMethod { name: ">=", func: ge },
    BuiltinMethod { name: "<", func: lt },
    BuiltinMethod { name: "<=", func: le },
    BuiltinMethod { name: "<=>", func: spaceship },
    BuiltinMethod { name: "==", func: eq },
    BuiltinMethod { name: "!=", func: ne },
    BuiltinMethod { name: "to_i", func: to_i },
    BuiltinMethod { name: "to_f", func: to_f },
    BuiltinMethod { name: "to_d", func: to_d },
    BuiltinMethod { name: "to_s", func: to_s },
    BuiltinMethod { name: "abs", func: abs },
    BuiltinMethod { name: "next", func: next },
    BuiltinMethod { name: "pred", func: pred },
    BuiltinMethod { name: "times", func: times },
    BuiltinMethod { name: "even?", func: even },
    BuiltinMethod { name: "odd?", func: odd },
    BuiltinMethod { name: "zero?", func: zero },
    BuiltinMethod { name: "positive?", func: positive },
    BuiltinMethod { name: "negative?", func: negative },
];

fn receiver_value(receiver: &ObjectRef, source_line: usize, t: &Thread) -> Result<i64, ObjectRef> {
    match receiver.as_integer() {
        Some(value) => Ok(value),
        None => Err(t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Integer method dispatched on a non-Integer receiver",
        )),
    }
}

/// Exact when the right operand is an Integer, double-precision when it
/// is a Float; anything else is a TypeError.
fn arithmetic(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
    division: bool,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 1) {
        return error;
    }
    let left = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    if let Some(right) = args[0].as_integer() {
        if division && right == 0 {
            return t.zero_division_error(source_line);
        }
        return match int_op(left, right) {
            Some(result) => t.integer(result),
            None => t.init_error_object(
                ErrorKind::InternalError,
                source_line,
                "integer operation overflowed",
            ),
        };
    }
    if let Some(right) = args[0].as_float() {
        if division && right == 0.0 {
            return t.zero_division_error(source_line);
        }
        return t.float(float_op(left as f64, right));
    }
    t.wrong_type_error(source_line, "Numeric", args[0].class_name())
}

fn comparison(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    operation: fn(f64, f64) -> bool,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 1) {
        return error;
    }
    let left = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    let right = match coerce_numeric(t, source_line, &args[0]) {
        Ok(value) => value,
        Err(error) => return error,
    };
    t.boolean(operation(left as f64, right))
}

/// `7 + 2 # => 9`; `7 + 0.5 # => 7.5`
fn add(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, i64::checked_add, |a, b| a + b, false)
}

fn sub(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, i64::checked_sub, |a, b| a - b, false)
}

fn mul(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, i64::checked_mul, |a, b| a * b, false)
}

/// Integer division truncates toward zero: `7 / 2 # => 3`.
fn div(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, i64::checked_div, |a, b| a / b, true)
}

fn modulo(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, i64::checked_rem, |a, b| a % b, true)
}

/// `2 ** 10 # => 1024`; a negative exponent promotes to Float.
fn pow(
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
    if let Some(right) = args[0].as_integer() {
        if right < 0 {
            return t.float((left as f64).powi(right as i32));
        }
        let result = u32::try_from(right)
            .ok()
            .and_then(|exponent| left.checked_pow(exponent));
        return match result {
            Some(result) => t.integer(result),
            None => t.init_error_object(
                ErrorKind::InternalError,
                source_line,
                "integer operation overflowed",
            ),
        };
    }
    if let Some(right) = args[0].as_float() {
        return t.float((left as f64).powf(right));
    }
    t.wrong_type_error(source_line, "Numeric", args[0].class_name())
}

fn gt(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    comparison(receiver, source_line, t, args, |left, right| left > right)
}

fn ge(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    comparison(receiver, source_line, t, args, |left, right| left >= right)
}

fn lt(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    comparison(receiver, source_line, t, args, |left, right| left < right)
}

fn le(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    comparison(receiver, source_line, t, args, |left, right| left <= right)
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
        Ok(value) => value as f64,
        Err(error) => return error,
    };
    let right = match coerce_numeric(t, source_line, &args[0]) {
        Ok(value) => value,
        Err(error) => return error,
    };
    if left < right {
        t.integer(-1)
    } else if left > right {
        t.integer(1)
    } else {
        t.integer(0)
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
    let equal = args[0]
        .numeric()
        .map(|numeric| left as f64 == numeric.float_value())
        .unwrap_or(false);
    t.boolean(equal)
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
        Ok(value) => t.float(value as f64),
        Err(error) => error,
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
    match receiver_value(receiver, source_line, t) {
        Ok(value) => t.decimal(Rational::from_integer(value)),
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
        Ok(value) => match value.checked_abs() {
            Some(result) => t.integer(result),
            None => t.init_error_object(
                ErrorKind::InternalError,
                source_line,
                "integer operation overflowed",
            ),
        },
        Err(error) => error,
    }
}

fn next(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    step(receiver, source_line, t, args, 1)
}

fn pred(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    step(receiver, source_line, t, args, -1)
}

fn step(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    delta: i64,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    match receiver_value(receiver, source_line, t) {
        Ok(value) => match value.checked_add(delta) {
            Some(result) => t.integer(result),
            None => t.init_error_object(
                ErrorKind::InternalError,
                source_line,
                "integer operation overflowed",
            ),
        },
        Err(error) => error,
    }
}

/// Yields each index in `0..self` to the given block and returns self.
///
/// `5.times do |i| ... end`
fn times(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    let count = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    for index in 0..count.max(0) {
        let argument = t.integer(index);
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

fn even(
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
        Ok(value) => t.boolean(value % 2 == 0),
        Err(error) => error,
    }
}

fn odd(
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
        Ok(value) => t.boolean(value % 2 != 0),
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
        Ok(value) => t.boolean(value == 0),
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
        Ok(value) => t.boolean(value > 0),
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
        Ok(value) => t.boolean(value < 0),
        Err(error) => error,
    }
}
