//! The Float class: double-precision reals.
//!
//! Float is the reference implementation of the built-in pattern: every
//! method states its arity policy, its coercion policy, and its result
//! class, and reports faults as error objects with the call site's source
//! line attached.
//!
//! `Float.new` is deliberately unavailable.

use crate::builtins::{check_arity, check_arity_range, coerce_numeric, unavailable_new};
use crate::class::{BuiltinMethod, ClassRef};
use crate::object::block::BlockObject;
use crate::object::numeric::format_float;
use crate::object::{ObjectKind, ObjectRef};
use crate::thread::Thread;
use lapis_core::{errors, ErrorKind, Rational};

pub(crate) fn install(class: &ClassRef, unsafe_ffi: bool) {
    class.set_builtin_methods(CLASS_METHODS, true);
    class.set_builtin_methods(INSTANCE_METHODS, false);
    if unsafe_ffi {
        class.set_builtin_methods(PTR_METHODS, false);
    }
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
    BuiltinMethod { name: "to_d", func: to_d },
    BuiltinMethod { name: "to_i", func: to_i },
    BuiltinMethod { name: "to_f", func: to_f },
    BuiltinMethod { name: "to_s", func: to_s },
    BuiltinMethod { name: "abs", func: abs },
    BuiltinMethod { name: "ceil", func: ceil },
    BuiltinMethod { name: "floor", func: floor },
    BuiltinMethod { name: "round", func: round },
    BuiltinMethod { name: "zero?", func: zero },
    BuiltinMethod { name: "positive?", func: positive },
    BuiltinMethod { name: "negative?", func: negative },
];

/// Installed only under the unsafe-FFI capability.
const PTR_METHODS: &[BuiltinMethod] = &[BuiltinMethod { name: "ptr", func: ptr }];

fn receiver_value(receiver: &ObjectRef, source_line: usize, t: &Thread) -> Result<f64, ObjectRef> {
    match receiver.as_float() {
        Some(value) => Ok(value),
        None => Err(t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Float method dispatched on a non-Float receiver",
        )),
    }
}

/// Apply an arithmetic operation, coercing the right operand through the
/// Numeric capability. Division-family operations fault on a zero right
/// operand.
fn arithmetic(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    operation: fn(f64, f64) -> f64,
    division: bool,
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
    if division && right == 0.0 {
        return t.zero_division_error(source_line);
    }
    t.float(operation(left, right))
}

/// Strict comparison: the argument must itself be a Float, though the
/// expected-type tag still reads "Numeric". Integer comparisons coerce;
/// Float's deliberately do not.
fn strict_comparison(
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
    let Some(right) = args[0].as_float() else {
        return t.wrong_type_error(source_line, "Numeric", args[0].class_name());
    };
    t.boolean(operation(left, right))
}

/// Returns the sum of self and a Numeric.
///
/// `1.1 + 2 # => 3.1`
fn add(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, |left, right| left + right, false)
}

/// Returns the subtraction of a Numeric from self.
fn sub(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, |left, right| left - right, false)
}

/// Returns self multiplied by a Numeric.
fn mul(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, |left, right| left * right, false)
}

/// Returns self divided by a Numeric. Division by exact zero faults.
///
/// `7.5 / 3 # => 2.5`
fn div(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, |left, right| left / right, true)
}

/// Returns the modulo of self and a Numeric, with the remainder carrying
/// the dividend's sign.
///
/// `5.5 % 2 # => 1.5`
fn modulo(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, |left, right| left % right, true)
}

/// Returns self raised to a Numeric power.
fn pow(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    arithmetic(receiver, source_line, t, args, f64::powf, false)
}

fn gt(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    strict_comparison(receiver, source_line, t, args, |left, right| left > right)
}

fn ge(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    strict_comparison(receiver, source_line, t, args, |left, right| left >= right)
}

fn lt(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    strict_comparison(receiver, source_line, t, args, |left, right| left < right)
}

fn le(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    strict_comparison(receiver, source_line, t, args, |left, right| left <= right)
}

/// Returns 1 if self is larger than the Numeric argument, -1 if smaller,
/// 0 otherwise (including incomparable NaN operands).
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

/// Equal iff the argument is Numeric and the coerced doubles compare
/// equal; NaN is never equal to itself.
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
        .map(|numeric| left == numeric.float_value())
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
    match equal.kind() {
        ObjectKind::Boolean(value) => t.boolean(!value),
        _ => equal,
    }
}

/// Converts self into a Decimal, digit for digit through the shortest
/// decimal rendering.
///
/// `"3.14".to_f.to_d # => 3.14`
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
    let value = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    let rendered = format!("{value}");
    match Rational::from_decimal_str(&rendered) {
        Some(rational) => t.decimal(rational),
        None => t.init_error_object(
            ErrorKind::ArgumentError,
            source_line,
            errors::invalid_numeric_string(&rendered),
        ),
    }
}

/// Returns the Integer representation of self, truncating toward zero.
///
/// `100.1.to_i # => 100`
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
    t.integer_converted(value.trunc() as i64)
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
    receiver.clone()
}

/// Shortest non-exponential rendering; integral values carry a `.0`.
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
    let value = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    t.string(format_float(value))
}

/// Returns self as a positive value.
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
    let value = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    t.float(value.abs())
}

/// Returns the smallest Integer greater than or equal to self.
fn ceil(
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
    t.integer_converted(value.ceil() as i64)
}

/// Returns the largest Integer less than or equal to self.
fn floor(
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
    t.integer_converted(value.floor() as i64)
}

/// Rounds half away from zero to the given precision (default 0). The
/// result is a Float at every precision.
///
/// `1.115.round(2) # => 1.12`
fn round(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity_range(t, source_line, args, 0, 1) {
        return error;
    }
    let precision = match args.first() {
        Some(arg) => match arg.as_integer() {
            Some(precision) => precision,
            None => return t.wrong_type_error(source_line, "Integer", arg.class_name()),
        },
        None => 0,
    };
    let value = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    let scale = 10f64.powi(precision as i32);
    t.float((value * scale).round() / scale)
}

/// True iff self is exactly 0.0; NaN answers false to all three
/// sign predicates.
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
    let value = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    t.boolean(value == 0.0)
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
    let value = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    t.boolean(value > 0.0)
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
    let value = match receiver_value(receiver, source_line, t) {
        Ok(value) => value,
        Err(error) => return error,
    };
    t.boolean(value < 0.0)
}

/// Exposes the address of this Float's storage as an Opaque object.
/// Reachable only under the unsafe-FFI capability; the VM never
/// dereferences the address.
fn ptr(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    _block: Option<&BlockObject>,
) -> ObjectRef {
    if let Some(error) = check_arity(t, source_line, args, 0) {
        return error;
    }
    match receiver.kind() {
        ObjectKind::Float(float) => {
            let address = &float.value as *const f64 as usize;
            t.vm().init_opaque(address)
        }
        _ => t.init_error_object(
            ErrorKind::InternalError,
            source_line,
            "Float method dispatched on a non-Float receiver",
        ),
    }
}
