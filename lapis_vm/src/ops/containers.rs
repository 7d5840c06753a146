//! Array, hash, and range literals.

use crate::error::VmResult;
use crate::interpreter::ControlFlow;
use crate::ops::malformed;
use crate::thread::Thread;
use lapis_bytecode::Instruction;
use rustc_hash::FxHashMap;

/// NewArray argc: collect the top argc values, preserving push order.
pub(crate) fn new_array(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let count = inst.int_param(0).ok_or_else(|| malformed(inst))? as usize;
    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        elements.push(t.stack.pop()?);
    }
    elements.reverse();
    let array = t.array(elements);
    t.stack.push(array)?;
    Ok(ControlFlow::Continue)
}

/// NewHash pair-count: collect key/value pairs pushed in order. Keys must
/// be strings.
pub(crate) fn new_hash(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let pair_count = inst.int_param(0).ok_or_else(|| malformed(inst))? as usize;
    let mut pairs = FxHashMap::default();
    for _ in 0..pair_count {
        let value = t.stack.pop()?;
        let key = t.stack.pop()?;
        let Some(key) = key.as_str() else {
            return Ok(ControlFlow::Raise(t.wrong_type_error(
                inst.source_line,
                "String",
                key.class_name(),
            )));
        };
        pairs.insert(key.to_string(), value);
    }
    let hash = t.vm().init_hash(pairs);
    t.stack.push(hash)?;
    Ok(ControlFlow::Continue)
}

/// NewRange: build an inclusive integer range from the two topmost values.
pub(crate) fn new_range(t: &mut Thread, inst: &Instruction) -> VmResult<ControlFlow> {
    let end = t.stack.pop()?;
    let start = t.stack.pop()?;
    let (Some(start), Some(end)) = (start.as_integer(), end.as_integer()) else {
        let culprit = if start.as_integer().is_none() {
            start.class_name()
        } else {
            end.class_name()
        };
        return Ok(ControlFlow::Raise(t.wrong_type_error(
            inst.source_line,
            "Integer",
            culprit,
        )));
    };
    let range = t.range(start, end);
    t.stack.push(range)?;
    Ok(ControlFlow::Continue)
}
