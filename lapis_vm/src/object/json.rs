//! JSON projection for the `to_json` capability.
//!
//! Object graphs project into [`serde_json::Value`] and serialize from
//! there, so quoting and escaping are never hand-assembled.

use crate::object::{Object, ObjectKind};
use crate::thread::Thread;
use serde_json::{Map, Number, Value};

/// Project `object` into a JSON value.
///
/// Numbers keep their numeric form where JSON can hold it (non-finite
/// floats become `null`); instances project as their instance-variable
/// map; opaque values, blocks, and classes project as descriptive strings.
pub fn to_json_value(object: &Object, t: &mut Thread) -> Value {
    match object.kind() {
        ObjectKind::Integer(i) => Value::Number(i.value.into()),
        ObjectKind::Float(f) => Number::from_f64(f.value).map_or(Value::Null, Value::Number),
        ObjectKind::Decimal(d) => {
            Number::from_f64(d.value.to_f64()).map_or(Value::Null, Value::Number)
        }
        ObjectKind::Str(s) => Value::String(s.clone()),
        ObjectKind::Boolean(b) => Value::Bool(*b),
        ObjectKind::Null => Value::Null,
        ObjectKind::Array(elements) => {
            let elements = elements.read().clone();
            Value::Array(elements.iter().map(|e| to_json_value(e, t)).collect())
        }
        ObjectKind::Hash(pairs) => {
            let pairs: Vec<(String, _)> = pairs
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let mut map = Map::new();
            for (key, value) in pairs {
                map.insert(key, to_json_value(&value, t));
            }
            Value::Object(map)
        }
        ObjectKind::Range(r) => Value::Array(
            (r.start..=r.end)
                .map(|i| Value::Number(i.into()))
                .collect(),
        ),
        ObjectKind::Instance => {
            let mut map = Map::new();
            for (name, value) in object.ivars_snapshot() {
                let key = name.trim_start_matches('@').to_string();
                map.insert(key, to_json_value(&value, t));
            }
            Value::Object(map)
        }
        ObjectKind::Error(e) => Value::String(e.to_string()),
        ObjectKind::Class(c) => Value::String(c.name().to_string()),
        ObjectKind::Block(_) => Value::String("#<Block>".to_string()),
        ObjectKind::Opaque(o) => Value::String(format!("#<Opaque 0x{:x}>", o.address)),
    }
}
