//! The runtime object model.
//!
//! Every value the machine touches is an [`Object`] behind an [`ObjectRef`]:
//! a class linkage, a tagged [`ObjectKind`] payload, per-kind flags, and an
//! instance-variable map. All objects answer the same capability set -
//! `class_ref`, `inspect`, `to_string` (via `Display`), and `to_json` -
//! regardless of kind.
//!
//! Memory management is host reference counting; frames and stacks drop
//! their references on every exit path, and the class graph is released at
//! VM teardown.

pub mod block;
pub mod error_obj;
pub mod json;
pub mod numeric;

use crate::class::ClassRef;
use crate::object::block::BlockObject;
use crate::object::error_obj::ErrorObject;
use crate::object::numeric::{DecimalObject, FloatObject, IntegerObject, Numeric};
use crate::thread::Thread;
use bitflags::bitflags;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a runtime object.
pub type ObjectRef = Arc<Object>;

bitflags! {
    /// Per-kind object flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectFlags: u8 {
        /// Set on integers produced by a narrowing conversion
        /// (`Float#to_i`, `ceil`, `floor`, `Decimal#to_i`).
        const CONVERTED_INTEGER = 1 << 0;
    }
}

// =============================================================================
// ObjectKind
// =============================================================================

/// An inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeObject {
    pub start: i64,
    pub end: i64,
}

/// A host-opaque value: the address of something the embedder owns.
///
/// The VM never dereferences the address; it only carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpaqueObject {
    pub address: usize,
}

/// The tagged payload of an object.
pub enum ObjectKind {
    Integer(IntegerObject),
    Float(FloatObject),
    Decimal(DecimalObject),
    Str(String),
    Boolean(bool),
    Null,
    Array(RwLock<Vec<ObjectRef>>),
    Hash(RwLock<FxHashMap<String, ObjectRef>>),
    Range(RangeObject),
    Block(BlockObject),
    Error(ErrorObject),
    Class(ClassRef),
    /// A plain instance of a user-defined class; all state lives in the
    /// instance-variable map.
    Instance,
    Opaque(OpaqueObject),
}

impl ObjectKind {
    /// The concrete kind name shown by stack inspection.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            ObjectKind::Integer(_) => "Integer",
            ObjectKind::Float(_) => "Float",
            ObjectKind::Decimal(_) => "Decimal",
            ObjectKind::Str(_) => "String",
            ObjectKind::Boolean(_) => "Boolean",
            ObjectKind::Null => "Null",
            ObjectKind::Array(_) => "Array",
            ObjectKind::Hash(_) => "Hash",
            ObjectKind::Range(_) => "Range",
            ObjectKind::Block(_) => "Block",
            ObjectKind::Error(_) => "Error",
            ObjectKind::Class(_) => "Class",
            ObjectKind::Instance => "Instance",
            ObjectKind::Opaque(_) => "Opaque",
        }
    }
}

// =============================================================================
// Object
// =============================================================================

/// One runtime value: class linkage, payload, flags, instance variables.
pub struct Object {
    class: ClassRef,
    kind: ObjectKind,
    flags: ObjectFlags,
    ivars: RwLock<FxHashMap<Arc<str>, ObjectRef>>,
}

impl Object {
    /// Create an object of `class` with the given payload.
    pub fn new(class: ClassRef, kind: ObjectKind) -> Object {
        Object {
            class,
            kind,
            flags: ObjectFlags::empty(),
            ivars: RwLock::new(FxHashMap::default()),
        }
    }

    /// Create an object with flags set, e.g. a conversion-result integer.
    pub fn with_flags(class: ClassRef, kind: ObjectKind, flags: ObjectFlags) -> Object {
        Object {
            class,
            kind,
            flags,
            ivars: RwLock::new(FxHashMap::default()),
        }
    }

    /// The class this object answers to.
    #[inline]
    pub fn class_ref(&self) -> &ClassRef {
        &self.class
    }

    /// Name of this object's class.
    #[inline]
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    #[inline]
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    #[inline]
    pub fn flags(&self) -> ObjectFlags {
        self.flags
    }

    /// Everything is truthy except `false` and `nil`.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self.kind, ObjectKind::Boolean(false) | ObjectKind::Null)
    }

    /// Read an instance variable.
    pub fn get_ivar(&self, name: &str) -> Option<ObjectRef> {
        self.ivars.read().get(name).cloned()
    }

    /// Write an instance variable.
    pub fn set_ivar(&self, name: Arc<str>, value: ObjectRef) {
        self.ivars.write().insert(name, value);
    }

    /// Snapshot of the instance-variable map, for inspection and JSON.
    pub fn ivars_snapshot(&self) -> Vec<(Arc<str>, ObjectRef)> {
        self.ivars
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match &self.kind {
            ObjectKind::Integer(i) => Some(i.value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match &self.kind {
            ObjectKind::Float(f) => Some(f.value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_decimal(&self) -> Option<&DecimalObject> {
        match &self.kind {
            ObjectKind::Decimal(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_class(&self) -> Option<&ClassRef> {
        match &self.kind {
            ObjectKind::Class(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_block(&self) -> Option<&BlockObject> {
        match &self.kind {
            ObjectKind::Block(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_error(&self) -> Option<&ErrorObject> {
        match &self.kind {
            ObjectKind::Error(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_range(&self) -> Option<RangeObject> {
        match &self.kind {
            ObjectKind::Range(r) => Some(*r),
            _ => None,
        }
    }

    /// The Numeric capability: present for Integer, Float, and Decimal.
    pub fn numeric(&self) -> Option<&dyn Numeric> {
        match &self.kind {
            ObjectKind::Integer(i) => Some(i),
            ObjectKind::Float(f) => Some(f),
            ObjectKind::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Whether this object is an error object.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self.kind, ObjectKind::Error(_))
    }

    // =========================================================================
    // Capabilities
    // =========================================================================

    /// Developer-facing rendering.
    pub fn inspect(&self) -> String {
        match &self.kind {
            ObjectKind::Str(s) => format!("\"{s}\""),
            ObjectKind::Null => "nil".to_string(),
            ObjectKind::Error(e) => format!("#<{}: {}>", e.kind, e.message),
            ObjectKind::Instance => format!("#<{}>", self.class_name()),
            _ => self.to_string(),
        }
    }

    /// JSON projection of this object.
    pub fn to_json(&self, t: &mut Thread) -> String {
        json::to_json_value(self, t).to_string()
    }

    /// Value equality as observed by `==`.
    ///
    /// Numerics compare through their double projection (so `1.0 == 1`),
    /// strings, booleans, and ranges by value, classes and everything else
    /// by identity.
    pub fn value_eq(&self, other: &Object) -> bool {
        match (&self.kind, &other.kind) {
            (ObjectKind::Decimal(a), ObjectKind::Decimal(b)) => a.value == b.value,
            _ => match (self.numeric(), other.numeric()) {
                (Some(a), Some(b)) => a.float_value() == b.float_value(),
                _ => match (&self.kind, &other.kind) {
                    (ObjectKind::Str(a), ObjectKind::Str(b)) => a == b,
                    (ObjectKind::Boolean(a), ObjectKind::Boolean(b)) => a == b,
                    (ObjectKind::Null, ObjectKind::Null) => true,
                    (ObjectKind::Range(a), ObjectKind::Range(b)) => a == b,
                    (ObjectKind::Class(a), ObjectKind::Class(b)) => Arc::ptr_eq(a, b),
                    _ => std::ptr::eq(self, other),
                },
            },
        }
    }
}

impl fmt::Display for Object {
    /// User-facing rendering, the `to_string` capability.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ObjectKind::Integer(i) => write!(f, "{}", i.value),
            ObjectKind::Float(fl) => f.write_str(&numeric::format_float(fl.value)),
            ObjectKind::Decimal(d) => write!(f, "{}", d.value),
            ObjectKind::Str(s) => f.write_str(s),
            ObjectKind::Boolean(b) => write!(f, "{b}"),
            ObjectKind::Null => Ok(()),
            ObjectKind::Array(elements) => {
                let rendered: Vec<String> =
                    elements.read().iter().map(|e| e.inspect()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            ObjectKind::Hash(pairs) => {
                let mut rendered: Vec<String> = pairs
                    .read()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.inspect()))
                    .collect();
                rendered.sort();
                write!(f, "{{ {} }}", rendered.join(", "))
            }
            ObjectKind::Range(r) => write!(f, "({}..{})", r.start, r.end),
            ObjectKind::Block(_) => f.write_str("#<Block>"),
            ObjectKind::Error(e) => f.write_str(&e.message),
            ObjectKind::Class(c) => f.write_str(c.name()),
            ObjectKind::Instance => write!(f, "#<{}>", self.class_name()),
            ObjectKind::Opaque(o) => write!(f, "#<Opaque 0x{:x}>", o.address),
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.inspect(), self.kind.kind_name())
    }
}
