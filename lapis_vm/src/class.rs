//! Classes: method tables, superclass linkage, constants.
//!
//! A class holds two method tables (instance and class), an optional
//! superclass, and a constant table. Classes are themselves objects; the
//! object wrapper is created on demand and compares by class identity.
//!
//! Method tables are read-mostly: they are populated during bootstrap and
//! only mutated afterwards by `def_method`-family instructions. Writers
//! serialize on the table lock, and the lock release publishes the new
//! entry before the defining instruction completes.

use crate::object::block::BlockObject;
use crate::object::{Object, ObjectKind, ObjectRef};
use crate::thread::Thread;
use lapis_bytecode::InstructionSet;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Shared handle to a class.
pub type ClassRef = Arc<RClass>;

// =============================================================================
// Built-in method descriptors
// =============================================================================

/// Implementation signature shared by every built-in method.
///
/// Builtins receive the receiver, the source line of the call site, the
/// executing thread, the positional argument slice, and the block passed
/// at the call site (if any). They signal faults by returning an error
/// object.
pub type BuiltinFn = fn(
    receiver: &ObjectRef,
    source_line: usize,
    t: &mut Thread,
    args: &[ObjectRef],
    block: Option<&BlockObject>,
) -> ObjectRef;

/// A declarative built-in method descriptor: a name and its handler.
///
/// Tables of these are installed into classes at bootstrap via
/// [`RClass::set_builtin_methods`].
#[derive(Clone, Copy)]
pub struct BuiltinMethod {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl std::fmt::Debug for BuiltinMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<BuiltinMethod {}>", self.name)
    }
}

/// One entry in a method table.
#[derive(Debug, Clone)]
pub enum MethodEntry {
    /// A native method.
    Builtin(BuiltinMethod),
    /// A user-defined method body executed by the interpreter.
    Bytecode(Arc<InstructionSet>),
}

type MethodTable = FxHashMap<Arc<str>, MethodEntry>;

// =============================================================================
// RClass
// =============================================================================

/// A runtime class.
pub struct RClass {
    name: Arc<str>,
    instance_methods: RwLock<MethodTable>,
    class_methods: RwLock<MethodTable>,
    superclass: RwLock<Option<ClassRef>>,
    constants: RwLock<FxHashMap<Arc<str>, ObjectRef>>,
}

impl RClass {
    /// Create a class with empty tables and no superclass.
    pub fn new(name: Arc<str>) -> ClassRef {
        Arc::new(RClass {
            name,
            instance_methods: RwLock::new(MethodTable::default()),
            class_methods: RwLock::new(MethodTable::default()),
            superclass: RwLock::new(None),
            constants: RwLock::new(FxHashMap::default()),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn name_handle(&self) -> Arc<str> {
        self.name.clone()
    }

    pub fn superclass(&self) -> Option<ClassRef> {
        self.superclass.read().clone()
    }

    pub fn set_superclass(&self, superclass: ClassRef) {
        *self.superclass.write() = Some(superclass);
    }

    /// Install a table of built-in descriptors into the instance or class
    /// table. Re-installation overwrites entry by entry.
    pub fn set_builtin_methods(&self, methods: &[BuiltinMethod], class_methods: bool) {
        let table = if class_methods {
            &self.class_methods
        } else {
            &self.instance_methods
        };
        let mut table = table.write();
        for method in methods {
            table.insert(Arc::from(method.name), MethodEntry::Builtin(*method));
        }
    }

    /// Define or redefine a single method.
    pub fn define_method(&self, name: Arc<str>, entry: MethodEntry, class_method: bool) {
        let table = if class_method {
            &self.class_methods
        } else {
            &self.instance_methods
        };
        table.write().insert(name, entry);
    }

    /// Look up an instance method on this class and its superclass chain.
    /// The first hit wins.
    pub fn lookup_instance_method(&self, name: &str) -> Option<MethodEntry> {
        if let Some(entry) = self.instance_methods.read().get(name) {
            return Some(entry.clone());
        }
        let superclass = self.superclass();
        superclass.and_then(|s| s.lookup_instance_method(name))
    }

    /// Look up a class method on this class and its superclass chain.
    pub fn lookup_class_method(&self, name: &str) -> Option<MethodEntry> {
        if let Some(entry) = self.class_methods.read().get(name) {
            return Some(entry.clone());
        }
        let superclass = self.superclass();
        superclass.and_then(|s| s.lookup_class_method(name))
    }

    /// Read a constant defined on this class or its superclass chain.
    pub fn lookup_constant(&self, name: &str) -> Option<ObjectRef> {
        if let Some(value) = self.constants.read().get(name) {
            return Some(value.clone());
        }
        let superclass = self.superclass();
        superclass.and_then(|s| s.lookup_constant(name))
    }

    /// Bind a constant on this class.
    pub fn set_constant(&self, name: Arc<str>, value: ObjectRef) {
        self.constants.write().insert(name, value);
    }

    /// Release method tables, constants, and superclass linkage.
    ///
    /// Constants routinely point back at class objects, so the class graph
    /// can only be reclaimed once these tables are emptied; VM teardown
    /// calls this for every registered class.
    pub fn clear(&self) {
        self.instance_methods.write().clear();
        self.class_methods.write().clear();
        self.constants.write().clear();
        *self.superclass.write() = None;
    }

    /// Wrap a class handle as an object answering the `Class` class.
    pub fn wrap(class: &ClassRef, class_class: ClassRef) -> ObjectRef {
        Arc::new(Object::new(class_class, ObjectKind::Class(class.clone())))
    }
}

impl std::fmt::Debug for RClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<Class {}>", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectRef;

    fn stub(
        receiver: &ObjectRef,
        _source_line: usize,
        _t: &mut Thread,
        _args: &[ObjectRef],
        _block: Option<&BlockObject>,
    ) -> ObjectRef {
        receiver.clone()
    }

    #[test]
    fn test_lookup_walks_superclass_chain() {
        let parent = RClass::new("Object".into());
        let child = RClass::new("Integer".into());
        child.set_superclass(parent.clone());
        parent.set_builtin_methods(&[BuiltinMethod { name: "itself", func: stub }], false);

        assert!(child.lookup_instance_method("itself").is_some());
        assert!(child.lookup_instance_method("missing").is_none());
    }

    #[test]
    fn test_reinstallation_overwrites() {
        let class = RClass::new("Float".into());
        class.set_builtin_methods(&[BuiltinMethod { name: "abs", func: stub }], false);
        class.set_builtin_methods(&[BuiltinMethod { name: "abs", func: stub }], false);
        assert!(class.lookup_instance_method("abs").is_some());
    }

    #[test]
    fn test_instance_and_class_tables_are_distinct() {
        let class = RClass::new("Float".into());
        class.set_builtin_methods(&[BuiltinMethod { name: "new", func: stub }], true);
        assert!(class.lookup_class_method("new").is_some());
        assert!(class.lookup_instance_method("new").is_none());
    }
}
