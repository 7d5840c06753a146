//! The top-level class registry.
//!
//! Populated during bootstrap, read-mostly afterwards. Runtime class
//! definition takes the write lock; readers observe a consistent table and
//! the lock release publishes new classes before the defining instruction
//! completes.

use crate::class::{ClassRef, RClass};
use lapis_core::Interner;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Top-level classes, keyed by interned name.
#[derive(Default)]
pub struct ClassRegistry {
    classes: RwLock<FxHashMap<std::sync::Arc<str>, ClassRef>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self {
            classes: RwLock::new(FxHashMap::default()),
        }
    }

    /// The class registered under `name`, if any. Callers map a miss to a
    /// NameError.
    pub fn top_level_class(&self, name: &str) -> Option<ClassRef> {
        self.classes.read().get(name).cloned()
    }

    /// Create and register a class, or return the existing one: repeated
    /// calls with the same name yield the same class.
    pub fn initialize_class(&self, interner: &Interner, name: &str) -> ClassRef {
        if let Some(existing) = self.top_level_class(name) {
            return existing;
        }
        let mut classes = self.classes.write();
        // A racing writer may have won between the read and the write lock.
        if let Some(existing) = classes.get(name) {
            return existing.clone();
        }
        let class = RClass::new(interner.intern(name));
        classes.insert(class.name_handle(), class.clone());
        class
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    /// Snapshot of every registered class, for teardown.
    pub fn snapshot(&self) -> Vec<ClassRef> {
        self.classes.read().values().cloned().collect()
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.classes.write().clear();
    }
}
