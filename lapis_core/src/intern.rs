//! Process-wide string interning.
//!
//! Method names, class names, and local names recur constantly; interning
//! them collapses every occurrence to one shared allocation so map keys
//! hash a pointer-sized handle instead of re-hashing bytes.

use dashmap::DashMap;
use std::sync::Arc;

/// A concurrent intern table handing out shared `Arc<str>` handles.
///
/// Interning the same text twice returns clones of the same allocation.
/// The table only grows; entries live until the owning VM is torn down,
/// which matches the lifetime of the names the core interns.
#[derive(Debug, Default)]
pub struct Interner {
    table: DashMap<Arc<str>, ()>,
}

impl Interner {
    /// Create an empty intern table.
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
        }
    }

    /// Intern `text`, returning the canonical shared handle.
    pub fn intern(&self, text: &str) -> Arc<str> {
        if let Some(entry) = self.table.get(text) {
            return entry.key().clone();
        }
        let entry = self.table.entry(Arc::from(text)).or_insert(());
        entry.key().clone()
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
