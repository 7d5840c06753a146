//! Block objects: closures over a frame's environment.
//!
//! A block captures the environment of the frame that wrote it down, plus
//! that frame's `self`. Invoking the block pushes a block frame whose
//! environment chains to the captured one, so the block reads and writes
//! the originating locals even after the originating frame has returned.

use crate::frame::Environment;
use crate::object::ObjectRef;
use lapis_bytecode::InstructionSet;
use std::sync::Arc;

/// A closure: code, captured environment, and captured `self`.
#[derive(Clone)]
pub struct BlockObject {
    /// The block body.
    pub iset: Arc<InstructionSet>,
    /// Environment of the defining frame, kept alive by this handle.
    pub env: Arc<Environment>,
    /// `self` at the definition site.
    pub self_obj: ObjectRef,
}

impl BlockObject {
    pub fn new(iset: Arc<InstructionSet>, env: Arc<Environment>, self_obj: ObjectRef) -> Self {
        Self { iset, env, self_obj }
    }
}

impl std::fmt::Debug for BlockObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<Block {}>", self.iset.label.name)
    }
}
