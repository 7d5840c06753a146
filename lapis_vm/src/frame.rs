//! Call frames, environments, and the call-frame stack.
//!
//! Locals live in an [`Environment`]: a slot vector shared behind `Arc`
//! with an optional parent chain. A normal frame owns a fresh environment
//! with no parent; a block frame's environment chains to the environment
//! captured at the block's definition site. Because blocks hold their own
//! `Arc` to the captured environment, a frame returning does not free
//! locals a surviving block still references.

use crate::error::{VmError, VmResult};
use crate::object::block::BlockObject;
use crate::object::ObjectRef;
use lapis_bytecode::InstructionSet;
use parking_lot::RwLock;
use std::sync::Arc;

// =============================================================================
// Environment
// =============================================================================

/// Shared local-variable slots with an optional lexical parent.
pub struct Environment {
    slots: RwLock<Vec<Option<ObjectRef>>>,
    parent: Option<Arc<Environment>>,
}

impl Environment {
    /// Create an environment with `local_count` empty slots.
    pub fn new(local_count: usize, parent: Option<Arc<Environment>>) -> Arc<Environment> {
        Arc::new(Environment {
            slots: RwLock::new(vec![None; local_count]),
            parent,
        })
    }

    /// The lexically enclosing environment, present iff this environment
    /// belongs to a block frame.
    #[inline]
    pub fn parent(&self) -> Option<&Arc<Environment>> {
        self.parent.as_ref()
    }

    /// Number of local slots at this level.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    fn at_depth(&self, depth: usize) -> Option<&Environment> {
        let mut env = self;
        for _ in 0..depth {
            env = env.parent.as_deref()?;
        }
        Some(env)
    }

    /// Read the local at `index`, `depth` levels up the parent chain.
    /// Unset locals read as `None`.
    pub fn get(&self, depth: usize, index: usize) -> Option<ObjectRef> {
        let env = self.at_depth(depth)?;
        let slots = env.slots.read();
        slots.get(index).cloned().flatten()
    }

    /// Write the local at `index`, `depth` levels up the parent chain.
    /// Returns false when the slot does not exist.
    pub fn set(&self, depth: usize, index: usize, value: ObjectRef) -> bool {
        let Some(env) = self.at_depth(depth) else {
            return false;
        };
        let mut slots = env.slots.write();
        match slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("locals", &self.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

// =============================================================================
// CallFrame
// =============================================================================

/// The runtime record of one in-flight invocation.
pub struct CallFrame {
    /// The instruction set being executed.
    pub iset: Arc<InstructionSet>,
    /// Program counter: index of the next instruction.
    pub pc: usize,
    /// This frame's locals; chains to a captured environment iff this is
    /// a block frame.
    pub env: Arc<Environment>,
    /// `self` for the duration of the frame.
    pub self_obj: ObjectRef,
    /// Whether this frame executes a block body.
    pub is_block: bool,
    /// The block literal passed at the call site, available to
    /// `invoke_block` and to builtins.
    pub block: Option<BlockObject>,
    /// Source line of the instruction being executed.
    pub source_line: usize,
}

impl CallFrame {
    /// Frame for top-level program text or a class body.
    pub fn program(iset: Arc<InstructionSet>, self_obj: ObjectRef) -> CallFrame {
        let local_count = iset.local_count;
        CallFrame {
            iset,
            pc: 0,
            env: Environment::new(local_count, None),
            self_obj,
            is_block: false,
            block: None,
            source_line: 0,
        }
    }

    /// Frame for a method invocation; arguments occupy the first slots.
    pub fn method(
        iset: Arc<InstructionSet>,
        self_obj: ObjectRef,
        args: &[ObjectRef],
        block: Option<BlockObject>,
    ) -> CallFrame {
        let env = Environment::new(iset.local_count.max(args.len()), None);
        for (index, arg) in args.iter().enumerate() {
            env.set(0, index, arg.clone());
        }
        CallFrame {
            iset,
            pc: 0,
            env,
            self_obj,
            is_block: false,
            block,
            source_line: 0,
        }
    }

    /// Frame for a block invocation: the environment chains to the
    /// environment captured at the definition site.
    pub fn block(block: &BlockObject, args: &[ObjectRef]) -> CallFrame {
        let iset = block.iset.clone();
        let env = Environment::new(iset.local_count, Some(block.env.clone()));
        // Blocks bind leniently: extra arguments drop, missing ones stay nil.
        for (index, arg) in args.iter().take(iset.arg_count()).enumerate() {
            env.set(0, index, arg.clone());
        }
        CallFrame {
            iset,
            pc: 0,
            env,
            self_obj: block.self_obj.clone(),
            is_block: true,
            block: None,
            source_line: 0,
        }
    }

    /// Debugging projection of this frame.
    pub fn inspect(&self) -> String {
        match self.env.parent() {
            Some(parent) => format!(
                "Name: {}. is block: {}. ep: {}",
                self.iset.label.name,
                self.is_block,
                parent.len()
            ),
            None => format!("Name: {}. is block: {}", self.iset.label.name, self.is_block),
        }
    }
}

// =============================================================================
// CallFrameStack
// =============================================================================

/// The ordered sequence of active frames; the topmost is executing.
pub struct CallFrameStack {
    frames: Vec<CallFrame>,
    max_depth: usize,
}

impl CallFrameStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame. Exceeding the depth limit is fatal.
    pub fn push(&mut self, frame: CallFrame) -> VmResult<()> {
        if self.frames.len() == self.max_depth {
            return Err(VmError::FrameOverflow {
                limit: self.max_depth,
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the executing frame. Popping while empty is fatal.
    pub fn pop(&mut self) -> VmResult<CallFrame> {
        self.frames.pop().ok_or(VmError::FrameUnderflow)
    }

    /// The executing frame.
    #[inline]
    pub fn top(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut CallFrame> {
        self.frames.last_mut()
    }

    /// Number of active frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The nearest non-block frame from the top: the frame whose block
    /// argument `invoke_block` targets.
    pub fn nearest_method_frame(&self) -> Option<&CallFrame> {
        self.frames.iter().rev().find(|frame| !frame.is_block)
    }

    /// Debugging projection: one line per frame, outermost first.
    pub fn inspect(&self) -> String {
        let mut out = String::new();
        for frame in &self.frames {
            out.push_str(&frame.inspect());
            out.push('\n');
        }
        out
    }
}
