//! Per-thread execution state.
//!
//! A thread owns its operand stack, its call-frame stack, the source-line
//! cursor, and a pending-error cell. The VM state behind it (class
//! registry, intern table, singletons) is shared; per-thread stacks never
//! are. Cancellation is observed between instructions only.

use crate::class::ClassRef;
use crate::error::{VmError, VmResult};
use crate::frame::CallFrameStack;
use crate::interpreter;
use crate::object::block::BlockObject;
use crate::object::error_obj::ErrorObject;
use crate::object::{Object, ObjectKind, ObjectRef};
use crate::stack::OperandStack;
use crate::vm::VmState;
use lapis_bytecode::InstructionSet;
use lapis_core::{errors, ErrorKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One sequential interpreter over shared VM state.
pub struct Thread {
    vm: Arc<VmState>,
    pub(crate) stack: OperandStack,
    pub(crate) frames: CallFrameStack,
    source_line: usize,
    pending_error: Option<ObjectRef>,
    fatal: Option<VmError>,
    cancel: Arc<AtomicBool>,
}

impl Thread {
    pub(crate) fn new(vm: Arc<VmState>) -> Thread {
        let stack = OperandStack::with_capacity(vm.config().stack_capacity);
        let frames = CallFrameStack::new(vm.config().max_frames);
        Thread {
            vm,
            stack,
            frames,
            source_line: 0,
            pending_error: None,
            fatal: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The shared VM state this thread executes against.
    #[inline]
    pub fn vm(&self) -> &Arc<VmState> {
        &self.vm
    }

    /// Current source line, updated per dispatched instruction.
    #[inline]
    pub fn source_line(&self) -> usize {
        self.source_line
    }

    #[inline]
    pub(crate) fn set_source_line(&mut self, line: usize) {
        self.source_line = line;
    }

    /// Handle the embedder can flip to cancel this thread between
    /// instructions.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    #[inline]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    // =========================================================================
    // Execution entry points
    // =========================================================================

    /// Execute a root instruction set to completion and return the value
    /// its terminal `leave` produced.
    pub fn run_instruction_set(&mut self, iset: Arc<InstructionSet>) -> VmResult<ObjectRef> {
        interpreter::run_root(self, iset)
    }

    /// Invoke `block` with `args` and run it to completion. A fault inside
    /// the block comes back as an error object, ready to propagate from
    /// the calling builtin.
    pub fn yield_block(&mut self, block: &BlockObject, args: &[ObjectRef]) -> VmResult<ObjectRef> {
        interpreter::invoke_block(self, block, args)
    }

    /// Dispatch `name` on `receiver` the way a `send` instruction would,
    /// running any bytecode body to completion.
    pub fn call_method(
        &mut self,
        receiver: &ObjectRef,
        name: &str,
        args: &[ObjectRef],
        block: Option<&BlockObject>,
    ) -> VmResult<ObjectRef> {
        interpreter::call_method(self, receiver, name, args, block)
    }

    // =========================================================================
    // Error channel
    // =========================================================================

    /// Set the pending-error cell; the interpreter unwinds at the next
    /// step boundary.
    pub fn throw(&mut self, error: ObjectRef) {
        self.pending_error = Some(error);
    }

    pub(crate) fn take_pending_error(&mut self) -> Option<ObjectRef> {
        self.pending_error.take()
    }

    /// Record a fatal machine fault discovered inside a builtin and return
    /// an InternalError object for the builtin to yield. The interpreter
    /// aborts on the recorded fault before the object can be observed.
    pub fn fatal_error(&mut self, fault: VmError) -> ObjectRef {
        let message = fault.to_string();
        self.fatal = Some(fault);
        self.init_error_object(ErrorKind::InternalError, self.source_line, message)
    }

    pub(crate) fn take_fatal(&mut self) -> Option<VmError> {
        self.fatal.take()
    }

    // =========================================================================
    // Error-object factory
    // =========================================================================

    /// Construct an error object of `kind` with a formatted message and
    /// the originating source line.
    pub fn init_error_object(
        &self,
        kind: ErrorKind,
        source_line: usize,
        message: impl Into<String>,
    ) -> ObjectRef {
        self.vm.init_error(kind, source_line, message.into())
    }

    /// TypeError with the expected-type tag and received class name.
    pub fn wrong_type_error(&self, source_line: usize, expected: &str, got: &str) -> ObjectRef {
        self.init_error_object(
            ErrorKind::TypeError,
            source_line,
            errors::wrong_argument_type(expected, got),
        )
    }

    /// ArgumentError for an exact-arity mismatch.
    pub fn arity_error(&self, source_line: usize, expected: usize, got: usize) -> ObjectRef {
        self.init_error_object(
            ErrorKind::ArgumentError,
            source_line,
            errors::wrong_number_of_arguments(expected, got),
        )
    }

    /// ArgumentError for an arity mismatch against an inclusive range.
    pub fn arity_range_error(
        &self,
        source_line: usize,
        min: usize,
        max: usize,
        got: usize,
    ) -> ObjectRef {
        self.init_error_object(
            ErrorKind::ArgumentError,
            source_line,
            errors::wrong_number_of_arguments_range(min, max, got),
        )
    }

    /// NoMethodError naming the receiver's class.
    pub fn no_method_error(&self, source_line: usize, name: &str, receiver: &ObjectRef) -> ObjectRef {
        let class_name = match receiver.as_class() {
            Some(class) => class.name().to_string(),
            None => receiver.class_name().to_string(),
        };
        self.init_error_object(
            ErrorKind::NoMethodError,
            source_line,
            errors::undefined_method(name, &class_name),
        )
    }

    /// ZeroDivisionError.
    pub fn zero_division_error(&self, source_line: usize) -> ObjectRef {
        self.init_error_object(ErrorKind::ZeroDivisionError, source_line, errors::DIVIDED_BY_ZERO)
    }

    // =========================================================================
    // Object construction conveniences
    // =========================================================================

    pub fn integer(&self, value: i64) -> ObjectRef {
        self.vm.init_integer(value)
    }

    /// An integer carrying the conversion subflag, as produced by
    /// `to_i`/`ceil`/`floor`.
    pub fn integer_converted(&self, value: i64) -> ObjectRef {
        self.vm.init_integer_converted(value)
    }

    pub fn float(&self, value: f64) -> ObjectRef {
        self.vm.init_float(value)
    }

    pub fn decimal(&self, value: lapis_core::Rational) -> ObjectRef {
        self.vm.init_decimal(value)
    }

    pub fn string(&self, value: impl Into<String>) -> ObjectRef {
        self.vm.init_string(value.into())
    }

    /// The canonical true or false object.
    pub fn boolean(&self, value: bool) -> ObjectRef {
        self.vm.boolean(value)
    }

    /// The canonical nil object.
    pub fn null(&self) -> ObjectRef {
        self.vm.null()
    }

    pub fn array(&self, elements: Vec<ObjectRef>) -> ObjectRef {
        self.vm.init_array(elements)
    }

    pub fn range(&self, start: i64, end: i64) -> ObjectRef {
        self.vm.init_range(start, end)
    }

    /// Wrap a class as an object.
    pub fn class_object(&self, class: &ClassRef) -> ObjectRef {
        self.vm.class_object(class)
    }

    /// Wrap a block payload as an object.
    pub fn block_object(&self, block: BlockObject) -> ObjectRef {
        Arc::new(Object::new(self.vm.block_class(), ObjectKind::Block(block)))
    }

    /// Call-frame depth; zero when idle.
    pub fn frame_depth(&self) -> usize {
        self.frames.depth()
    }

    /// Operand-stack pointer; zero when idle.
    pub fn stack_pointer(&self) -> usize {
        self.stack.sp()
    }

    /// Snapshot projections for debugging.
    pub fn inspect_stack(&self) -> String {
        self.stack.inspect()
    }

    pub fn inspect_frames(&self) -> String {
        self.frames.inspect()
    }

    /// Errors wrap into [`ErrorObject`] copies when surfacing to the
    /// embedder.
    pub(crate) fn uncaught(error: &ObjectRef) -> VmError {
        match error.as_error() {
            Some(payload) => VmError::Uncaught(payload.clone()),
            None => VmError::Uncaught(ErrorObject::new(
                ErrorKind::InternalError,
                0,
                "raised a non-error object",
            )),
        }
    }
}
