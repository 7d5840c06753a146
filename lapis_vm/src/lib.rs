//! The Lapis virtual machine.
//!
//! A stack-based bytecode interpreter for a dynamically-typed, class-based
//! language. The compiler (external) hands the VM a tree of labelled
//! instruction sets; the VM interprets them against a polymorphic object
//! model with a class registry and declaratively installed built-in
//! methods.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    VirtualMachine                     │
//! │  ┌────────────────┐  ┌─────────────────────────────┐  │
//! │  │ ClassRegistry  │  │ Interner / singletons / main │  │
//! │  └────────────────┘  └─────────────────────────────┘  │
//! └───────────────┬──────────────────────┬───────────────┘
//!                 │ shared (Arc)         │
//!     ┌───────────┴──────────┐ ┌─────────┴────────────┐
//!     │       Thread 0       │ │       Thread N        │
//!     │ ┌──────────────────┐ │ │                       │
//!     │ │  OperandStack sp │ │ │  (own stacks, shared  │
//!     │ ├──────────────────┤ │ │   registry)           │
//!     │ │  CallFrameStack  │ │ │                       │
//!     │ └──────────────────┘ │ │                       │
//!     └──────────────────────┘ └───────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use lapis_bytecode::{Action, InstructionSetBuilder, Operand};
//! use lapis_vm::VirtualMachine;
//!
//! let program = InstructionSetBuilder::program("main")
//!     .emit(Action::PutObject, [Operand::Float(1.1)], 1)
//!     .emit(Action::PutObject, [Operand::Integer(2)], 1)
//!     .emit(Action::Send, [Operand::Str("+".into()), Operand::Integer(1)], 1)
//!     .emit(Action::Leave, [], 1)
//!     .finish()
//!     .unwrap();
//!
//! let vm = VirtualMachine::new();
//! let result = vm.execute(program).unwrap();
//! assert_eq!(result.as_float(), Some(3.1));
//! ```

mod builtins;
mod interpreter;
mod ops;

pub mod class;
pub mod config;
pub mod error;
pub mod frame;
pub mod object;
pub mod registry;
pub mod stack;
pub mod thread;
pub mod vm;

pub use class::{BuiltinFn, BuiltinMethod, ClassRef, MethodEntry, RClass};
pub use config::VmConfig;
pub use error::{VmError, VmResult};
pub use frame::{CallFrame, CallFrameStack, Environment};
pub use object::block::BlockObject;
pub use object::error_obj::ErrorObject;
pub use object::numeric::{DecimalObject, FloatObject, IntegerObject, Numeric};
pub use object::{Object, ObjectFlags, ObjectKind, ObjectRef};
pub use registry::ClassRegistry;
pub use stack::OperandStack;
pub use thread::Thread;
pub use vm::{VirtualMachine, VmState};

/// Convenience: run one instruction set on a fresh default VM.
pub fn run(
    iset: std::sync::Arc<lapis_bytecode::InstructionSet>,
) -> VmResult<ObjectRef> {
    let vm = VirtualMachine::new();
    vm.execute(iset)
}
