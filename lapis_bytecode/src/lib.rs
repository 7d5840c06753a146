//! Instruction model for the Lapis virtual machine.
//!
//! The compiler hands the VM an in-memory tree of labelled instruction
//! sets; this crate defines that tree. Key components:
//!
//! - [`Action`] - the closed catalogue of things an instruction can do
//! - [`Instruction`] - one action plus its operand sequence and source line
//! - [`InstructionSet`] - a labelled compilation unit (program, method
//!   body, or block body)
//! - [`InstructionSetBuilder`] - construction API with forward-jump
//!   patching, used by compilers, embedders, and tests
//!
//! The tree is the whole compiler contract: there is no binary bytecode
//! format. Operands are opaque to the container and interpreted by the
//! action's handler in the VM.

mod builder;
mod instruction;
mod instruction_set;

pub use builder::{BuilderError, InstructionSetBuilder, JumpLabel};
pub use instruction::{Action, Instruction, Operand};
pub use instruction_set::{InstructionSet, Label, SetKind};
