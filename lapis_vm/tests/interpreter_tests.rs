//! Control flow, locals, constants, definitions, and dispatch through the
//! interpreter loop.

use lapis_bytecode::{Action, InstructionSetBuilder, Operand};
use lapis_core::ErrorKind;
use lapis_vm::{VirtualMachine, VmError};
use std::sync::Arc;

fn send(method: &str, argc: i64) -> [Operand; 2] {
    [Operand::Str(method.into()), Operand::Integer(argc)]
}

#[test]
fn test_branching_picks_the_truthy_arm() {
    let mut builder = InstructionSetBuilder::program("main");
    let else_arm = builder.jump_label();
    let done = builder.jump_label();
    let program = builder
        .emit(Action::PutObject, [Operand::Boolean(false)], 1)
        .emit_jump(Action::BranchUnless, else_arm, 1)
        .emit(Action::PutObject, [Operand::Str("then".into())], 2)
        .emit_jump(Action::Jump, done, 2)
        .bind(else_arm)
        .emit(Action::PutObject, [Operand::Str("else".into())], 3)
        .bind(done)
        .emit(Action::Leave, [], 4)
        .finish()
        .unwrap();

    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_str(), Some("else"));
}

#[test]
fn test_locals_read_and_write() {
    let program = InstructionSetBuilder::program("main")
        .locals(1)
        .emit(Action::PutObject, [Operand::Integer(41)], 1)
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(0)], 1)
        .emit(Action::Pop, [], 1)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 2)
        .emit(Action::PutObject, [Operand::Integer(1)], 2)
        .emit(Action::Send, send("+", 1), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(42));
}

#[test]
fn test_unset_locals_read_as_nil() {
    let program = InstructionSetBuilder::program("main")
        .locals(1)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 1)
        .emit(Action::Send, send("nil?", 0), 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();

    assert!(VirtualMachine::new().execute(program).unwrap().is_truthy());
}

#[test]
fn test_defined_method_dispatches_with_arguments() {
    let double = InstructionSetBuilder::method("double")
        .parameters(&["value"])
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 1)
        .emit(Action::PutObject, [Operand::Integer(2)], 1)
        .emit(Action::Send, send("*", 1), 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();

    let program = InstructionSetBuilder::program("main")
        .emit(
            Action::DefMethod,
            [Operand::Str("double".into()), Operand::Set(double)],
            1,
        )
        .emit(Action::Pop, [], 1)
        .emit(Action::PutSelf, [], 2)
        .emit(Action::PutObject, [Operand::Integer(21)], 2)
        .emit(Action::Send, send("double", 1), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(42));
}

#[test]
fn test_defined_method_arity_is_exact() {
    let noop = InstructionSetBuilder::method("noop")
        .parameters(&["a"])
        .emit(Action::PutNull, [], 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();

    let program = InstructionSetBuilder::program("main")
        .emit(
            Action::DefMethod,
            [Operand::Str("noop".into()), Operand::Set(noop)],
            1,
        )
        .emit(Action::Pop, [], 1)
        .emit(Action::PutSelf, [], 3)
        .emit(Action::Send, send("noop", 0), 3)
        .emit(Action::Leave, [], 3)
        .finish()
        .unwrap();

    match VirtualMachine::new().execute(program) {
        Err(VmError::Uncaught(error)) => {
            assert_eq!(error.kind, ErrorKind::ArgumentError);
            assert_eq!(error.message, "Expect 1 argument(s). got=0");
            assert_eq!(error.source_line, 3);
        }
        other => panic!("expected arity error, got {other:?}"),
    }
}

#[test]
fn test_class_definition_with_state_and_methods() {
    let initialize = InstructionSetBuilder::method("initialize")
        .emit(Action::PutObject, [Operand::Integer(0)], 2)
        .emit(
            Action::SetInstanceVariable,
            [Operand::Str("@count".into())],
            2,
        )
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    let increment = InstructionSetBuilder::method("increment")
        .emit(
            Action::GetInstanceVariable,
            [Operand::Str("@count".into())],
            3,
        )
        .emit(Action::PutObject, [Operand::Integer(1)], 3)
        .emit(Action::Send, send("+", 1), 3)
        .emit(
            Action::SetInstanceVariable,
            [Operand::Str("@count".into())],
            3,
        )
        .emit(Action::Leave, [], 3)
        .finish()
        .unwrap();

    let body = InstructionSetBuilder::program("Counter")
        .emit(
            Action::DefMethod,
            [Operand::Str("initialize".into()), Operand::Set(initialize)],
            2,
        )
        .emit(Action::Pop, [], 2)
        .emit(
            Action::DefMethod,
            [Operand::Str("increment".into()), Operand::Set(increment)],
            3,
        )
        .emit(Action::Leave, [], 4)
        .finish()
        .unwrap();

    let program = InstructionSetBuilder::program("main")
        .locals(1)
        .emit(
            Action::DefClass,
            [Operand::Str("Counter".into()), Operand::Set(body)],
            1,
        )
        .emit(Action::Pop, [], 1)
        .emit(Action::GetConstant, [Operand::Str("Counter".into())], 5)
        .emit(Action::Send, send("new", 0), 5)
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(0)], 5)
        .emit(Action::Pop, [], 5)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 6)
        .emit(Action::Send, send("increment", 0), 6)
        .emit(Action::Pop, [], 6)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 7)
        .emit(Action::Send, send("increment", 0), 7)
        .emit(Action::Leave, [], 7)
        .finish()
        .unwrap();

    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(2));
}

#[test]
fn test_class_reopening_is_idempotent() {
    let empty_body = || {
        InstructionSetBuilder::program("Widget")
            .emit(Action::PutNull, [], 1)
            .emit(Action::Leave, [], 1)
            .finish()
            .unwrap()
    };
    let program = InstructionSetBuilder::program("main")
        .emit(
            Action::DefClass,
            [Operand::Str("Widget".into()), Operand::Set(empty_body())],
            1,
        )
        .emit(Action::Pop, [], 1)
        .emit(
            Action::DefClass,
            [Operand::Str("Widget".into()), Operand::Set(empty_body())],
            2,
        )
        .emit(Action::Send, send("name", 0), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_str(), Some("Widget"));
}

#[test]
fn test_missing_constant_is_a_name_error() {
    let program = InstructionSetBuilder::program("main")
        .emit(Action::GetConstant, [Operand::Str("Ghost".into())], 9)
        .emit(Action::Leave, [], 9)
        .finish()
        .unwrap();

    match VirtualMachine::new().execute(program) {
        Err(VmError::Uncaught(error)) => {
            assert_eq!(error.kind, ErrorKind::NameError);
            assert_eq!(error.message, "Uninitialized constant Ghost");
            assert_eq!(error.source_line, 9);
        }
        other => panic!("expected NameError, got {other:?}"),
    }
}

#[test]
fn test_missing_method_names_the_receiver_class() {
    let program = InstructionSetBuilder::program("main")
        .emit(Action::PutObject, [Operand::Integer(1)], 4)
        .emit(Action::Send, send("frobnicate", 0), 4)
        .emit(Action::Leave, [], 4)
        .finish()
        .unwrap();

    match VirtualMachine::new().execute(program) {
        Err(VmError::Uncaught(error)) => {
            assert_eq!(error.kind, ErrorKind::NoMethodError);
            assert_eq!(error.message, "Undefined Method 'frobnicate' for Integer");
        }
        other => panic!("expected NoMethodError, got {other:?}"),
    }
}

#[test]
fn test_container_literals() {
    let program = InstructionSetBuilder::program("main")
        .emit(Action::PutObject, [Operand::Integer(1)], 1)
        .emit(Action::PutObject, [Operand::Integer(2)], 1)
        .emit(Action::PutObject, [Operand::Integer(3)], 1)
        .emit(Action::NewArray, [Operand::Integer(3)], 1)
        .emit(Action::Send, send("length", 0), 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();
    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(3));

    let program = InstructionSetBuilder::program("main")
        .emit(Action::PutObject, [Operand::Str("answer".into())], 1)
        .emit(Action::PutObject, [Operand::Integer(42)], 1)
        .emit(Action::NewHash, [Operand::Integer(1)], 1)
        .emit(Action::PutObject, [Operand::Str("answer".into())], 2)
        .emit(Action::Send, send("[]", 1), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();
    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(42));

    let program = InstructionSetBuilder::program("main")
        .emit(Action::PutObject, [Operand::Integer(1)], 1)
        .emit(Action::PutObject, [Operand::Integer(5)], 1)
        .emit(Action::NewRange, [], 1)
        .emit(Action::Send, send("length", 0), 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();
    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(5));
}

#[test]
fn test_array_negative_indexing_and_growth() {
    let program = InstructionSetBuilder::program("main")
        .locals(1)
        .emit(Action::PutObject, [Operand::Integer(10)], 1)
        .emit(Action::PutObject, [Operand::Integer(20)], 1)
        .emit(Action::NewArray, [Operand::Integer(2)], 1)
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(0)], 1)
        .emit(Action::Pop, [], 1)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 2)
        .emit(Action::PutObject, [Operand::Integer(-1)], 2)
        .emit(Action::Send, send("[]", 1), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();
    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(20));
}

#[test]
fn test_frame_and_stack_balance_after_execution() {
    let double = InstructionSetBuilder::method("double")
        .parameters(&["value"])
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 1)
        .emit(Action::Send, send("to_s", 0), 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();
    let program = InstructionSetBuilder::program("main")
        .emit(
            Action::DefMethod,
            [Operand::Str("double".into()), Operand::Set(double)],
            1,
        )
        .emit(Action::Pop, [], 1)
        .emit(Action::PutSelf, [], 2)
        .emit(Action::PutObject, [Operand::Integer(5)], 2)
        .emit(Action::Send, send("double", 1), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    let vm = VirtualMachine::new();
    let mut thread = vm.spawn_thread();
    let result = thread.run_instruction_set(program).unwrap();
    assert_eq!(result.as_str(), Some("5"));
    assert_eq!(thread.frame_depth(), 0);
    assert_eq!(thread.stack_pointer(), 0);
}

#[test]
fn test_instruction_set_operand_appears_in_inspection() {
    let body = InstructionSetBuilder::method("noop")
        .emit(Action::PutNull, [], 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();
    let program = InstructionSetBuilder::program("main")
        .emit(
            Action::DefMethod,
            [Operand::Str("noop".into()), Operand::Set(Arc::clone(&body))],
            1,
        )
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();
    let projection = program.inspect();
    assert!(projection.starts_with("<main>\n"));
    assert!(projection.contains("def_method: noop, <noop>"));
}
