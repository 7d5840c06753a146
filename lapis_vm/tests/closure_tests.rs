//! Blocks, yields, and environment capture.

use lapis_bytecode::{Action, InstructionSetBuilder, Operand};
use lapis_vm::VirtualMachine;

fn send(method: &str, argc: i64) -> [Operand; 2] {
    [Operand::Str(method.into()), Operand::Integer(argc)]
}

fn send_with_block(method: &str, argc: i64, block: std::sync::Arc<lapis_bytecode::InstructionSet>) -> [Operand; 3] {
    [
        Operand::Str(method.into()),
        Operand::Integer(argc),
        Operand::Set(block),
    ]
}

#[test]
fn test_yield_passes_arguments_to_the_block() {
    // def apply; yield(10); end; apply { |x| x + 5 }
    let apply = InstructionSetBuilder::method("apply")
        .emit(Action::PutObject, [Operand::Integer(10)], 1)
        .emit(Action::InvokeBlock, [Operand::Integer(1)], 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();
    let block = InstructionSetBuilder::block("block")
        .parameters(&["x"])
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 2)
        .emit(Action::PutObject, [Operand::Integer(5)], 2)
        .emit(Action::Send, send("+", 1), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    let program = InstructionSetBuilder::program("main")
        .emit(
            Action::DefMethod,
            [Operand::Str("apply".into()), Operand::Set(apply)],
            1,
        )
        .emit(Action::Pop, [], 1)
        .emit(Action::PutSelf, [], 2)
        .emit(Action::Send, send_with_block("apply", 0, block), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(15));
}

#[test]
fn test_integer_times_accumulates_through_captured_local() {
    // sum = 0; 4.times { |i| sum = sum + i }; sum
    let block = InstructionSetBuilder::block("block")
        .parameters(&["i"])
        .emit(Action::GetLocal, [Operand::Integer(1), Operand::Integer(0)], 2)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 2)
        .emit(Action::Send, send("+", 1), 2)
        .emit(Action::SetLocal, [Operand::Integer(1), Operand::Integer(0)], 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    let program = InstructionSetBuilder::program("main")
        .locals(1)
        .emit(Action::PutObject, [Operand::Integer(0)], 1)
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(0)], 1)
        .emit(Action::Pop, [], 1)
        .emit(Action::PutObject, [Operand::Integer(4)], 2)
        .emit(Action::Send, send_with_block("times", 0, block), 2)
        .emit(Action::Pop, [], 2)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 3)
        .emit(Action::Leave, [], 3)
        .finish()
        .unwrap();

    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(6));
}

#[test]
fn test_array_each_visits_every_element() {
    // sum = 0; [1, 2, 3].each { |e| sum = sum + e }; sum
    let block = InstructionSetBuilder::block("block")
        .parameters(&["e"])
        .emit(Action::GetLocal, [Operand::Integer(1), Operand::Integer(0)], 2)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 2)
        .emit(Action::Send, send("+", 1), 2)
        .emit(Action::SetLocal, [Operand::Integer(1), Operand::Integer(0)], 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    let program = InstructionSetBuilder::program("main")
        .locals(1)
        .emit(Action::PutObject, [Operand::Integer(0)], 1)
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(0)], 1)
        .emit(Action::Pop, [], 1)
        .emit(Action::PutObject, [Operand::Integer(1)], 2)
        .emit(Action::PutObject, [Operand::Integer(2)], 2)
        .emit(Action::PutObject, [Operand::Integer(3)], 2)
        .emit(Action::NewArray, [Operand::Integer(3)], 2)
        .emit(Action::Send, send_with_block("each", 0, block), 2)
        .emit(Action::Pop, [], 2)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 3)
        .emit(Action::Leave, [], 3)
        .finish()
        .unwrap();

    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(6));
}

#[test]
fn test_block_keeps_captured_locals_alive_after_frame_returns() {
    // def make_counter
    //   count = 0
    //   Block.new { count = count + 1 }
    // end
    // counter = make_counter; counter.call; counter.call
    let block = InstructionSetBuilder::block("block")
        .emit(Action::GetLocal, [Operand::Integer(1), Operand::Integer(0)], 3)
        .emit(Action::PutObject, [Operand::Integer(1)], 3)
        .emit(Action::Send, send("+", 1), 3)
        .emit(Action::SetLocal, [Operand::Integer(1), Operand::Integer(0)], 3)
        .emit(Action::Leave, [], 3)
        .finish()
        .unwrap();

    let make_counter = InstructionSetBuilder::method("make_counter")
        .locals(1)
        .emit(Action::PutObject, [Operand::Integer(0)], 2)
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(0)], 2)
        .emit(Action::Pop, [], 2)
        .emit(Action::GetConstant, [Operand::Str("Block".into())], 3)
        .emit(Action::Send, send_with_block("new", 0, block), 3)
        .emit(Action::Leave, [], 3)
        .finish()
        .unwrap();

    let program = InstructionSetBuilder::program("main")
        .locals(1)
        .emit(
            Action::DefMethod,
            [Operand::Str("make_counter".into()), Operand::Set(make_counter)],
            1,
        )
        .emit(Action::Pop, [], 1)
        .emit(Action::PutSelf, [], 5)
        .emit(Action::Send, send("make_counter", 0), 5)
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(0)], 5)
        .emit(Action::Pop, [], 5)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 6)
        .emit(Action::Send, send("call", 0), 6)
        .emit(Action::Pop, [], 6)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 7)
        .emit(Action::Send, send("call", 0), 7)
        .emit(Action::Leave, [], 7)
        .finish()
        .unwrap();

    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_integer(), Some(2));
}

#[test]
fn test_yield_without_a_block_is_reported() {
    let apply = InstructionSetBuilder::method("apply")
        .emit(Action::InvokeBlock, [Operand::Integer(0)], 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();
    let program = InstructionSetBuilder::program("main")
        .emit(
            Action::DefMethod,
            [Operand::Str("apply".into()), Operand::Set(apply)],
            1,
        )
        .emit(Action::Pop, [], 1)
        .emit(Action::PutSelf, [], 2)
        .emit(Action::Send, send("apply", 0), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    match VirtualMachine::new().execute(program) {
        Err(lapis_vm::VmError::Uncaught(error)) => {
            assert_eq!(error.kind, lapis_core::ErrorKind::InternalError);
            assert_eq!(error.message, "can't yield without a block");
        }
        other => panic!("expected an uncaught error, got {other:?}"),
    }
}

#[test]
fn test_error_raised_inside_a_block_propagates_out_of_the_iterator() {
    // 3.times { 1 / 0 } surfaces the ZeroDivisionError from inside each.
    let block = InstructionSetBuilder::block("block")
        .parameters(&["i"])
        .emit(Action::PutObject, [Operand::Integer(1)], 2)
        .emit(Action::PutObject, [Operand::Integer(0)], 2)
        .emit(Action::Send, send("/", 1), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();
    let program = InstructionSetBuilder::program("main")
        .emit(Action::PutObject, [Operand::Integer(3)], 1)
        .emit(Action::Send, send_with_block("times", 0, block), 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();

    match VirtualMachine::new().execute(program) {
        Err(lapis_vm::VmError::Uncaught(error)) => {
            assert_eq!(error.kind, lapis_core::ErrorKind::ZeroDivisionError);
            assert_eq!(error.source_line, 2);
        }
        other => panic!("expected ZeroDivisionError, got {other:?}"),
    }
}
