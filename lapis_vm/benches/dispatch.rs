//! Dispatch-loop benchmark: a counted sum loop through the interpreter.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lapis_bytecode::{Action, InstructionSet, InstructionSetBuilder, Operand};
use lapis_vm::VirtualMachine;
use std::sync::Arc;

fn sum_loop(iterations: i64) -> Arc<InstructionSet> {
    let mut builder = InstructionSetBuilder::program("sum_loop").locals(2);
    let top = builder.jump_label();
    let done = builder.jump_label();
    builder
        .emit(Action::PutObject, [Operand::Integer(0)], 1)
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(0)], 1)
        .emit(Action::Pop, [], 1)
        .emit(Action::PutObject, [Operand::Integer(0)], 2)
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(1)], 2)
        .emit(Action::Pop, [], 2)
        .bind(top)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(1)], 3)
        .emit(Action::PutObject, [Operand::Integer(iterations)], 3)
        .emit(
            Action::Send,
            [Operand::Str("<".into()), Operand::Integer(1)],
            3,
        )
        .emit_jump(Action::BranchUnless, done, 3)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 4)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(1)], 4)
        .emit(
            Action::Send,
            [Operand::Str("+".into()), Operand::Integer(1)],
            4,
        )
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(0)], 4)
        .emit(Action::Pop, [], 4)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(1)], 5)
        .emit(Action::PutObject, [Operand::Integer(1)], 5)
        .emit(
            Action::Send,
            [Operand::Str("+".into()), Operand::Integer(1)],
            5,
        )
        .emit(Action::SetLocal, [Operand::Integer(0), Operand::Integer(1)], 5)
        .emit(Action::Pop, [], 5)
        .emit_jump(Action::Jump, top, 5)
        .bind(done)
        .emit(Action::GetLocal, [Operand::Integer(0), Operand::Integer(0)], 6)
        .emit(Action::Leave, [], 6)
        .finish()
        .unwrap()
}

fn bench_dispatch(c: &mut Criterion) {
    let program = sum_loop(1_000);
    let vm = VirtualMachine::new();
    c.bench_function("interpret_sum_loop_1k", |b| {
        b.iter(|| black_box(vm.execute(program.clone()).unwrap()))
    });
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
