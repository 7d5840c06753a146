//! The embedding surface: threads, cancellation, teardown, configuration.

use lapis_bytecode::{Action, InstructionSetBuilder, Operand};
use lapis_core::ErrorKind;
use lapis_vm::{VirtualMachine, VmConfig, VmError};

fn send(method: &str, argc: i64) -> [Operand; 2] {
    [Operand::Str(method.into()), Operand::Integer(argc)]
}

#[test]
fn test_top_level_binding_is_self_for_programs() {
    let program = InstructionSetBuilder::program("main")
        .emit(Action::PutSelf, [], 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();

    let vm = VirtualMachine::new();
    let result = vm.execute(program).unwrap();
    assert!(std::sync::Arc::ptr_eq(&result, &vm.top_level_binding()));
    assert_eq!(result.class_name(), "Object");
}

#[test]
fn test_threads_share_classes_but_not_stacks() {
    let define = InstructionSetBuilder::program("define")
        .emit(
            Action::DefClass,
            [
                Operand::Str("Shared".into()),
                Operand::Set(
                    InstructionSetBuilder::program("Shared")
                        .emit(Action::PutNull, [], 1)
                        .emit(Action::Leave, [], 1)
                        .finish()
                        .unwrap(),
                ),
            ],
            1,
        )
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();

    let use_it = InstructionSetBuilder::program("use")
        .emit(Action::GetConstant, [Operand::Str("Shared".into())], 2)
        .emit(Action::Send, send("name", 0), 2)
        .emit(Action::Leave, [], 2)
        .finish()
        .unwrap();

    let vm = VirtualMachine::new();
    let mut first = vm.spawn_thread();
    first.run_instruction_set(define).unwrap();

    // A different thread sees the class published by the first.
    let mut second = vm.spawn_thread();
    let result = second.run_instruction_set(use_it).unwrap();
    assert_eq!(result.as_str(), Some("Shared"));
    assert_eq!(first.frame_depth(), 0);
    assert_eq!(second.frame_depth(), 0);
}

#[test]
fn test_cancellation_stops_a_spinning_thread() {
    let mut builder = InstructionSetBuilder::program("spin");
    let top = builder.jump_label();
    let program = builder
        .bind(top)
        .emit_jump(Action::Jump, top, 1)
        .finish()
        .unwrap();

    let vm = VirtualMachine::new();
    let mut thread = vm.spawn_thread();
    let cancel = thread.cancel_handle();

    let worker = std::thread::spawn(move || thread.run_instruction_set(program));
    std::thread::sleep(std::time::Duration::from_millis(20));
    cancel.store(true, std::sync::atomic::Ordering::Relaxed);

    match worker.join().unwrap() {
        Err(VmError::Cancelled) => {}
        other => panic!("expected cancellation, got {other:?}"),
    }
}

#[test]
fn test_uncaught_errors_surface_with_context() {
    let program = InstructionSetBuilder::program("main")
        .emit(Action::PutObject, [Operand::Float(7.5)], 3)
        .emit(Action::PutObject, [Operand::Integer(0)], 3)
        .emit(Action::Send, send("/", 1), 3)
        .emit(Action::Leave, [], 3)
        .finish()
        .unwrap();

    let error = VirtualMachine::new().execute(program).unwrap_err();
    assert_eq!(
        error.to_string(),
        "ZeroDivisionError: Divided by 0 (line 3)"
    );
}

#[test]
fn test_ptr_is_gated_behind_unsafe_ffi() {
    let program = || {
        InstructionSetBuilder::program("main")
            .emit(Action::PutObject, [Operand::Float(1.5)], 1)
            .emit(Action::Send, send("ptr", 0), 1)
            .emit(Action::Leave, [], 1)
            .finish()
            .unwrap()
    };

    // Off by default: an ordinary NoMethodError.
    match VirtualMachine::new().execute(program()) {
        Err(VmError::Uncaught(error)) => assert_eq!(error.kind, ErrorKind::NoMethodError),
        other => panic!("expected NoMethodError, got {other:?}"),
    }

    // Opted in: an Opaque object carrying a nonzero address.
    let config = VmConfig {
        unsafe_ffi: true,
        ..VmConfig::default()
    };
    let result = VirtualMachine::with_config(config).execute(program()).unwrap();
    assert_eq!(result.class_name(), "Opaque");
    assert!(result.inspect().starts_with("#<Opaque 0x"));
}

#[test]
fn test_to_json_projects_object_graphs() {
    let program = InstructionSetBuilder::program("main")
        .emit(Action::PutObject, [Operand::Str("label".into())], 1)
        .emit(Action::PutObject, [Operand::Integer(1)], 1)
        .emit(Action::PutObject, [Operand::Float(2.5)], 1)
        .emit(Action::NewArray, [Operand::Integer(2)], 1)
        .emit(Action::NewHash, [Operand::Integer(1)], 1)
        .emit(Action::Send, send("to_json", 0), 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();

    let result = VirtualMachine::new().execute(program).unwrap();
    assert_eq!(result.as_str(), Some(r#"{"label":[1,2.5]}"#));
}

#[test]
fn test_stack_inspection_marks_the_cursor() {
    let vm = VirtualMachine::new();
    let thread = vm.spawn_thread();
    let projection = thread.inspect_stack();
    assert!(projection.contains("<----"));
}

#[test]
fn test_teardown_releases_vm_references() {
    let program = InstructionSetBuilder::program("main")
        .emit(Action::PutObject, [Operand::Integer(42)], 1)
        .emit(Action::Leave, [], 1)
        .finish()
        .unwrap();

    let vm = VirtualMachine::new();
    let result = vm.execute(program).unwrap();
    vm.teardown();
    // Objects the embedder retains stay usable after teardown.
    assert_eq!(result.as_integer(), Some(42));
    assert_eq!(result.class_name(), "Integer");
}
