//! The virtual machine: shared state, bootstrap, and the embedding API.
//!
//! [`VmState`] is everything threads share: the class registry, the intern
//! table, canonical singletons, and the top-level `main` object. It is
//! built once at construction and read-mostly afterwards.
//! [`VirtualMachine`] is the embedder's handle.

use crate::builtins;
use crate::class::{ClassRef, RClass};
use crate::config::VmConfig;
use crate::error::VmResult;
use crate::object::error_obj::ErrorObject;
use crate::object::numeric::{DecimalObject, FloatObject, IntegerObject};
use crate::object::{Object, ObjectFlags, ObjectKind, ObjectRef, OpaqueObject, RangeObject};
use crate::registry::ClassRegistry;
use crate::thread::Thread;
use lapis_bytecode::InstructionSet;
use lapis_core::{classes, ErrorKind, Interner, Rational};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

// =============================================================================
// VmState
// =============================================================================

/// Process-wide state shared by every thread of one VM.
pub struct VmState {
    config: VmConfig,
    registry: ClassRegistry,
    interner: Interner,

    object_class: ClassRef,
    class_class: ClassRef,
    integer_class: ClassRef,
    float_class: ClassRef,
    decimal_class: ClassRef,
    string_class: ClassRef,
    boolean_class: ClassRef,
    null_class: ClassRef,
    array_class: ClassRef,
    hash_class: ClassRef,
    range_class: ClassRef,
    block_class: ClassRef,
    opaque_class: ClassRef,
    error_classes: FxHashMap<ErrorKind, ClassRef>,

    true_object: ObjectRef,
    false_object: ObjectRef,
    null_object: ObjectRef,
    main_object: ObjectRef,
}

impl VmState {
    fn bootstrap(config: VmConfig) -> Arc<VmState> {
        let registry = ClassRegistry::new();
        let interner = Interner::new();

        let object_class = registry.initialize_class(&interner, classes::OBJECT_CLASS);
        let class_class = registry.initialize_class(&interner, classes::CLASS_CLASS);
        let integer_class = registry.initialize_class(&interner, classes::INTEGER_CLASS);
        let float_class = registry.initialize_class(&interner, classes::FLOAT_CLASS);
        let decimal_class = registry.initialize_class(&interner, classes::DECIMAL_CLASS);
        let string_class = registry.initialize_class(&interner, classes::STRING_CLASS);
        let boolean_class = registry.initialize_class(&interner, classes::BOOLEAN_CLASS);
        let null_class = registry.initialize_class(&interner, classes::NULL_CLASS);
        let array_class = registry.initialize_class(&interner, classes::ARRAY_CLASS);
        let hash_class = registry.initialize_class(&interner, classes::HASH_CLASS);
        let range_class = registry.initialize_class(&interner, classes::RANGE_CLASS);
        let block_class = registry.initialize_class(&interner, classes::BLOCK_CLASS);
        let opaque_class = registry.initialize_class(&interner, classes::OPAQUE_CLASS);

        for class in [
            &class_class,
            &integer_class,
            &float_class,
            &decimal_class,
            &string_class,
            &boolean_class,
            &null_class,
            &array_class,
            &hash_class,
            &range_class,
            &block_class,
            &opaque_class,
        ] {
            class.set_superclass(object_class.clone());
        }

        let mut error_classes = FxHashMap::default();
        for kind in ErrorKind::ALL {
            let class = registry.initialize_class(&interner, kind.name());
            class.set_superclass(object_class.clone());
            builtins::error::install(&class);
            error_classes.insert(*kind, class);
        }

        builtins::object::install(&object_class);
        builtins::class_obj::install(&class_class);
        builtins::integer::install(&integer_class);
        builtins::float::install(&float_class, config.unsafe_ffi);
        builtins::decimal::install(&decimal_class);
        builtins::string::install(&string_class);
        builtins::boolean::install(&boolean_class);
        builtins::null::install(&null_class);
        builtins::array::install(&array_class);
        builtins::hash::install(&hash_class);
        builtins::range::install(&range_class);
        builtins::block::install(&block_class);

        // Top-level classes are discovered by name through constants on
        // the Object class.
        for class in registry.snapshot() {
            let wrapper = RClass::wrap(&class, class_class.clone());
            object_class.set_constant(class.name_handle(), wrapper);
        }

        let true_object = Arc::new(Object::new(boolean_class.clone(), ObjectKind::Boolean(true)));
        let false_object =
            Arc::new(Object::new(boolean_class.clone(), ObjectKind::Boolean(false)));
        let null_object = Arc::new(Object::new(null_class.clone(), ObjectKind::Null));
        let main_object = Arc::new(Object::new(object_class.clone(), ObjectKind::Instance));

        log::debug!(
            "VM bootstrap complete: {} classes registered",
            registry.len()
        );

        Arc::new(VmState {
            config,
            registry,
            interner,
            object_class,
            class_class,
            integer_class,
            float_class,
            decimal_class,
            string_class,
            boolean_class,
            null_class,
            array_class,
            hash_class,
            range_class,
            block_class,
            opaque_class,
            error_classes,
            true_object,
            false_object,
            null_object,
            main_object,
        })
    }

    #[inline]
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    #[inline]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Intern a name through the shared table.
    pub fn intern(&self, text: &str) -> Arc<str> {
        self.interner.intern(text)
    }

    /// The class registered under `name`; callers map a miss to NameError.
    pub fn top_level_class(&self, name: &str) -> Option<ClassRef> {
        self.registry.top_level_class(name)
    }

    /// Create or fetch a top-level class and publish it as a constant.
    pub fn initialize_class(&self, name: &str) -> ClassRef {
        let class = self.registry.initialize_class(&self.interner, name);
        if class.superclass().is_none() && !Arc::ptr_eq(&class, &self.object_class) {
            class.set_superclass(self.object_class.clone());
        }
        let wrapper = RClass::wrap(&class, self.class_class.clone());
        self.object_class.set_constant(class.name_handle(), wrapper);
        class
    }

    // =========================================================================
    // Class accessors
    // =========================================================================

    pub fn object_class(&self) -> ClassRef {
        self.object_class.clone()
    }

    pub fn class_class(&self) -> ClassRef {
        self.class_class.clone()
    }

    pub fn block_class(&self) -> ClassRef {
        self.block_class.clone()
    }

    pub fn error_class(&self, kind: ErrorKind) -> ClassRef {
        self.error_classes[&kind].clone()
    }

    // =========================================================================
    // Object constructors
    // =========================================================================

    pub fn init_integer(&self, value: i64) -> ObjectRef {
        Arc::new(Object::new(
            self.integer_class.clone(),
            ObjectKind::Integer(IntegerObject { value }),
        ))
    }

    /// Integer carrying the conversion subflag.
    pub fn init_integer_converted(&self, value: i64) -> ObjectRef {
        Arc::new(Object::with_flags(
            self.integer_class.clone(),
            ObjectKind::Integer(IntegerObject { value }),
            ObjectFlags::CONVERTED_INTEGER,
        ))
    }

    pub fn init_float(&self, value: f64) -> ObjectRef {
        Arc::new(Object::new(
            self.float_class.clone(),
            ObjectKind::Float(FloatObject { value }),
        ))
    }

    pub fn init_decimal(&self, value: Rational) -> ObjectRef {
        Arc::new(Object::new(
            self.decimal_class.clone(),
            ObjectKind::Decimal(DecimalObject { value }),
        ))
    }

    pub fn init_string(&self, value: String) -> ObjectRef {
        Arc::new(Object::new(self.string_class.clone(), ObjectKind::Str(value)))
    }

    pub fn init_array(&self, elements: Vec<ObjectRef>) -> ObjectRef {
        Arc::new(Object::new(
            self.array_class.clone(),
            ObjectKind::Array(RwLock::new(elements)),
        ))
    }

    pub fn init_hash(&self, pairs: FxHashMap<String, ObjectRef>) -> ObjectRef {
        Arc::new(Object::new(
            self.hash_class.clone(),
            ObjectKind::Hash(RwLock::new(pairs)),
        ))
    }

    pub fn init_range(&self, start: i64, end: i64) -> ObjectRef {
        Arc::new(Object::new(
            self.range_class.clone(),
            ObjectKind::Range(RangeObject { start, end }),
        ))
    }

    /// Wrap a raw host address; only reachable when `unsafe_ffi` is on.
    pub fn init_opaque(&self, address: usize) -> ObjectRef {
        Arc::new(Object::new(
            self.opaque_class.clone(),
            ObjectKind::Opaque(OpaqueObject { address }),
        ))
    }

    pub fn init_error(&self, kind: ErrorKind, source_line: usize, message: String) -> ObjectRef {
        Arc::new(Object::new(
            self.error_class(kind),
            ObjectKind::Error(ErrorObject::new(kind, source_line, message)),
        ))
    }

    /// Allocate a bare instance of `class`.
    pub fn init_instance(&self, class: ClassRef) -> ObjectRef {
        Arc::new(Object::new(class, ObjectKind::Instance))
    }

    /// The canonical true or false object.
    pub fn boolean(&self, value: bool) -> ObjectRef {
        if value {
            self.true_object.clone()
        } else {
            self.false_object.clone()
        }
    }

    /// The canonical nil object.
    pub fn null(&self) -> ObjectRef {
        self.null_object.clone()
    }

    /// The top-level `main` object.
    pub fn main_object(&self) -> ObjectRef {
        self.main_object.clone()
    }

    /// Wrap `class` as an object answering the `Class` class.
    pub fn class_object(&self, class: &ClassRef) -> ObjectRef {
        RClass::wrap(class, self.class_class.clone())
    }

    fn release(&self) {
        for class in self.registry.snapshot() {
            class.clear();
        }
        self.registry.clear();
    }
}

// =============================================================================
// VirtualMachine
// =============================================================================

/// The embedder's handle to one VM instance.
pub struct VirtualMachine {
    state: Arc<VmState>,
}

impl VirtualMachine {
    /// Construct a VM with default configuration.
    pub fn new() -> VirtualMachine {
        Self::with_config(VmConfig::default())
    }

    /// Construct a VM with explicit configuration.
    pub fn with_config(config: VmConfig) -> VirtualMachine {
        VirtualMachine {
            state: VmState::bootstrap(config),
        }
    }

    /// Shared state, for threads and advanced embedders.
    #[inline]
    pub fn state(&self) -> &Arc<VmState> {
        &self.state
    }

    /// Execute a root instruction set on a fresh thread.
    ///
    /// Uncaught error objects surface as [`crate::VmError::Uncaught`] with
    /// message and source line intact.
    pub fn execute(&self, iset: Arc<InstructionSet>) -> VmResult<ObjectRef> {
        let mut thread = self.spawn_thread();
        thread.run_instruction_set(iset)
    }

    /// Create a thread sharing this VM's state. Threads may run in
    /// parallel; each owns its stacks.
    pub fn spawn_thread(&self) -> Thread {
        Thread::new(self.state.clone())
    }

    /// The top-level `main` object, `self` for program-kind sets.
    pub fn top_level_binding(&self) -> ObjectRef {
        self.state.main_object()
    }

    /// Release the VM's own references: method tables, constants, and
    /// registrations. Objects the embedder still holds stay alive.
    pub fn teardown(self) {
        self.state.release();
        log::debug!("VM teardown complete");
    }
}

impl Default for VirtualMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_registers_core_classes() {
        let vm = VirtualMachine::new();
        for name in classes::BOOTSTRAP_CLASSES {
            assert!(vm.state().top_level_class(name).is_some(), "missing {name}");
        }
        for kind in ErrorKind::ALL {
            assert!(vm.state().top_level_class(kind.name()).is_some());
        }
    }

    #[test]
    fn test_booleans_are_canonical() {
        let vm = VirtualMachine::new();
        assert!(Arc::ptr_eq(
            &vm.state().boolean(true),
            &vm.state().boolean(true)
        ));
        assert!(!Arc::ptr_eq(
            &vm.state().boolean(true),
            &vm.state().boolean(false)
        ));
    }

    #[test]
    fn test_initialize_class_is_idempotent_and_published() {
        let vm = VirtualMachine::new();
        let first = vm.state().initialize_class("Widget");
        let second = vm.state().initialize_class("Widget");
        assert!(Arc::ptr_eq(&first, &second));

        let constant = vm.state().object_class().lookup_constant("Widget").unwrap();
        assert!(Arc::ptr_eq(constant.as_class().unwrap(), &first));
    }

    #[test]
    fn test_teardown_releases_registry() {
        let vm = VirtualMachine::new();
        let object_class = vm.state().object_class();
        vm.teardown();
        assert!(object_class.lookup_constant("Integer").is_none());
        assert!(object_class.lookup_instance_method("==").is_none());
    }
}
