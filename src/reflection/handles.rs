//! Constructor and method handles.
//!
//! A handle owns its parameter types and the raw capability it forwards to;
//! it keeps no reference back to the resolver that produced it. The fixed
//! arity entry points check the argument count before the call reaches the
//! platform.

use std::fmt;
use std::sync::Arc;

use crate::error::{ReflectError, Result};
use crate::host::{Allocate, Execute, Object, TypeHandle};

fn check_arity(expected: usize, supplied: usize) -> Result<()> {
    if expected == supplied {
        Ok(())
    } else {
        Err(ReflectError::ArityMismatch { expected, supplied })
    }
}

// ============================================================================
// CONSTRUCTOR
// ============================================================================

/// A run-time constructor obtained by signature.
///
/// ```ignore
/// let ctor = reflection.get_constructor("pkg.Counter(int)")?.expect("pkg.Counter");
/// let counter = ctor.new_instance1(object(64i32))?;
/// ```
#[derive(Clone)]
pub struct Constructor {
    label: Arc<str>,
    parameter_types: Arc<[TypeHandle]>,
    allocator: Arc<dyn Allocate>,
}

impl Constructor {
    /// `label` names the handle in errors and `Display`, e.g. `pkg.Counter(int) constructor`.
    pub fn new(
        label: impl Into<Arc<str>>,
        parameter_types: Vec<TypeHandle>,
        allocator: Arc<dyn Allocate>,
    ) -> Self {
        Self {
            label: label.into(),
            parameter_types: parameter_types.into(),
            allocator,
        }
    }

    /// Formal parameter types in declaration order.
    pub fn parameter_types(&self) -> &[TypeHandle] {
        &self.parameter_types
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn new_instance(&self) -> Result<Object> {
        self.allocate(&[])
    }

    pub fn new_instance1(&self, arg0: Object) -> Result<Object> {
        self.allocate(&[arg0])
    }

    pub fn new_instance2(&self, arg0: Object, arg1: Object) -> Result<Object> {
        self.allocate(&[arg0, arg1])
    }

    pub fn new_instance3(&self, arg0: Object, arg1: Object, arg2: Object) -> Result<Object> {
        self.allocate(&[arg0, arg1, arg2])
    }

    pub fn new_instance4(
        &self,
        arg0: Object,
        arg1: Object,
        arg2: Object,
        arg3: Object,
    ) -> Result<Object> {
        self.allocate(&[arg0, arg1, arg2, arg3])
    }

    /// Any number of arguments, still checked against the declared count.
    pub fn new_instance_with(&self, args: &[Object]) -> Result<Object> {
        self.allocate(args)
    }

    /// Whether both handles forward to the same underlying constructor.
    pub fn same_target(&self, other: &Constructor) -> bool {
        Arc::ptr_eq(&self.allocator, &other.allocator)
    }

    fn allocate(&self, args: &[Object]) -> Result<Object> {
        check_arity(self.parameter_types.len(), args.len())?;
        self.allocator
            .allocate(args)
            .map_err(|fault| ReflectError::from_fault(&*self.label, fault))
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("label", &self.label)
            .field("parameter_types", &self.parameter_types)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// METHOD
// ============================================================================

/// A run-time method obtained by signature.
///
/// The receiver is `None` for static methods:
///
/// ```ignore
/// let now = reflection.get_method("pkg.Clock.nanos()")?.expect("pkg.Clock");
/// let nanos = now.invoke(None)?;
/// ```
#[derive(Clone)]
pub struct Method {
    label: Arc<str>,
    parameter_types: Arc<[TypeHandle]>,
    executor: Arc<dyn Execute>,
}

impl Method {
    /// `label` names the handle in errors and `Display`, e.g. `pkg.Map.put(pkg.Key) method`.
    pub fn new(
        label: impl Into<Arc<str>>,
        parameter_types: Vec<TypeHandle>,
        executor: Arc<dyn Execute>,
    ) -> Self {
        Self {
            label: label.into(),
            parameter_types: parameter_types.into(),
            executor,
        }
    }

    /// Formal parameter types in declaration order.
    pub fn parameter_types(&self) -> &[TypeHandle] {
        &self.parameter_types
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn invoke(&self, this: Option<&Object>) -> Result<Option<Object>> {
        self.execute(this, &[])
    }

    pub fn invoke1(&self, this: Option<&Object>, arg0: Object) -> Result<Option<Object>> {
        self.execute(this, &[arg0])
    }

    pub fn invoke2(
        &self,
        this: Option<&Object>,
        arg0: Object,
        arg1: Object,
    ) -> Result<Option<Object>> {
        self.execute(this, &[arg0, arg1])
    }

    pub fn invoke3(
        &self,
        this: Option<&Object>,
        arg0: Object,
        arg1: Object,
        arg2: Object,
    ) -> Result<Option<Object>> {
        self.execute(this, &[arg0, arg1, arg2])
    }

    pub fn invoke4(
        &self,
        this: Option<&Object>,
        arg0: Object,
        arg1: Object,
        arg2: Object,
        arg3: Object,
    ) -> Result<Option<Object>> {
        self.execute(this, &[arg0, arg1, arg2, arg3])
    }

    /// Any number of arguments, still checked against the declared count.
    pub fn invoke_with(&self, this: Option<&Object>, args: &[Object]) -> Result<Option<Object>> {
        self.execute(this, args)
    }

    /// Whether both handles forward to the same underlying method.
    pub fn same_target(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.executor, &other.executor)
    }

    fn execute(&self, this: Option<&Object>, args: &[Object]) -> Result<Option<Object>> {
        check_arity(self.parameter_types.len(), args.len())?;
        self.executor
            .execute(this, args)
            .map_err(|fault| ReflectError::from_fault(&*self.label, fault))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("label", &self.label)
            .field("parameter_types", &self.parameter_types)
            .finish_non_exhaustive()
    }
}
