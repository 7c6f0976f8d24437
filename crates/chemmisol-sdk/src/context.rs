//! HostContext trait - abstract host runtime operations
//!
//! A `HostContext` is the native view of one host execution context (for a
//! JVM, the `JNIEnv` of the current thread). The bridge programs against this
//! trait only, so the same marshaling code drives a real JVM (feature `jvm`)
//! and the in-memory host used in tests.
//!
//! Implementations are not required to be `Sync`: a context is bound to the
//! thread of the call that received it and must not outlive that call.

use crate::error::HostResult;
use crate::value::{HostValue, MethodId, ObjectRef};

/// Abstract host runtime for native code.
pub trait HostContext {
    // ========================================================================
    // Method resolution and invocation
    // ========================================================================

    /// Resolve `name` with type `signature` on the runtime class of `obj`
    fn method_id(&self, obj: ObjectRef, name: &str, signature: &str) -> HostResult<MethodId>;

    /// Invoke a resolved method on `obj`
    fn call_method(
        &self,
        obj: ObjectRef,
        method: MethodId,
        args: &[HostValue],
    ) -> HostResult<HostValue>;

    // ========================================================================
    // Static fields
    // ========================================================================

    /// Read a static object field of the class at `class_path`
    fn static_object_field(
        &self,
        class_path: &str,
        name: &str,
        signature: &str,
    ) -> HostResult<HostValue>;

    // ========================================================================
    // Strings
    // ========================================================================

    /// Copy the contents of a host string into native memory
    fn read_string(&self, string: ObjectRef) -> HostResult<String>;

    /// Allocate a new host string
    fn create_string(&self, s: &str) -> HostResult<ObjectRef>;

    // ========================================================================
    // Exceptions
    // ========================================================================

    /// Raise a new exception of the class at `class_path` in the host.
    ///
    /// The host unwinds once control returns to it; this does not interrupt
    /// native execution.
    fn throw_new(&self, class_path: &str, message: &str) -> HostResult<()>;

    /// Whether an exception is pending in the host
    fn exception_pending(&self) -> bool;
}
