//! Dynamic method invocation on host objects
//!
//! Methods are resolved at every call from the runtime class of the receiver
//! and a `(name, signature)` pair, then invoked with the typed call matching
//! the signature's return category.

use crate::context::HostContext;
use crate::convert::FromHost;
use crate::error::{HostError, HostResult};
use crate::signature::ReturnKind;
use crate::value::{HostValue, ObjectRef};

/// A host object bound to the context that owns its reference.
#[derive(Clone, Copy)]
pub struct HostObject<'a> {
    ctx: &'a dyn HostContext,
    obj: ObjectRef,
}

impl<'a> HostObject<'a> {
    /// Bind a reference to its context
    pub fn new(ctx: &'a dyn HostContext, obj: ObjectRef) -> Self {
        Self { ctx, obj }
    }

    /// Bind a host value, which must be a non-null object
    pub fn wrap(ctx: &'a dyn HostContext, value: HostValue) -> HostResult<Self> {
        let obj = ObjectRef::from_host(ctx, value)?;
        Ok(Self::new(ctx, obj))
    }

    /// Read the static object field `name` of the class at `class_path`
    pub fn from_static_field(
        ctx: &'a dyn HostContext,
        class_path: &str,
        name: &str,
        signature: &str,
    ) -> HostResult<Self> {
        let value = ctx.static_object_field(class_path, name, signature)?;
        Self::wrap(ctx, value)
    }

    /// The underlying reference
    pub fn reference(&self) -> ObjectRef {
        self.obj
    }

    /// The context owning the reference
    pub fn context(&self) -> &'a dyn HostContext {
        self.ctx
    }

    /// Resolve and invoke a method, checking its return category.
    ///
    /// Fails with [`HostError::SignatureMismatch`] before touching the host
    /// when `signature` does not return `expected`, and with
    /// [`HostError::PendingException`] when the method raised.
    pub fn invoke(
        &self,
        name: &str,
        signature: &str,
        expected: ReturnKind,
        args: &[HostValue],
    ) -> HostResult<HostValue> {
        if ReturnKind::of(signature) != Some(expected) {
            return Err(HostError::SignatureMismatch {
                name: name.to_string(),
                signature: signature.to_string(),
                expected: expected.name(),
            });
        }
        let method = self.ctx.method_id(self.obj, name, signature)?;
        let result = self.ctx.call_method(self.obj, method, args);
        if self.ctx.exception_pending() {
            return Err(HostError::PendingException);
        }
        result
    }

    /// Invoke a method and convert its result
    pub fn call<T: FromHost>(&self, name: &str, signature: &str, args: &[HostValue]) -> HostResult<T> {
        let value = self.invoke(name, signature, T::RETURN_KIND, args)?;
        T::from_host(self.ctx, value)
    }

    /// Invoke a void method
    pub fn call_void(&self, name: &str, signature: &str, args: &[HostValue]) -> HostResult<()> {
        self.call(name, signature, args)
    }

    /// Invoke a method returning a non-null object
    pub fn call_object(&self, name: &str, signature: &str, args: &[HostValue]) -> HostResult<HostObject<'a>> {
        let obj: ObjectRef = self.call(name, signature, args)?;
        Ok(Self::new(self.ctx, obj))
    }

    /// Invoke a method returning a host string, copied into native memory
    pub fn call_string(&self, name: &str, signature: &str, args: &[HostValue]) -> HostResult<String> {
        self.call(name, signature, args)
    }

    /// Invoke a method returning a double
    pub fn call_double(&self, name: &str, signature: &str, args: &[HostValue]) -> HostResult<f64> {
        self.call(name, signature, args)
    }

    /// Invoke a method returning an int
    pub fn call_int(&self, name: &str, signature: &str, args: &[HostValue]) -> HostResult<i32> {
        self.call(name, signature, args)
    }

    /// Invoke a method returning a long
    pub fn call_long(&self, name: &str, signature: &str, args: &[HostValue]) -> HostResult<i64> {
        self.call(name, signature, args)
    }

    /// Invoke a method returning a boolean
    pub fn call_bool(&self, name: &str, signature: &str, args: &[HostValue]) -> HostResult<bool> {
        self.call(name, signature, args)
    }
}

impl std::fmt::Debug for HostObject<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HostObject").field(&self.obj).finish()
    }
}
