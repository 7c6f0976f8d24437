//! Traits for converting between host values and Rust values.
//!
//! `FromHost` extracts a Rust value from a [`HostValue`] returned by the host,
//! `ToHost` builds the host value passed as an argument. Each `FromHost` type
//! also declares the return category a host method must have to produce it,
//! which is what [`HostObject::call`](crate::HostObject::call) checks against
//! the method signature.
//!
//! # Example
//!
//! ```ignore
//! use chemmisol_sdk::{FromHost, HostValue};
//!
//! let log_k = f64::from_host(ctx, HostValue::Double(13.192))?;
//! ```

use crate::context::HostContext;
use crate::error::{HostError, HostResult};
use crate::signature::ReturnKind;
use crate::value::{HostValue, ObjectRef};

/// Convert a host value into a Rust value.
pub trait FromHost: Sized {
    /// Return category of host methods producing this type
    const RETURN_KIND: ReturnKind;

    /// Convert from a host value, copying any host-owned data
    fn from_host(ctx: &dyn HostContext, value: HostValue) -> HostResult<Self>;
}

/// Convert a Rust value into a host value.
pub trait ToHost {
    /// Convert to a host value, allocating host objects when needed
    fn to_host(self, ctx: &dyn HostContext) -> HostResult<HostValue>;
}

fn mismatch(expected: &'static str, value: HostValue) -> HostError {
    if value.is_null() {
        HostError::NullValue { expected }
    } else {
        HostError::TypeMismatch {
            expected,
            got: value.type_name(),
        }
    }
}

impl FromHost for String {
    const RETURN_KIND: ReturnKind = ReturnKind::Object;

    fn from_host(ctx: &dyn HostContext, value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Object(obj) => ctx.read_string(obj),
            other => Err(mismatch("string", other)),
        }
    }
}

impl FromHost for f64 {
    const RETURN_KIND: ReturnKind = ReturnKind::Double;

    fn from_host(_ctx: &dyn HostContext, value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Double(d) => Ok(d),
            other => Err(mismatch("double", other)),
        }
    }
}

impl FromHost for i32 {
    const RETURN_KIND: ReturnKind = ReturnKind::Int;

    fn from_host(_ctx: &dyn HostContext, value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Int(i) => Ok(i),
            other => Err(mismatch("int", other)),
        }
    }
}

impl FromHost for i64 {
    const RETURN_KIND: ReturnKind = ReturnKind::Long;

    fn from_host(_ctx: &dyn HostContext, value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Long(l) => Ok(l),
            HostValue::Int(i) => Ok(i64::from(i)),
            other => Err(mismatch("long", other)),
        }
    }
}

impl FromHost for bool {
    const RETURN_KIND: ReturnKind = ReturnKind::Boolean;

    fn from_host(_ctx: &dyn HostContext, value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Bool(b) => Ok(b),
            other => Err(mismatch("boolean", other)),
        }
    }
}

impl FromHost for ObjectRef {
    const RETURN_KIND: ReturnKind = ReturnKind::Object;

    fn from_host(_ctx: &dyn HostContext, value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Object(obj) => Ok(obj),
            other => Err(mismatch("object", other)),
        }
    }
}

impl FromHost for () {
    const RETURN_KIND: ReturnKind = ReturnKind::Void;

    fn from_host(_ctx: &dyn HostContext, value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Void => Ok(()),
            other => Err(HostError::TypeMismatch {
                expected: "void",
                got: other.type_name(),
            }),
        }
    }
}

impl ToHost for &str {
    fn to_host(self, ctx: &dyn HostContext) -> HostResult<HostValue> {
        ctx.create_string(self).map(HostValue::Object)
    }
}

impl ToHost for String {
    fn to_host(self, ctx: &dyn HostContext) -> HostResult<HostValue> {
        self.as_str().to_host(ctx)
    }
}

impl ToHost for f64 {
    fn to_host(self, _ctx: &dyn HostContext) -> HostResult<HostValue> {
        Ok(HostValue::Double(self))
    }
}

impl ToHost for i32 {
    fn to_host(self, _ctx: &dyn HostContext) -> HostResult<HostValue> {
        Ok(HostValue::Int(self))
    }
}

impl ToHost for i64 {
    fn to_host(self, _ctx: &dyn HostContext) -> HostResult<HostValue> {
        Ok(HostValue::Long(self))
    }
}

impl ToHost for bool {
    fn to_host(self, _ctx: &dyn HostContext) -> HostResult<HostValue> {
        Ok(HostValue::Bool(self))
    }
}

impl ToHost for ObjectRef {
    fn to_host(self, _ctx: &dyn HostContext) -> HostResult<HostValue> {
        Ok(HostValue::Object(self))
    }
}

impl ToHost for Option<ObjectRef> {
    fn to_host(self, _ctx: &dyn HostContext) -> HostResult<HostValue> {
        Ok(HostValue::from(self))
    }
}
