//! HostValue - values crossing the host boundary
//!
//! Primitive values are carried inline. Everything else (strings, lists,
//! descriptor objects) is an [`ObjectRef`]: an index into the reference table
//! of the [`HostContext`](crate::HostContext) that produced it. References
//! are only meaningful within the context that minted them.

use std::fmt;

/// Opaque reference to a host object, scoped to one host context.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ObjectRef(u32);

impl ObjectRef {
    /// Create from a raw reference-table index
    #[inline]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Raw reference-table index
    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef(#{})", self.0)
    }
}

/// Resolved method identifier, scoped to one host context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct MethodId(u32);

impl MethodId {
    /// Create from a raw method-table index
    #[inline]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Raw method-table index
    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

/// A value as seen on the host side of the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostValue {
    /// Result of a void call
    Void,
    /// The host null reference
    Null,
    /// Host boolean
    Bool(bool),
    /// 32-bit host integer
    Int(i32),
    /// 64-bit host integer
    Long(i64),
    /// IEEE 754 double
    Double(f64),
    /// Reference to a host object (including strings)
    Object(ObjectRef),
}

impl HostValue {
    /// Whether this is the host null reference
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }

    /// Extract the object reference, if any
    #[inline]
    pub const fn as_object(&self) -> Option<ObjectRef> {
        match self {
            HostValue::Object(obj) => Some(*obj),
            _ => None,
        }
    }

    /// Get type name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            HostValue::Void => "void",
            HostValue::Null => "null",
            HostValue::Bool(_) => "boolean",
            HostValue::Int(_) => "int",
            HostValue::Long(_) => "long",
            HostValue::Double(_) => "double",
            HostValue::Object(_) => "object",
        }
    }
}

impl From<Option<ObjectRef>> for HostValue {
    fn from(value: Option<ObjectRef>) -> Self {
        value.map_or(HostValue::Null, HostValue::Object)
    }
}
