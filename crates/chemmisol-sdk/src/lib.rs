//! Chemmisol SDK - host runtime abstraction for the chemmisol bridge
//!
//! This crate provides the types and traits the bridge needs to talk to a
//! managed host runtime without depending on it directly:
//!
//! - [`HostValue`]: values crossing the boundary
//! - [`HostContext`]: the host environment of the current call
//! - [`FromHost`] / [`ToHost`]: value marshaling
//! - [`HostObject`]: dynamic method invocation by name and signature
//! - [`HostIterator`]: traversal through the host iterator protocol
//!
//! The `jvm` feature adds [`JniContext`], a `HostContext` over a JVM. The
//! `test-host` feature adds `InMemoryHost`, a host runtime living in native
//! memory for tests and benchmarks.
//!
//! # Example
//!
//! ```ignore
//! use chemmisol_sdk::{HostObject, signature};
//!
//! let reaction = HostObject::new(ctx, obj);
//! let name = reaction.call_string("getName", "()Ljava/lang/String;", &[])?;
//! let reagents = reaction.call_list("getReagents", "()Ljava/util/List;")?;
//! ```

#![warn(missing_docs)]

pub mod collection;
pub mod context;
pub mod convert;
pub mod error;
pub mod invoke;
#[cfg(feature = "jvm")]
pub mod jvm;
#[cfg(any(test, feature = "test-host"))]
pub mod memory;
pub mod signature;
pub mod value;

pub use collection::HostIterator;
pub use context::HostContext;
pub use convert::{FromHost, ToHost};
pub use error::{HostError, HostResult};
pub use invoke::HostObject;
#[cfg(feature = "jvm")]
pub use jvm::JniContext;
#[cfg(any(test, feature = "test-host"))]
pub use memory::{InMemoryHost, ThrownException};
pub use signature::ReturnKind;
pub use value::{HostValue, MethodId, ObjectRef};
