//! Chemmisol bridge - native side of the managed `ChemicalSystem` class
//!
//! The bridge exposes the chemmisol engine to a managed host runtime that
//! shares neither its memory model nor its error model:
//!
//! - engines are owned natively and designated on the host by an opaque
//!   integer handle ([`Bridge`], [`registry`])
//! - host descriptor objects are read through their accessors, resolved by
//!   name and signature ([`descriptor`], [`session`])
//! - the host `Phase` enum is mapped once per process ([`phase`])
//! - native errors and panics become host exceptions at a single boundary
//!   ([`exception`])
//!
//! [`entry`] holds one function per host native method, generic over the
//! host through [`chemmisol_sdk::HostContext`]. With the `jvm` feature the
//! crate also builds the `Java_ummisco_gama_chemmisol_ChemicalSystem_*` JNI
//! exports.

#![warn(missing_docs)]

pub mod bridge;
pub mod config;
pub mod descriptor;
pub mod entry;
pub mod error;
pub mod exception;
#[cfg(feature = "jvm")]
#[allow(missing_docs)]
pub mod jvm;
pub mod logging;
pub mod phase;
pub mod registry;
pub mod session;

pub use bridge::Bridge;
pub use config::BridgeOptions;
pub use descriptor::{
    ComponentSource, ComponentSpec, HostComponent, HostReaction, HostReagent, ReactionSource,
    ReactionSpec, ReagentSource, ReagentSpec,
};
pub use error::{BridgeError, BridgeResult};
pub use exception::{boundary, CoreErrorKind, CORE_EXCEPTION_CLASS};
pub use phase::{PhaseTable, PHASE_CLASS};
pub use registry::HandleRegistry;
pub use session::BridgeSession;
