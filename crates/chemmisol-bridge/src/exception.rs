//! Translation of native errors into host exceptions
//!
//! [`boundary`] wraps the body of every entry point. It is the only place
//! where a [`BridgeError`] or a panic becomes a host exception:
//!
//! - a domain error raises the host wrapper exception, with the native kind
//!   and message in its text
//! - any other error raises the unchecked host error of its fault class
//! - a panic is caught before it reaches the host and raises `java/lang/Error`
//!
//! Nothing is raised when the host already has a pending exception, which
//! then propagates unchanged.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chemmisol_engine::EngineError;
use chemmisol_sdk::{HostContext, HostError};
use tracing::{debug, error, warn};

use crate::error::{BridgeError, BridgeResult};

/// Host exception wrapping native domain errors
pub const CORE_EXCEPTION_CLASS: &str = "ummisco/gama/chemmisol/ChemicalSystem$ChemmisolCoreException";

/// Host error raised for panics
pub const PANIC_ERROR_CLASS: &str = "java/lang/Error";

/// Closed set of recoverable engine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreErrorKind {
    /// Mineral component without site parameters
    InvalidMineralSpeciesWithUndefinedSitesCount,
    /// Reaction whose reagents are all components
    MissingProducedSpeciesInReaction,
    /// Reaction with several reagents that are not components
    TooManyProducedSpeciesInReaction,
}

impl CoreErrorKind {
    /// Every kind
    pub const ALL: [CoreErrorKind; 3] = [
        CoreErrorKind::InvalidMineralSpeciesWithUndefinedSitesCount,
        CoreErrorKind::MissingProducedSpeciesInReaction,
        CoreErrorKind::TooManyProducedSpeciesInReaction,
    ];

    /// Native class path reported to the host
    pub const fn class_path(self) -> &'static str {
        match self {
            CoreErrorKind::InvalidMineralSpeciesWithUndefinedSitesCount => {
                "chemmisol::InvalidMineralSpeciesWithUndefinedSitesCount"
            }
            CoreErrorKind::MissingProducedSpeciesInReaction => {
                "chemmisol::MissingProducedSpeciesInReaction"
            }
            CoreErrorKind::TooManyProducedSpeciesInReaction => {
                "chemmisol::TooManyProducedSpeciesInReaction"
            }
        }
    }

    /// Kind of an engine error, `None` outside the domain taxonomy
    pub fn of(err: &EngineError) -> Option<Self> {
        match err {
            EngineError::InvalidMineralSpeciesWithUndefinedSitesCount { .. } => {
                Some(CoreErrorKind::InvalidMineralSpeciesWithUndefinedSitesCount)
            }
            EngineError::MissingProducedSpeciesInReaction { .. } => {
                Some(CoreErrorKind::MissingProducedSpeciesInReaction)
            }
            EngineError::TooManyProducedSpeciesInReaction { .. } => {
                Some(CoreErrorKind::TooManyProducedSpeciesInReaction)
            }
            EngineError::UnknownComponent(_)
            | EngineError::UnknownSpecies(_)
            | EngineError::UnknownReaction(_) => None,
        }
    }
}

/// Host class raised for a non-domain error
pub fn fault_class(err: &BridgeError) -> &'static str {
    match err {
        BridgeError::Host(HostError::MethodNotFound { .. })
        | BridgeError::Host(HostError::SignatureMismatch { .. }) => "java/lang/NoSuchMethodError",
        BridgeError::Host(HostError::FieldNotFound { .. }) => "java/lang/NoSuchFieldError",
        BridgeError::Host(HostError::ClassNotFound(_)) => "java/lang/NoClassDefFoundError",
        BridgeError::Host(HostError::NullValue { .. }) => "java/lang/NullPointerException",
        BridgeError::Core { .. } => CORE_EXCEPTION_CLASS,
        _ => "java/lang/IllegalStateException",
    }
}

/// Raise the host exception describing `err`
pub fn raise(ctx: &dyn HostContext, operation: &str, err: &BridgeError) {
    if ctx.exception_pending() {
        debug!(operation, error = %err, "host exception already pending");
        return;
    }
    let (class, message) = match err {
        BridgeError::Core { kind, message } => {
            warn!(operation, kind = kind.class_path(), "{message}");
            (CORE_EXCEPTION_CLASS, format!("{}: {message}", kind.class_path()))
        }
        fault => {
            error!(operation, error = %fault, "bridge fault");
            (fault_class(fault), format!("{operation}: {fault}"))
        }
    };
    if let Err(e) = ctx.throw_new(class, &message) {
        error!(operation, class, error = %e, "failed to raise host exception");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Run an entry point body, converting its failure into a host exception.
///
/// Returns the body's value, or `fallback` once an exception is raised.
pub fn boundary<T>(
    ctx: &dyn HostContext,
    operation: &str,
    fallback: T,
    body: impl FnOnce() -> BridgeResult<T>,
) -> T {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            raise(ctx, operation, &err);
            fallback
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(operation, "panicked: {message}");
            if !ctx.exception_pending() {
                let text = format!("{operation} panicked: {message}");
                if let Err(e) = ctx.throw_new(PANIC_ERROR_CLASS, &text) {
                    error!(operation, error = %e, "failed to raise host error");
                }
            }
            fallback
        }
    }
}
