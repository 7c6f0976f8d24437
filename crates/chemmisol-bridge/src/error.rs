//! Bridge error types
//!
//! Errors travel as values from the engine and the host layer up to the
//! entry point, where [`crate::exception::boundary`] turns them into exactly
//! one host exception.

use chemmisol_engine::EngineError;
use chemmisol_sdk::HostError;

use crate::exception::CoreErrorKind;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    /// Recoverable domain error raised by the engine
    #[error("{}: {message}", kind.class_path())]
    Core {
        /// Domain error kind
        kind: CoreErrorKind,
        /// Native diagnostic message
        message: String,
    },

    /// Host runtime contract violation
    #[error(transparent)]
    Host(#[from] HostError),

    /// Engine lookup of an unknown name
    #[error(transparent)]
    Engine(EngineError),

    /// The handle does not designate a live engine
    #[error("stale or invalid engine handle {0:#x}")]
    StaleHandle(i64),

    /// A host enum constant has no native counterpart
    #[error("unmapped enum constant: {0}")]
    UnmappedEnumConstant(String),
}

impl From<EngineError> for BridgeError {
    fn from(err: EngineError) -> Self {
        match CoreErrorKind::of(&err) {
            Some(kind) => BridgeError::Core {
                kind,
                message: err.to_string(),
            },
            None => BridgeError::Engine(err),
        }
    }
}
