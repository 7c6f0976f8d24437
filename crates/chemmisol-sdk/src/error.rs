//! Error types for host operations
//!
//! Every variant describes a contract violation between the native side and
//! the host runtime (wrong interface, unexpected null, exception raised by the
//! host). None of them is caused by domain input.

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

/// Host operation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// No method with this name and signature on the runtime class
    #[error("no method {name}{signature} in class {class}")]
    MethodNotFound {
        /// Runtime class of the receiver
        class: String,
        /// Method name
        name: String,
        /// Method type signature
        signature: String,
    },

    /// No static field with this name and signature
    #[error("no static field {name} of type {signature} in class {class}")]
    FieldNotFound {
        /// Class searched
        class: String,
        /// Field name
        name: String,
        /// Field type signature
        signature: String,
    },

    /// Class lookup failed
    #[error("class not found: {0}")]
    ClassNotFound(String),

    /// A null value was received where a value was required
    #[error("unexpected null value, expected {expected}")]
    NullValue {
        /// Expected type name
        expected: &'static str,
    },

    /// Type mismatch during conversion
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: &'static str,
        /// Actual type name
        got: &'static str,
    },

    /// The signature does not declare the return category of the call
    #[error("method {name}{signature} is called as returning {expected}")]
    SignatureMismatch {
        /// Method name
        name: String,
        /// Method type signature
        signature: String,
        /// Return category requested by the caller
        expected: &'static str,
    },

    /// Reference unknown to this host context
    #[error("invalid host reference #{0}")]
    InvalidReference(u32),

    /// The host raised an exception during the call
    #[error("an exception is pending in the host runtime")]
    PendingException,

    /// Any other host failure
    #[error("{0}")]
    Host(String),
}

impl From<String> for HostError {
    fn from(s: String) -> Self {
        HostError::Host(s)
    }
}

impl From<&str> for HostError {
    fn from(s: &str) -> Self {
        HostError::Host(s.to_string())
    }
}
