//! Error types for dispatch, hierarchy definition, and configuration.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed error raised by a user-supplied method implementation.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors raised while registering or invoking generic functions.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A signature declaration could not be parsed.
    #[error("invalid signature `{text}`: {reason}")]
    InvalidSignature { text: String, reason: String },

    /// No method in any role applies to the arguments.
    ///
    /// `GenericFunction::invoke` reports this as a value; only
    /// `GenericFunction::call` turns it into an error.
    #[error(transparent)]
    NoApplicableMethod(#[from] NoApplicableMethodError),

    /// A method called the next method with an empty remaining chain.
    #[error("no next method for `{generic}` with arguments ({})", .arguments.join(", "))]
    NoNextMethod {
        generic: String,
        arguments: Vec<String>,
    },

    /// A method implementation failed.
    #[error("method of `{generic}` failed: {source}")]
    MethodFailed {
        generic: String,
        #[source]
        source: BoxError,
    },
}

impl DispatchError {
    pub(crate) fn invalid_signature(text: &str, reason: impl Into<String>) -> Self {
        DispatchError::InvalidSignature {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Error when no registered method matches the arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no applicable method for `{generic}` with arguments ({})", .arguments.join(", "))]
pub struct NoApplicableMethodError {
    /// The generic function that was called.
    pub generic: String,
    /// The arguments provided, rendered with `Debug`.
    pub arguments: Vec<String>,
    /// Number of registered methods that were considered.
    pub candidates: usize,
}

/// Errors raised while defining a type hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("type `{0}` is already defined")]
    AlreadyDefined(String),

    #[error("unknown parent type `{parent}` for `{name}`")]
    UnknownParent { name: String, parent: String },

    #[error("invalid type name `{0}`")]
    InvalidName(String),
}

/// Errors raised while loading dispatch configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
