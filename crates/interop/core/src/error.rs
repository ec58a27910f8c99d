//! Error infrastructure for interop-core.
//!
//! Almost every "nothing happened" outcome in this crate is an ordinary
//! return value (`false`, `0`, `None`). [`InteropError`] exists for the few
//! cases that are not neutral: adapter stubs and type mismatches, which the
//! dispatcher folds back into neutral results, and missing required
//! arguments, which it propagates to the caller.
//!
//! # Design Principles
//!
//! - **Neutral by default**: unsupported providers are not errors
//! - **Severity Classification**: every error reports how it should be handled
//! - **Stable codes**: `error_code` is safe to match on in logs and tests

use crate::storage::Operation;

/// Result alias used by adapters and the dispatcher.
pub type InteropResult<T> = Result<T, InteropError>;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the call had no effect and can be retried or skipped
/// - **Validation**: the call was malformed and must not be retried unchanged
/// - **Internal**: registry or adapter wiring is inconsistent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Recoverable error - the operation can be skipped.
    ///
    /// Examples: adapter operation stubbed out for a legacy provider
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: directional adapter invoked without a caller
    Validation,

    /// Internal error - adapter registered for the wrong provider type.
    Internal,
}

impl ErrorSeverity {
    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all interop errors.
///
/// Mirrors the classification used by host engines so errors can be routed
/// to the right log level without inspecting variants.
pub trait InteropFailure: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised by adapters and the dispatch boundary.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InteropError {
    /// The resolved adapter needs the calling entity for this operation.
    #[error("{operation} requires a calling entity")]
    MissingCaller { operation: Operation },

    /// The adapter explicitly does not implement this operation.
    #[error("{adapter} does not support {operation}")]
    Unsupported {
        adapter: &'static str,
        operation: Operation,
    },

    /// The adapter was handed a provider of a different concrete type.
    #[error("{adapter} cannot drive provider of type {found}")]
    ProviderMismatch {
        adapter: &'static str,
        found: &'static str,
    },
}

impl InteropError {
    /// Returns true if the dispatcher should replace this error with the
    /// operation's neutral result.
    pub const fn is_neutral(&self) -> bool {
        !matches!(self, Self::MissingCaller { .. })
    }
}

impl InteropFailure for InteropError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingCaller { .. } => ErrorSeverity::Validation,
            Self::Unsupported { .. } => ErrorSeverity::Recoverable,
            Self::ProviderMismatch { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCaller { .. } => "MISSING_CALLER",
            Self::Unsupported { .. } => "UNSUPPORTED_OPERATION",
            Self::ProviderMismatch { .. } => "PROVIDER_MISMATCH",
        }
    }
}
