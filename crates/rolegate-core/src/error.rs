//! Shared error type across rolegate crates.

use thiserror::Error;

/// Stable error codes for the interception layer.
///
/// The interception layer maps these to its own responses; in particular it
/// must be able to tell "could not evaluate" apart from a denial decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No workload owns the source address.
    WorkloadNotFound,
    /// The workload's namespace is unknown.
    NamespaceNotFound,
    /// Workload lookup backend failed.
    WorkloadLookupFailed,
    /// Namespace lookup backend failed.
    NamespaceLookupFailed,
    /// A policy's own configuration is invalid.
    PolicyConfiguration,
    /// Request context was cancelled.
    Cancelled,
    /// Request context deadline elapsed.
    DeadlineExceeded,
    /// Invalid engine configuration.
    BadConfig,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and by the interception layer.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::WorkloadNotFound => "WORKLOAD_NOT_FOUND",
            ErrorCode::NamespaceNotFound => "NAMESPACE_NOT_FOUND",
            ErrorCode::WorkloadLookupFailed => "WORKLOAD_LOOKUP_FAILED",
            ErrorCode::NamespaceLookupFailed => "NAMESPACE_LOOKUP_FAILED",
            ErrorCode::PolicyConfiguration => "POLICY_CONFIGURATION",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::DeadlineExceeded => "DEADLINE_EXCEEDED",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RoleGateError>;

/// Unified error type used by core and engine.
///
/// `Clone` because a completed [`crate::ResultCell`] hands the same stored
/// error to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleGateError {
    #[error("workload not found")]
    WorkloadNotFound,
    #[error("namespace not found: {0}")]
    NamespaceNotFound(String),
    #[error("workload lookup failed: {0}")]
    WorkloadLookupFailed(String),
    #[error("namespace lookup failed: {0}")]
    NamespaceLookupFailed(String),
    #[error("policy configuration error: {0}")]
    PolicyConfiguration(String),
    #[error("context cancelled")]
    Cancelled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl RoleGateError {
    /// Map the error to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RoleGateError::WorkloadNotFound => ErrorCode::WorkloadNotFound,
            RoleGateError::NamespaceNotFound(_) => ErrorCode::NamespaceNotFound,
            RoleGateError::WorkloadLookupFailed(_) => ErrorCode::WorkloadLookupFailed,
            RoleGateError::NamespaceLookupFailed(_) => ErrorCode::NamespaceLookupFailed,
            RoleGateError::PolicyConfiguration(_) => ErrorCode::PolicyConfiguration,
            RoleGateError::Cancelled => ErrorCode::Cancelled,
            RoleGateError::DeadlineExceeded => ErrorCode::DeadlineExceeded,
            RoleGateError::BadConfig(_) => ErrorCode::BadConfig,
            RoleGateError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            RoleGateError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True for errors that come from the request context rather than from a
    /// lookup or a policy.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RoleGateError::Cancelled | RoleGateError::DeadlineExceeded)
    }
}
