//! Error types for process handle operations.
//!
//! The taxonomy is small and deliberate:
//!
//! - [`ProcError::Unsupported`] - the capability is absent for this OS,
//!   runtime, or privilege level. Retrying cannot fix it.
//! - [`ProcError::OsQuery`] - a native call reported an error; carries the
//!   platform error code where one exists.
//! - [`ProcError::InvalidState`] - a host-provided process object lacks the
//!   state needed to resolve it (e.g. pid 0, a poisoned child lock).
//!
//! Liveness failures are never collapsed into "not alive" - a permission
//! error must stay distinguishable from process death.

use thiserror::Error;

/// Result type alias for process handle operations.
pub type ProcResult<T> = std::result::Result<T, ProcError>;

/// Error type for process handle operations.
#[derive(Debug, Error, Clone)]
pub enum ProcError {
    /// Capability absent for this OS, runtime, or privilege level.
    #[error("Unsupported operation: {operation} - {reason}")]
    Unsupported { operation: String, reason: String },

    /// A native OS call failed. `code` is the platform error code when the
    /// OS reported one (errno on Unix, HRESULT/NTSTATUS on Windows).
    #[error("OS query failed: {message}")]
    OsQuery { code: Option<i32>, message: String },

    /// A process object lacks the state needed to resolve its pid.
    #[error("Invalid process state: {reason}")]
    InvalidState { reason: String },
}

impl ProcError {
    /// Creates an Unsupported error.
    pub fn unsupported(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Creates an OsQuery error carrying the platform error code.
    pub fn os_query(code: Option<i32>, message: impl Into<String>) -> Self {
        Self::OsQuery {
            code,
            message: message.into(),
        }
    }

    /// Creates an InvalidState error.
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Returns true for capability-absent errors, which callers commonly
    /// tolerate as "no info available" rather than escalating.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// The platform-native error code, if the OS reported one.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Self::OsQuery { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ProcError::unsupported("info", "no argv mechanism on this OS");
        assert!(matches!(err, ProcError::Unsupported { .. }));
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_os_query_carries_code() {
        let err = ProcError::os_query(Some(3), "sysctl failed");
        assert_eq!(err.os_code(), Some(3));
        assert!(!err.is_unsupported());

        let err = ProcError::os_query(None, "sysctl failed");
        assert_eq!(err.os_code(), None);
    }

    #[test]
    fn test_error_display() {
        let err = ProcError::invalid_state("pid 0 is not a valid target");
        assert_eq!(
            err.to_string(),
            "Invalid process state: pid 0 is not a valid target"
        );

        let err = ProcError::unsupported("kill", "denied");
        assert!(err.to_string().contains("Unsupported operation: kill"));
    }
}
