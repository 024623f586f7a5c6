//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::catalog::ResolveError;
use crate::estimator::EstimationError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Malformed estimation input
    InvalidInput,
    /// Metadata resolution failed
    ResolveFailed,
    /// Estimator rejected the input
    EstimateRejected,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "IDX_CLI_CONFIG_ERROR",
            Self::IoError => "IDX_CLI_IO_ERROR",
            Self::InvalidInput => "IDX_CLI_INVALID_INPUT",
            Self::ResolveFailed => "IDX_CLI_RESOLVE_FAILED",
            Self::EstimateRejected => "IDX_CLI_ESTIMATE_REJECTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Invalid input
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ResolveError> for CliError {
    fn from(e: ResolveError) -> Self {
        Self::new(CliErrorCode::ResolveFailed, format!("{}: {}", e.code(), e))
    }
}

impl From<EstimationError> for CliError {
    fn from(e: EstimationError) -> Self {
        Self::new(CliErrorCode::EstimateRejected, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_keeps_inner_code() {
        let err: CliError = ResolveError::DatabaseNotFound("Sales".into()).into();
        assert_eq!(err.code(), &CliErrorCode::ResolveFailed);
        assert!(err.message().contains("IDX_RESOLVE_DATABASE_NOT_FOUND"));
        assert!(err.to_string().starts_with("IDX_CLI_RESOLVE_FAILED"));
    }

    #[test]
    fn test_estimation_error_keeps_inner_code() {
        let err: CliError =
            EstimationError::invalid_input("row_count", 0, "row count must be at least 1").into();
        assert_eq!(err.code_str(), "IDX_CLI_ESTIMATE_REJECTED");
        assert!(err.message().contains("IDX_INVALID_INPUT"));
    }
}
