//! Estimator error types
//!
//! Error codes:
//! - IDX_INVALID_INPUT (REJECT)
//! - IDX_ROW_TOO_LARGE (REJECT)
//! - IDX_FILL_FACTOR_TOO_LOW (REJECT)
//!
//! Every error is raised before a `SizeEstimate` exists. There are no
//! partial results.

use std::fmt;

/// Severity levels for estimator errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, nothing computed
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Estimator error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimationErrorCode {
    /// Row count, fill factor, or fact shape out of range
    InvalidInput,
    /// A single leaf row does not fit on a page
    RowTooLarge,
    /// Fill factor leaves no usable rows per page
    FillFactorTooLow,
}

impl EstimationErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            EstimationErrorCode::InvalidInput => "IDX_INVALID_INPUT",
            EstimationErrorCode::RowTooLarge => "IDX_ROW_TOO_LARGE",
            EstimationErrorCode::FillFactorTooLow => "IDX_FILL_FACTOR_TOO_LOW",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for EstimationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Estimator error with the offending quantity and its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimationError {
    code: EstimationErrorCode,
    message: String,
    quantity: &'static str,
    value: String,
}

impl EstimationError {
    /// Create an invalid input error for a named input
    pub fn invalid_input(
        quantity: &'static str,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            code: EstimationErrorCode::InvalidInput,
            message: reason.into(),
            quantity,
            value: value.to_string(),
        }
    }

    /// Create a row too large error
    pub fn row_too_large(index_row_size: u64, usable_page_bytes: u64) -> Self {
        Self {
            code: EstimationErrorCode::RowTooLarge,
            message: format!(
                "index row of {} bytes plus slot entry exceeds {} usable page bytes",
                index_row_size, usable_page_bytes
            ),
            quantity: "index_row_size_bytes",
            value: index_row_size.to_string(),
        }
    }

    /// Create a fill factor too low error
    pub fn fill_factor_too_low(
        fill_factor: u32,
        rows_per_page: u64,
        free_rows_per_page: u64,
    ) -> Self {
        Self {
            code: EstimationErrorCode::FillFactorTooLow,
            message: format!(
                "fill factor {}% reserves {} of {} rows per page, leaving none usable",
                fill_factor, free_rows_per_page, rows_per_page
            ),
            quantity: "fill_factor",
            value: fill_factor.to_string(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> EstimationErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the name of the quantity that failed
    pub fn quantity(&self) -> &'static str {
        self.quantity
    }

    /// Returns the offending value as rendered in the message
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for EstimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({} = {})",
            self.code.severity(),
            self.code.code(),
            self.message,
            self.quantity,
            self.value
        )
    }
}

impl std::error::Error for EstimationError {}

/// Result type for estimator operations
pub type EstimationResult<T> = Result<T, EstimationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EstimationErrorCode::InvalidInput.code(), "IDX_INVALID_INPUT");
        assert_eq!(EstimationErrorCode::RowTooLarge.code(), "IDX_ROW_TOO_LARGE");
        assert_eq!(EstimationErrorCode::FillFactorTooLow.code(), "IDX_FILL_FACTOR_TOO_LOW");
    }

    #[test]
    fn test_display_names_quantity_and_value() {
        let err = EstimationError::invalid_input("row_count", 0, "row count must be at least 1");
        let display = format!("{}", err);
        assert!(display.starts_with("[REJECT] IDX_INVALID_INPUT"));
        assert!(display.contains("row_count = 0"));
    }

    #[test]
    fn test_fill_factor_too_low_context() {
        let err = EstimationError::fill_factor_too_low(1, 1, 1);
        assert_eq!(err.code(), EstimationErrorCode::FillFactorTooLow);
        assert_eq!(err.quantity(), "fill_factor");
        assert_eq!(err.value(), "1");
    }
}
