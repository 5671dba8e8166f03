//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Groups
//!
//! - **Validation**: bad user input, rejected before any network call
//! - **Inference**: transport failures, upstream non-2xx, malformed responses
//! - **Payment**: price resolution, session creation, verification denials
//! - **Fatal**: missing credentials or broken configuration — the run cannot
//!   proceed and halts before any network call
//!
//! ## Design Principles
//!
//! - Single unified error type (TinteroError) for the entire application
//! - Structured variants with context for user-facing diagnostics
//! - No panic/unwrap - all errors are surfaced, never swallowed

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Field that failed validation (when attributable)
    pub field: Option<String>,
    /// User-facing message
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)
        } else {
            write!(f, "Validation failed: {}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Empty submission text
    pub fn empty_text() -> Self {
        Self::new("paste the text to analyze and correct").with_field("text")
    }

    /// Empty audience field
    pub fn empty_audience() -> Self {
        Self::new("define the target audience").with_field("audience")
    }

    /// Word count outside the accepted bounds. Reports the exact count.
    pub fn word_count(count: usize, min: usize, max: usize) -> Self {
        let message = if count < min {
            format!(
                "text is below the {} word minimum (currently {} words)",
                min, count
            )
        } else {
            format!(
                "text exceeds the {} word limit (currently {} words)",
                max, count
            )
        };
        Self::new(message).with_field("text")
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum TinteroError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Input Validation
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Validation(ValidationError),

    // -------------------------------------------------------------------------
    // Inference Errors
    // -------------------------------------------------------------------------
    /// Network failure or timeout before an HTTP status was obtained
    #[error("Transport error during {operation}: {message}")]
    Transport { operation: String, message: String },

    /// Non-2xx response from the inference endpoint
    #[error("Upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Response parsed, but the expected choice/message/content path is absent
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // -------------------------------------------------------------------------
    // Payment Errors
    // -------------------------------------------------------------------------
    #[error("No active price found for product '{product}'")]
    PriceNotFound { product: String },

    #[error("Checkout session creation failed: {0}")]
    SessionCreation(String),

    /// The gate denied access for the current request's credential
    #[error("Payment required: {0}")]
    PaymentRequired(String),

    // -------------------------------------------------------------------------
    // Fatal Errors
    // -------------------------------------------------------------------------
    /// Required secret or API key absent; the run halts before any network call
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Config error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Export Errors
    // -------------------------------------------------------------------------
    #[error("Document export failed: {0}")]
    Export(String),
}

impl From<ValidationError> for TinteroError {
    fn from(err: ValidationError) -> Self {
        TinteroError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, TinteroError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl TinteroError {
    /// Create a transport error with operation context
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Classify a reqwest failure for a named operation.
    ///
    /// Status-bearing failures become `Upstream`; everything that died before
    /// an HTTP status (connect, DNS, timeout) is `Transport`.
    pub fn from_reqwest(operation: &str, err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Upstream {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None => Self::transport(operation, err.to_string()),
        }
    }

    /// Fatal errors halt the run before any network call and cannot be
    /// recovered by resubmitting
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingCredential(_) | Self::Config(_))
    }

    /// Recoverable errors surface a diagnostic and abort only the current
    /// pipeline run; earlier stage output remains visible
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_with_field() {
        let err = ValidationError::empty_audience();
        assert_eq!(
            err.to_string(),
            "Validation failed for 'audience': define the target audience"
        );
    }

    #[test]
    fn test_word_count_message_reports_exact_count() {
        let over = ValidationError::word_count(2001, 0, 2000);
        assert!(over.message.contains("2001 words"));
        assert!(over.message.contains("2000 word limit"));

        let under = ValidationError::word_count(12, 50, 2000);
        assert!(under.message.contains("12 words"));
        assert!(under.message.contains("50 word minimum"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(TinteroError::MissingCredential("api key".into()).is_fatal());
        assert!(TinteroError::Config("bad value".into()).is_fatal());
        assert!(
            TinteroError::Upstream {
                status: 503,
                body: "overloaded".into()
            }
            .is_recoverable()
        );
        assert!(TinteroError::Validation(ValidationError::empty_text()).is_recoverable());
    }

    #[test]
    fn test_upstream_display() {
        let err = TinteroError::Upstream {
            status: 429,
            body: "too many requests".into(),
        };
        assert_eq!(err.to_string(), "Upstream error (429): too many requests");
    }
}
