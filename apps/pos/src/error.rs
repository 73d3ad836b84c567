//! # API Error Type
//!
//! Unified error type for POS commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Carwash POS                            │
//! │                                                                         │
//! │  UI                           Rust Backend                              │
//! │  ──                           ────────────                              │
//! │                                                                         │
//! │  {"command":"create_invoice"}                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ─── StoreError::UniqueViolation ─────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Core Error? ──── CoreError::UnknownService ───── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  {"id":7,"error":{"code":"UNKNOWN_SERVICE","message":"..."}}           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use carwash_core::{CoreError, ValidationError};
use carwash_store::StoreError;
use serde::{Deserialize, Serialize};

/// API error returned from POS commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Invoice not found: 5f1c..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (malformed RTN, missing field, bad request)
    ValidationError,

    /// A line references a service that is not in the catalog
    UnknownService,

    /// Quantity is not a positive integer
    InvalidQuantity,

    /// Invoice has no lines
    EmptyInvoice,

    /// Resource not found
    NotFound,

    /// Unique key already taken (service code, client RTN)
    Duplicate,

    /// Storage could not complete the operation
    StorageFailure,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownService(_) => ApiError::new(ErrorCode::UnknownService, err.to_string()),
            CoreError::InvalidQuantity { .. } => {
                ApiError::new(ErrorCode::InvalidQuantity, err.to_string())
            }
            CoreError::EmptyInvoice => ApiError::new(ErrorCode::EmptyInvoice, err.to_string()),
            CoreError::AmountOverflow(_) => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Duplicate,
                format!("{} '{}' already exists", field, value),
            ),
            StoreError::EmptyInvoice => {
                ApiError::new(ErrorCode::EmptyInvoice, "Invoice must contain at least one item")
            }
            StoreError::SequenceExhausted { max } => {
                tracing::error!(max, "Invoice sequence exhausted");
                ApiError::new(ErrorCode::StorageFailure, "No invoice numbers left in this range")
            }
            StoreError::StorageFailure(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Storage failure: {}", e);
                ApiError::new(ErrorCode::StorageFailure, "Storage operation failed")
            }
            StoreError::Core(e) => e.into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::validation(format!("Invalid arguments: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_codes() {
        let cases = [
            (CoreError::UnknownService("x".into()), ErrorCode::UnknownService),
            (CoreError::invalid_quantity("x", "must be positive"), ErrorCode::InvalidQuantity),
            (CoreError::EmptyInvoice, ErrorCode::EmptyInvoice),
            (CoreError::AmountOverflow("invoice total".into()), ErrorCode::ValidationError),
            (
                CoreError::Validation(ValidationError::Required { field: "rtn".into() }),
                ErrorCode::ValidationError,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(ApiError::from(err).code, code);
        }
    }

    #[test]
    fn test_store_error_codes() {
        assert_eq!(
            ApiError::from(StoreError::not_found("Invoice", "abc")).code,
            ErrorCode::NotFound
        );
        assert_eq!(
            ApiError::from(StoreError::duplicate("code", "LAV001")).code,
            ErrorCode::Duplicate
        );
        assert_eq!(
            ApiError::from(StoreError::Core(CoreError::EmptyInvoice)).code,
            ErrorCode::EmptyInvoice
        );
    }

    #[test]
    fn test_storage_failure_message_is_generic() {
        let api = ApiError::from(StoreError::StorageFailure("disk on fire".into()));
        assert_eq!(api.code, ErrorCode::StorageFailure);
        assert!(!api.message.contains("disk"));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(ApiError::not_found("Invoice", "abc")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Invoice not found: abc");

        let json = serde_json::to_value(ApiError::new(ErrorCode::UnknownService, "x")).unwrap();
        assert_eq!(json["code"], "UNKNOWN_SERVICE");
    }
}
