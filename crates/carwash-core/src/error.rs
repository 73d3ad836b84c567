//! # Error Types
//!
//! Domain-specific error types for carwash-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  carwash-core errors (this file)                                       │
//! │  ├── CoreError        - Invoice business-rule violations               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  carwash-store errors (separate crate)                                 │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  POS API errors (in app)                                               │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → UI        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (service id, field, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each variant is a distinct kind the caller can branch on

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Invoice computation errors.
///
/// Every variant aborts the whole computation: no partial invoice is
/// ever produced.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line references a service id that does not resolve in the catalog
    /// at commit time.
    ///
    /// ## When This Occurs
    /// - Service was deleted after the operator added it to the form
    /// - Client sent a stale or fabricated id
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// Quantity is zero, negative, not an integer, or too large to price.
    #[error("Invalid quantity for service {service_id}: {reason}")]
    InvalidQuantity { service_id: String, reason: String },

    /// The invoice has no line items.
    #[error("Invoice must contain at least one item")]
    EmptyInvoice,

    /// A running total no longer fits in the money range.
    ///
    /// ## When This Occurs
    /// - Lines whose prices are each valid add up past the money range
    /// - A report sums more revenue than the range can hold
    #[error("Amount out of range: {0}")]
    AmountOverflow(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidQuantity error.
    pub fn invalid_quantity(service_id: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidQuantity {
            service_id: service_id.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Surfaced to the caller verbatim; recoverable by resubmitting
/// corrected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed RTN, bad decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
