//! # Store Error Types
//!
//! Error types for storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (pricing, validation)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds uniqueness, lookup, sequence failures │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in POS app) ← Serialized for the UI                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use carwash_core::{CoreError, ValidationError};
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - Updating or deleting a service id that does not exist
    /// - Looking up a client id that was never created
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique key already taken.
    ///
    /// ## When This Occurs
    /// - Creating or renaming a service to an existing code
    /// - Creating a client with an RTN already on file
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// The 9-digit invoice counter has no numbers left.
    #[error("Invoice sequence exhausted (max {max})")]
    SequenceExhausted { max: u64 },

    /// An invoice commit was attempted without lines.
    #[error("Invoice must contain at least one line")]
    EmptyInvoice,

    /// The backing store could not complete the operation.
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// Domain error raised while preparing the write.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
