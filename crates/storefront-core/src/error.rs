//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Form input failures                            │
//! │                                                                         │
//! │  storefront-db errors                                                  │
//! │  └── DbError          - Local storage failures                         │
//! │                                                                         │
//! │  storefront-client errors                                              │
//! │  └── ClientError      - Backend/network failures                       │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── AppError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → user-facing message    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors are raised before any network call; they are only
//! distinguished from backend errors by where they are raised.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Requested quantity exceeds what is left in stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart line: "Linen shirt" (stock: 3)
    ///      │
    ///      ▼
    /// User types quantity 5
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Linen shirt", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Warning: "Only 3 left in stock for Linen shirt", input reverts
    /// ```
    #[error("Only {available} left in stock for {product} (requested {requested})")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Quantity below the minimum of one.
    #[error("Quantity must be at least 1 (requested {requested})")]
    QuantityTooSmall { requested: i64 },

    /// Product is out of stock entirely.
    #[error("{product} is out of stock")]
    OutOfStock { product: String },

    /// Comparison list is at capacity.
    #[error("You can compare at most {max} products")]
    ComparisonFull { max: usize },

    /// Cart item is not in the current cart.
    #[error("Cart item not found: {0}")]
    CartItemNotFound(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// End of a date range precedes its start.
    #[error("{end_field} must not be before {start_field}")]
    DateOrder {
        start_field: String,
        end_field: String,
    },

    /// A selection that must not be empty is empty.
    #[error("select at least one {what}")]
    EmptySelection { what: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
