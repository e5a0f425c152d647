//! # Error Types
//!
//! Domain-specific error types for shopkeep-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopkeep-core errors (this file)                                      │
//! │  ├── CoreError        - Rejected sale lines                            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shopkeep-store errors (separate crate)                                │
//! │  └── StoreError       - File I/O and malformed rows                    │
//! │                                                                         │
//! │  shopkeep-cli errors (in app)                                          │
//! │  └── CliError         - Startup failures (config, logging)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CliError             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error in this file is recoverable: the operator is told what went
//! wrong and the menu keeps running.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while processing a sale line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The referenced product id is not in the inventory.
    ///
    /// ## When This Occurs
    /// - Operator typed a product id that was never added
    /// - Inventory file was replaced between sessions
    #[error("Product not found: {0}")]
    UnknownProduct(ProductId),

    /// Requested quantity exceeds what is on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale line (id: 1, qty: 20)
    ///      │
    ///      ▼
    /// Check stock: available=7
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 1, available: 7, requested: 20 }
    ///      │
    ///      ▼
    /// Menu prints "Insufficient stock!" and asks for the next line
    /// ```
    #[error("Insufficient stock for {name} (ID {product_id}): available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before anything is mutated, so a failed validation never leaves
/// partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value does not fit the numeric range (e.g. price × quantity
    /// past `i64::MAX` cents).
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Text could not be parsed (e.g. "abc" as a price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for an [`ValidationError::InvalidFormat`] error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 1,
            name: "Widget".to_string(),
            available: 7,
            requested: 20,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Widget (ID 1): available 7, requested 20"
        );

        assert_eq!(CoreError::UnknownProduct(42).to_string(), "Product not found: 42");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooLarge {
            field: "total_price".to_string(),
        };
        assert_eq!(err.to_string(), "total_price is too large");

        let err = ValidationError::invalid_format("price", "not a number");
        assert_eq!(err.to_string(), "price has invalid format: not a number");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
