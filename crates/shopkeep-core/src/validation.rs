//! # Validation Module
//!
//! Business rule validation for Shopkeep.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal prompts (shopkeep-cli)                              │
//! │  ├── Text → number parsing                                             │
//! │  └── Re-prompt on failure                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Product invariants (price >= 0, quantity >= 0)                    │
//! │  ├── Sale invariants (quantity > 0, total >= 0)                        │
//! │  └── Name rule for new products (not blank)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Stores (shopkeep-store)                                      │
//! │  ├── Invariants on add/record and on every row loaded from disk        │
//! │  └── Name rule on add only; stored names load as written               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, Sale};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates the name of a product being added.
///
/// ## Rules
/// - Must not be empty or whitespace only
///
/// Not part of [`validate_product`]: files written by older tooling may hold
/// blank names, and those still load and sell.
///
/// ```rust
/// use shopkeep_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Widget").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price or a sale total. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an on-hand stock level.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates the quantity requested on a sale line.
///
/// ## User Workflow
/// ```text
/// Operator enters quantity: 0
///      │
///      ▼
/// validate_sale_quantity(0) ← THIS FUNCTION
///      │
///      ├── qty <= 0? → Error: "quantity must be positive"
///      │
///      └── OK → stock check in the Shop controller
/// ```
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Checks the product invariants that hold for every stored record.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_price(product.unit_price)?;
    validate_stock_quantity(product.quantity)?;
    Ok(())
}

/// Checks every sale invariant.
pub fn validate_sale(sale: &Sale) -> ValidationResult<()> {
    validate_sale_quantity(sale.quantity_sold)?;
    validate_price(sale.total_price)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
