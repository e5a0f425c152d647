//! # shopkeep-core: Pure Business Logic for Shopkeep
//!
//! This crate holds the domain of a single-shop inventory and sales tracker
//! as plain types and pure functions. Nothing in here touches the disk or the
//! terminal.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopkeep Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 shopkeep-cli (terminal menu)                    │   │
//! │  │   View Inventory ─ Add Product ─ Process Sale ─ Sales Report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            shopkeep-store (CSV files + Shop controller)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shopkeep-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   audit   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ AuditLog  │  │   rules   │  │   │
//! │  │   │   Sale    │  │  decimal  │  │AuditEvent │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO TERMINAL • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleLine, SalesSummary)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`audit`] - Audit events and the injected [`AuditLog`] sink
//!
//! ## Example Usage
//!
//! ```rust
//! use shopkeep_core::{Money, Product, Sale};
//!
//! let widget = Product::new(1, "Widget", "9.99".parse().unwrap(), 10);
//! let sale = Sale::from_product(100, &widget, 3).unwrap();
//!
//! assert_eq!(sale.total_price, Money::from_cents(2997));
//! assert_eq!(sale.product_name, "Widget");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod audit;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use audit::{AuditEvent, AuditLog, MemoryAudit, Severity};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
