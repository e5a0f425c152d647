//! # shopkeep-store: Flat-File Persistence for Shopkeep
//!
//! This crate keeps the inventory and the sales history in two CSV files
//! and runs sales against them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopkeep Data Flow                               │
//! │                                                                         │
//! │  Terminal menu (shopkeep-cli)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  shopkeep-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Shop      │    │  Repositories │    │   csv_file   │  │   │
//! │  │   │   (shop.rs)   │    │               │    │              │  │   │
//! │  │   │               │───►│ ProductStore  │───►│ read_rows    │  │   │
//! │  │   │ process_line  │    │ SalesLedger   │    │ write_rows   │  │   │
//! │  │   │ process_sale  │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        inventory.csv                     sales.csv              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`repository`] - Product Store and Sales Ledger
//! - [`shop`] - Controller that validates and commits sale lines
//! - [`audit`] - `tracing`-backed audit sink
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopkeep_store::{Shop, ShopPaths, TracingAudit};
//!
//! let mut shop = Shop::open(&ShopPaths::default(), Arc::new(TracingAudit))?;
//!
//! shop.add_product(Product::new(1, "Widget", "9.99".parse()?, 10))?;
//! let sale = shop.process_line(100, SaleLine::new(1, 3))?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod audit;
mod csv_file;
pub mod error;
pub mod repository;
pub mod shop;

// =============================================================================
// Re-exports
// =============================================================================

pub use audit::TracingAudit;
pub use error::{StoreError, StoreResult};
pub use repository::LoadStatus;
pub use shop::{LineRejection, SaleReport, Shop, ShopPaths};

// Repository re-exports for convenience
pub use repository::product::ProductStore;
pub use repository::sale::SalesLedger;
