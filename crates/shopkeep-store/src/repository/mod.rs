//! # Repository Module
//!
//! The two file-backed collections.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories over flat files                         │
//! │                                                                         │
//! │  Shop controller                                                       │
//! │       │                                                                 │
//! │       ├── ProductStore                                                 │
//! │       │   ├── load() / save()                                          │
//! │       │   ├── add(product)                                             │
//! │       │   ├── decrement_quantity(id, amount)                           │
//! │       │   └── view()                                                   │
//! │       │        │  full rewrite                                          │
//! │       │        ▼                                                        │
//! │       │   inventory.csv                                                │
//! │       │                                                                 │
//! │       └── SalesLedger                                                  │
//! │           ├── load() / save()                                          │
//! │           ├── record(sale)                                             │
//! │           └── view() / summary()                                       │
//! │                │  full rewrite                                          │
//! │                ▼                                                        │
//! │           sales.csv                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductStore`](product::ProductStore) - Inventory keyed by product id
//! - [`SalesLedger`](sale::SalesLedger) - Append-only sale history

pub mod product;
pub mod sale;

/// What `load()` found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// File read; `count` records now in memory.
    Loaded { count: usize },
    /// No file yet. The collection is empty and the file will be created by
    /// the first mutation.
    NotFound,
}
