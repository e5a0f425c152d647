//! # Audit Events
//!
//! The vocabulary of things worth recording, and the sink they are sent to.
//!
//! ## Dependency Injection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Audit Flow                                        │
//! │                                                                         │
//! │  shopkeep-cli main                                                     │
//! │       │  builds Arc<dyn AuditLog> (TracingAudit)                       │
//! │       ▼                                                                 │
//! │  Shop::open(paths, audit.clone())                                      │
//! │       ├──► ProductStore  ── record(ProductAdded { .. })                │
//! │       └──► SalesLedger   ── record(SaleRecorded { .. })                │
//! │                                                                         │
//! │  Tests hand in a MemoryAudit and assert on the collected events.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No component reaches for a global logger; whoever constructs a store
//! decides where its events go.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::money::Money;
use crate::types::{ProductId, SaleId};

// =============================================================================
// Severity
// =============================================================================

/// How loudly an event should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

// =============================================================================
// Audit Event
// =============================================================================

/// Everything the stores, the controller and the menu report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    // -------------------------------------------------------------------------
    // Inventory file
    // -------------------------------------------------------------------------
    InventoryLoaded { path: PathBuf, count: usize },
    /// Backing file absent at load; the store starts empty.
    InventoryFileMissing { path: PathBuf },
    InventorySaved { path: PathBuf, count: usize },

    // -------------------------------------------------------------------------
    // Product mutations
    // -------------------------------------------------------------------------
    ProductAdded {
        product_id: ProductId,
        name: String,
        replaced: bool,
    },
    QuantityUpdated {
        product_id: ProductId,
        name: String,
        amount: i64,
        remaining: i64,
    },
    /// Units put back after a sale line could not be recorded.
    StockRestored {
        product_id: ProductId,
        name: String,
        amount: i64,
        remaining: i64,
    },
    /// Stock change requested for an id the store doesn't know.
    UnknownProductUpdate { product_id: ProductId },

    // -------------------------------------------------------------------------
    // Sales file
    // -------------------------------------------------------------------------
    SalesLoaded { path: PathBuf, count: usize },
    SalesFileMissing { path: PathBuf },
    SalesSaved { path: PathBuf, count: usize },

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------
    SaleRecorded {
        sale_id: SaleId,
        product_id: ProductId,
        product_name: String,
        quantity: i64,
        total: Money,
    },
    SaleProcessed {
        sale_id: SaleId,
        product_id: ProductId,
        product_name: String,
        quantity: i64,
        total: Money,
    },
    SaleUnknownProduct {
        sale_id: SaleId,
        product_id: ProductId,
    },
    SaleInsufficientStock {
        sale_id: SaleId,
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    // -------------------------------------------------------------------------
    // Terminal session
    // -------------------------------------------------------------------------
    InvalidMenuChoice { input: String },
    /// Operator typed something a prompt couldn't accept.
    InvalidInput { field: String, input: String },
    SystemExit,
}

impl AuditEvent {
    /// Severity of the event.
    ///
    /// ```text
    /// Error    : *FileMissing
    /// Warning  : unknown product, insufficient stock, bad operator input
    /// Info     : everything else
    /// ```
    pub fn severity(&self) -> Severity {
        match self {
            AuditEvent::InventoryFileMissing { .. } | AuditEvent::SalesFileMissing { .. } => {
                Severity::Error
            }

            AuditEvent::UnknownProductUpdate { .. }
            | AuditEvent::StockRestored { .. }
            | AuditEvent::SaleUnknownProduct { .. }
            | AuditEvent::SaleInsufficientStock { .. }
            | AuditEvent::InvalidMenuChoice { .. }
            | AuditEvent::InvalidInput { .. } => Severity::Warning,

            _ => Severity::Info,
        }
    }

    /// Short machine-friendly name, used as the `event` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuditEvent::InventoryLoaded { .. } => "inventory_loaded",
            AuditEvent::InventoryFileMissing { .. } => "inventory_file_missing",
            AuditEvent::InventorySaved { .. } => "inventory_saved",
            AuditEvent::ProductAdded { .. } => "product_added",
            AuditEvent::QuantityUpdated { .. } => "quantity_updated",
            AuditEvent::StockRestored { .. } => "stock_restored",
            AuditEvent::UnknownProductUpdate { .. } => "unknown_product_update",
            AuditEvent::SalesLoaded { .. } => "sales_loaded",
            AuditEvent::SalesFileMissing { .. } => "sales_file_missing",
            AuditEvent::SalesSaved { .. } => "sales_saved",
            AuditEvent::SaleRecorded { .. } => "sale_recorded",
            AuditEvent::SaleProcessed { .. } => "sale_processed",
            AuditEvent::SaleUnknownProduct { .. } => "sale_unknown_product",
            AuditEvent::SaleInsufficientStock { .. } => "sale_insufficient_stock",
            AuditEvent::InvalidMenuChoice { .. } => "invalid_menu_choice",
            AuditEvent::InvalidInput { .. } => "invalid_input",
            AuditEvent::SystemExit => "system_exit",
        }
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEvent::InventoryLoaded { path, count } => {
                write!(f, "Inventory loaded successfully ({} products from {}).", count, path.display())
            }
            AuditEvent::InventoryFileMissing { path } => {
                write!(f, "Inventory file not found: {}. Starting with an empty inventory.", path.display())
            }
            AuditEvent::InventorySaved { path, count } => {
                write!(f, "Inventory saved successfully ({} products to {}).", count, path.display())
            }
            AuditEvent::ProductAdded {
                product_id,
                name,
                replaced,
            } => {
                let verb = if *replaced { "replaced" } else { "added" };
                write!(f, "Product {}: {} (PID: {})", verb, name, product_id)
            }
            AuditEvent::QuantityUpdated {
                product_id,
                name,
                amount,
                remaining,
            } => write!(
                f,
                "Updated stock for {} (PID: {}) by {} units, {} remaining.",
                name, product_id, amount, remaining
            ),
            AuditEvent::StockRestored {
                product_id,
                name,
                amount,
                remaining,
            } => write!(
                f,
                "Restored {} units of {} (PID: {}) after a failed sale, {} remaining.",
                amount, name, product_id, remaining
            ),
            AuditEvent::UnknownProductUpdate { product_id } => write!(
                f,
                "Attempted to update quantity for non-existent product (PID: {}).",
                product_id
            ),
            AuditEvent::SalesLoaded { path, count } => {
                write!(f, "Sales records loaded successfully ({} records from {}).", count, path.display())
            }
            AuditEvent::SalesFileMissing { path } => {
                write!(f, "Sales file not found: {}. Starting with no sales records.", path.display())
            }
            AuditEvent::SalesSaved { path, count } => {
                write!(f, "Sales records saved successfully ({} records to {}).", count, path.display())
            }
            AuditEvent::SaleRecorded {
                product_id,
                product_name,
                quantity,
                total,
                ..
            } => write!(
                f,
                "Sale recorded: {} (PID: {}), Quantity: {}, Total: {}",
                product_name, product_id, quantity, total
            ),
            AuditEvent::SaleProcessed {
                sale_id,
                product_id,
                product_name,
                quantity,
                total,
            } => write!(
                f,
                "Sale {} processed: {} (PID: {}), Quantity: {}, Total: {}",
                sale_id, product_name, product_id, quantity, total
            ),
            AuditEvent::SaleUnknownProduct { product_id, .. } => {
                write!(f, "Attempted sale for non-existent product (PID: {}).", product_id)
            }
            AuditEvent::SaleInsufficientStock {
                product_id,
                available,
                requested,
                ..
            } => write!(
                f,
                "Attempted sale with insufficient stock (PID: {}): available {}, requested {}.",
                product_id, available, requested
            ),
            AuditEvent::InvalidMenuChoice { input } => {
                write!(f, "Invalid menu choice entered: {:?}.", input)
            }
            AuditEvent::InvalidInput { field, input } => {
                write!(f, "Invalid {} entered: {:?}.", field, input)
            }
            AuditEvent::SystemExit => write!(f, "System exit."),
        }
    }
}

// =============================================================================
// Audit Log Sink
// =============================================================================

/// Receives audit events. Implementations decide where they go.
pub trait AuditLog: Send + Sync {
    fn record(&self, event: &AuditEvent);
}

/// Keeps every event in memory, in order. Meant for tests.
///
/// ## Usage
/// ```rust
/// use std::sync::Arc;
/// use shopkeep_core::{AuditEvent, AuditLog, MemoryAudit};
///
/// let audit = Arc::new(MemoryAudit::new());
/// audit.record(&AuditEvent::SystemExit);
/// assert_eq!(audit.events(), vec![AuditEvent::SystemExit]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryAudit {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAudit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Names of the recorded events, in order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(AuditEvent::kind)
            .collect()
    }

    /// Number of recorded events with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| event.severity() == severity)
            .count()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl AuditLog for MemoryAudit {
    fn record(&self, event: &AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
