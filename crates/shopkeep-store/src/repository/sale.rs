//! # Sales Ledger
//!
//! Append-only history of committed sale lines, mirrored to `sales.csv`.
//!
//! ## File Layout
//! ```text
//! sale_id,product_id,product_name,quantity_sold,total_price
//! 100,1,Widget,3,29.97
//! 100,2,"Bolt, M6",10,1.50
//! ```
//!
//! Files written by the older tool (`sale_id,Pid,Pname,Quantity_sold,total_price`,
//! float totals) still load.
//!
//! Lines keep the order they were recorded in. A sale id may repeat: every
//! line of one multi-item sale shares it, and the operator is free to reuse
//! ids across sales.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::csv_file::{self, CsvRow};
use crate::error::StoreResult;
use crate::repository::LoadStatus;
use shopkeep_core::validation::{validate_sale, ValidationResult};
use shopkeep_core::{AuditEvent, AuditLog, Money, ProductId, Sale, SaleId, SalesSummary};

#[derive(Debug, Serialize, Deserialize)]
struct SaleRow {
    sale_id: SaleId,
    #[serde(alias = "Pid")]
    product_id: ProductId,
    #[serde(alias = "Pname")]
    product_name: String,
    #[serde(alias = "Quantity_sold")]
    quantity_sold: i64,
    #[serde(with = "shopkeep_core::money::decimal")]
    total_price: Money,
}

impl CsvRow for SaleRow {
    type Record = Sale;
    const HEADER: &'static [&'static str] = &[
        "sale_id",
        "product_id",
        "product_name",
        "quantity_sold",
        "total_price",
    ];

    fn into_record(self) -> ValidationResult<Sale> {
        let sale = Sale {
            sale_id: self.sale_id,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity_sold: self.quantity_sold,
            total_price: self.total_price,
        };
        validate_sale(&sale)?;
        Ok(sale)
    }

    fn from_record(sale: &Sale) -> Self {
        SaleRow {
            sale_id: sale.sale_id,
            product_id: sale.product_id,
            product_name: sale.product_name.clone(),
            quantity_sold: sale.quantity_sold,
            total_price: sale.total_price,
        }
    }
}

/// File-backed sale history.
///
/// ## Usage
/// ```rust,ignore
/// let mut ledger = SalesLedger::open("sales.csv", audit)?;
/// ledger.record(Sale::from_product(100, &widget, 3)?)?;
///
/// let summary = ledger.summary();
/// println!("{} lines, {}", summary.line_count, summary.revenue);
/// ```
pub struct SalesLedger {
    path: PathBuf,
    sales: Vec<Sale>,
    audit: Arc<dyn AuditLog>,
}

impl fmt::Debug for SalesLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalesLedger")
            .field("path", &self.path)
            .field("sales", &self.sales.len())
            .finish()
    }
}

impl SalesLedger {
    /// Creates an empty ledger bound to `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>, audit: Arc<dyn AuditLog>) -> Self {
        SalesLedger {
            path: path.into(),
            sales: Vec::new(),
            audit,
        }
    }

    /// Creates a ledger bound to `path` and loads it.
    pub fn open(path: impl Into<PathBuf>, audit: Arc<dyn AuditLog>) -> StoreResult<Self> {
        let mut ledger = SalesLedger::new(path, audit);
        ledger.load()?;
        Ok(ledger)
    }

    /// Replaces the in-memory history with the file's.
    ///
    /// Same outcomes as [`ProductStore::load`](crate::ProductStore::load),
    /// with `SalesLoaded` / `SalesFileMissing` events.
    pub fn load(&mut self) -> StoreResult<LoadStatus> {
        let Some(sales) = csv_file::read_rows::<SaleRow>(&self.path)? else {
            self.sales.clear();
            self.audit.record(&AuditEvent::SalesFileMissing {
                path: self.path.clone(),
            });
            return Ok(LoadStatus::NotFound);
        };

        self.sales = sales;

        let count = self.sales.len();
        self.audit.record(&AuditEvent::SalesLoaded {
            path: self.path.clone(),
            count,
        });

        Ok(LoadStatus::Loaded { count })
    }

    /// Rewrites the file from the in-memory history.
    pub fn save(&self) -> StoreResult<()> {
        let count = csv_file::write_rows::<SaleRow, _>(&self.path, &self.sales)?;

        self.audit.record(&AuditEvent::SalesSaved {
            path: self.path.clone(),
            count,
        });

        Ok(())
    }

    /// Appends a sale line and rewrites the file.
    ///
    /// The line is validated first. If the rewrite fails it is taken back
    /// out of memory.
    pub fn record(&mut self, sale: Sale) -> StoreResult<()> {
        validate_sale(&sale)?;

        let event = AuditEvent::SaleRecorded {
            sale_id: sale.sale_id,
            product_id: sale.product_id,
            product_name: sale.product_name.clone(),
            quantity: sale.quantity_sold,
            total: sale.total_price,
        };

        self.sales.push(sale);

        if let Err(err) = self.save() {
            self.sales.pop();
            return Err(err);
        }

        self.audit.record(&event);
        Ok(())
    }

    /// Snapshot of every line, in recording order.
    pub fn view(&self) -> Vec<Sale> {
        self.sales.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sale> {
        self.sales.iter()
    }

    /// Every line recorded under `sale_id`.
    pub fn lines_for(&self, sale_id: SaleId) -> impl Iterator<Item = &Sale> {
        self.sales.iter().filter(move |sale| sale.sale_id == sale_id)
    }

    /// Line count, units and revenue across the whole history.
    pub fn summary(&self) -> SalesSummary {
        SalesSummary::from_sales(&self.sales)
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
