//! # Shop Controller
//!
//! Ties the inventory and the sales ledger together for sales.
//!
//! ## Sale Line Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    process_line(sale_id, line)                          │
//! │                                                                         │
//! │  product known?            no  → UnknownProduct      (warning, no I/O) │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  quantity <= on hand?      no  → InsufficientStock   (warning, no I/O) │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  quantity > 0?             no  → Validation                  (no I/O)  │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  snapshot Sale (name, unit_price × quantity)                           │
//! │       │                    total past i64?  → Validation     (no I/O)  │
//! │       ├──► ProductStore::decrement_quantity  → inventory.csv rewritten │
//! │       └──► SalesLedger::record               → sales.csv rewritten     │
//! │                 │ fails                                                 │
//! │                 └──► ProductStore::restock   → units put back          │
//! │                                                                         │
//! │  SaleProcessed event                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method takes `&mut self`, so the stock check and the decrement can
//! never interleave with another sale.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::StoreResult;
use crate::repository::product::ProductStore;
use crate::repository::sale::SalesLedger;
use shopkeep_core::validation::validate_sale_quantity;
use shopkeep_core::{
    AuditEvent, AuditLog, CoreError, CoreResult, Money, Product, ProductId, Sale, SaleId,
    SaleLine,
};

// =============================================================================
// Paths
// =============================================================================

/// Where the two backing files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopPaths {
    pub inventory: PathBuf,
    pub sales: PathBuf,
}

impl ShopPaths {
    pub fn new(inventory: impl Into<PathBuf>, sales: impl Into<PathBuf>) -> Self {
        ShopPaths {
            inventory: inventory.into(),
            sales: sales.into(),
        }
    }
}

impl Default for ShopPaths {
    /// `inventory.csv` and `sales.csv` in the working directory.
    fn default() -> Self {
        ShopPaths::new("inventory.csv", "sales.csv")
    }
}

// =============================================================================
// Sale Report
// =============================================================================

/// A line that was turned down, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRejection {
    pub line: SaleLine,
    pub error: CoreError,
}

/// Outcome of a multi-line sale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaleReport {
    pub sale_id: SaleId,
    /// Committed lines, in input order.
    pub accepted: Vec<Sale>,
    /// Refused lines, in input order.
    pub rejected: Vec<LineRejection>,
}

impl SaleReport {
    /// Sum of the accepted line totals.
    pub fn total(&self) -> Money {
        self.accepted.iter().map(|sale| sale.total_price).sum()
    }

    /// True when no line was refused.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

// =============================================================================
// Shop
// =============================================================================

/// The controller: one inventory, one ledger, one audit sink.
pub struct Shop {
    inventory: ProductStore,
    ledger: SalesLedger,
    audit: Arc<dyn AuditLog>,
}

impl fmt::Debug for Shop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shop")
            .field("inventory", &self.inventory)
            .field("ledger", &self.ledger)
            .finish()
    }
}

impl Shop {
    /// Opens both backing files.
    ///
    /// Missing files are fine (empty collections); malformed ones are not.
    pub fn open(paths: &ShopPaths, audit: Arc<dyn AuditLog>) -> StoreResult<Self> {
        let inventory = ProductStore::open(&paths.inventory, audit.clone())?;
        let ledger = SalesLedger::open(&paths.sales, audit.clone())?;

        Ok(Shop::from_parts(inventory, ledger, audit))
    }

    /// Builds a controller around stores that are already set up.
    pub fn from_parts(inventory: ProductStore, ledger: SalesLedger, audit: Arc<dyn AuditLog>) -> Self {
        Shop {
            inventory,
            ledger,
            audit,
        }
    }

    pub fn inventory(&self) -> &ProductStore {
        &self.inventory
    }

    pub fn ledger(&self) -> &SalesLedger {
        &self.ledger
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.inventory.get(id)
    }

    /// Adds or replaces a product. See [`ProductStore::add`].
    pub fn add_product(&mut self, product: Product) -> StoreResult<Option<Product>> {
        self.inventory.add(product)
    }

    /// Looks up the product a sale line refers to.
    ///
    /// An unknown id is recorded as a `SaleUnknownProduct` warning. The
    /// terminal uses this to refuse a product before asking for a quantity.
    pub fn product_for_sale(&self, sale_id: SaleId, product_id: ProductId) -> CoreResult<&Product> {
        self.inventory.get(product_id).ok_or_else(|| {
            self.audit.record(&AuditEvent::SaleUnknownProduct {
                sale_id,
                product_id,
            });
            CoreError::UnknownProduct(product_id)
        })
    }

    /// Sells one line.
    ///
    /// ## Errors
    /// - `Core(UnknownProduct)` / `Core(InsufficientStock)` /
    ///   `Core(Validation)`: nothing changed
    /// - `Io` / `Csv`: a backing file couldn't be rewritten. If the ledger
    ///   write fails the units are put back, so stock is unchanged.
    ///
    /// ## Example
    /// ```rust,ignore
    /// // Widget: 9.99, 10 in stock
    /// let sale = shop.process_line(100, SaleLine::new(1, 3))?;
    /// assert_eq!(sale.total_price.to_decimal_string(), "29.97");
    /// assert_eq!(shop.product(1).unwrap().quantity, 7);
    /// ```
    pub fn process_line(&mut self, sale_id: SaleId, line: SaleLine) -> StoreResult<Sale> {
        let product = self.product_for_sale(sale_id, line.product_id)?;

        if !product.can_sell(line.quantity) {
            self.audit.record(&AuditEvent::SaleInsufficientStock {
                sale_id,
                product_id: product.id,
                available: product.quantity,
                requested: line.quantity,
            });
            return Err(CoreError::InsufficientStock {
                product_id: product.id,
                name: product.name.clone(),
                available: product.quantity,
                requested: line.quantity,
            }
            .into());
        }

        validate_sale_quantity(line.quantity).map_err(CoreError::from)?;

        let sale = Sale::from_product(sale_id, product, line.quantity).map_err(CoreError::from)?;

        debug!(
            sale_id,
            product_id = line.product_id,
            quantity = line.quantity,
            "Committing sale line"
        );

        // Stock is taken before the line reaches the ledger.
        self.inventory
            .decrement_quantity(line.product_id, line.quantity)?;

        if let Err(err) = self.ledger.record(sale.clone()) {
            if let Err(restock_err) = self.inventory.restock(line.product_id, line.quantity) {
                error!(
                    sale_id,
                    product_id = line.product_id,
                    quantity = line.quantity,
                    error = %restock_err,
                    "Could not put units back after a failed sale record"
                );
            }
            return Err(err);
        }

        self.audit.record(&AuditEvent::SaleProcessed {
            sale_id,
            product_id: sale.product_id,
            product_name: sale.product_name.clone(),
            quantity: sale.quantity_sold,
            total: sale.total_price,
        });

        Ok(sale)
    }

    /// Sells several lines under one sale id.
    ///
    /// Refused lines are collected and the rest still go through. A file
    /// error stops the batch; lines committed before it stay committed.
    pub fn process_sale<I>(&mut self, sale_id: SaleId, lines: I) -> StoreResult<SaleReport>
    where
        I: IntoIterator<Item = SaleLine>,
    {
        let mut report = SaleReport {
            sale_id,
            ..SaleReport::default()
        };

        for line in lines {
            match self.process_line(sale_id, line) {
                Ok(sale) => report.accepted.push(sale),
                Err(err) => {
                    let error = err.into_rejection()?;
                    report.rejected.push(LineRejection { line, error });
                }
            }
        }

        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::repository::LoadStatus;
    use shopkeep_core::{MemoryAudit, Severity, ValidationError};
    use std::fs;

    fn widget() -> Product {
        Product::new(1, "Widget", Money::from_cents(999), 10)
    }

    fn temp_shop() -> (tempfile::TempDir, Shop, Arc<MemoryAudit>) {
        let dir = tempfile::tempdir().unwrap();
        let paths = ShopPaths::new(dir.path().join("inventory.csv"), dir.path().join("sales.csv"));
        let audit = Arc::new(MemoryAudit::new());
        let shop = Shop::open(&paths, audit.clone()).unwrap();
        (dir, shop, audit)
    }

    fn file_text(shop: &Shop) -> (String, String) {
        (
            fs::read_to_string(shop.inventory().path()).unwrap_or_default(),
            fs::read_to_string(shop.ledger().path()).unwrap_or_default(),
        )
    }

    #[test]
    fn test_open_with_no_files() {
        let (_dir, shop, audit) = temp_shop();

        assert!(shop.inventory().is_empty());
        assert!(shop.ledger().is_empty());
        assert_eq!(audit.kinds(), vec!["inventory_file_missing", "sales_file_missing"]);
    }

    #[test]
    fn test_widget_scenario() {
        let (_dir, mut shop, audit) = temp_shop();
        shop.add_product(widget()).unwrap();

        let sale = shop.process_line(100, SaleLine::new(1, 3)).unwrap();
        assert_eq!(sale.total_price.to_decimal_string(), "29.97");
        assert_eq!(sale.product_name, "Widget");
        assert_eq!(shop.product(1).unwrap().quantity, 7);
        assert_eq!(shop.ledger().len(), 1);

        let before = file_text(&shop);
        audit.clear();

        let err = shop.process_line(100, SaleLine::new(1, 20)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock {
                available: 7,
                requested: 20,
                ..
            })
        ));
        assert_eq!(shop.product(1).unwrap().quantity, 7);
        assert_eq!(shop.ledger().len(), 1);
        assert_eq!(file_text(&shop), before);
        assert_eq!(audit.kinds(), vec!["sale_insufficient_stock"]);
    }

    #[test]
    fn test_unknown_product_changes_nothing() {
        let (_dir, mut shop, audit) = temp_shop();
        shop.add_product(widget()).unwrap();
        let before = file_text(&shop);
        audit.clear();

        let err = shop.process_line(5, SaleLine::new(99, 1)).unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::UnknownProduct(99))));
        assert!(err.is_recoverable());

        assert_eq!(file_text(&shop), before);
        assert_eq!(audit.kinds(), vec!["sale_unknown_product"]);
        assert_eq!(audit.count(Severity::Warning), 1);
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let (_dir, mut shop, _audit) = temp_shop();
        shop.add_product(widget()).unwrap();

        for qty in [0, -4] {
            let err = shop.process_line(1, SaleLine::new(1, qty)).unwrap_err();
            assert!(matches!(
                err,
                StoreError::Core(CoreError::Validation(ValidationError::MustBePositive { .. }))
            ));
        }
        assert_eq!(shop.product(1).unwrap().quantity, 10);
        assert!(shop.ledger().is_empty());
    }

    #[test]
    fn test_sell_entire_stock() {
        let (_dir, mut shop, _audit) = temp_shop();
        shop.add_product(widget()).unwrap();

        shop.process_line(1, SaleLine::new(1, 10)).unwrap();
        assert_eq!(shop.product(1).unwrap().quantity, 0);

        assert!(shop.process_line(2, SaleLine::new(1, 1)).is_err());
    }

    #[test]
    fn test_total_frozen_after_price_change() {
        let (_dir, mut shop, _audit) = temp_shop();
        shop.add_product(widget()).unwrap();
        shop.process_line(1, SaleLine::new(1, 3)).unwrap();

        shop.add_product(Product::new(1, "Widget v2", Money::from_cents(1999), 7))
            .unwrap();

        let recorded = &shop.ledger().view()[0];
        assert_eq!(recorded.product_name, "Widget");
        assert_eq!(recorded.total_price, Money::from_cents(2997));
    }

    #[test]
    fn test_process_sale_collects_rejections() {
        let (_dir, mut shop, audit) = temp_shop();
        shop.add_product(widget()).unwrap();
        shop.add_product(Product::new(2, "Bolt", Money::from_cents(15), 400))
            .unwrap();
        audit.clear();

        let report = shop
            .process_sale(
                100,
                [
                    SaleLine::new(1, 3),
                    SaleLine::new(42, 1),
                    SaleLine::new(2, 10),
                    SaleLine::new(1, 50),
                ],
            )
            .unwrap();

        assert_eq!(report.sale_id, 100);
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.total(), Money::from_cents(2997 + 150));
        assert!(!report.is_complete());
        assert_eq!(
            report.rejected,
            vec![
                LineRejection {
                    line: SaleLine::new(42, 1),
                    error: CoreError::UnknownProduct(42),
                },
                LineRejection {
                    line: SaleLine::new(1, 50),
                    error: CoreError::InsufficientStock {
                        product_id: 1,
                        name: "Widget".to_string(),
                        available: 7,
                        requested: 50,
                    },
                },
            ]
        );

        assert_eq!(shop.ledger().lines_for(100).count(), 2);
        assert_eq!(audit.count(Severity::Warning), 2);
        assert_eq!(
            audit
                .kinds()
                .iter()
                .filter(|kind| **kind == "sale_processed")
                .count(),
            2
        );
    }

    #[test]
    fn test_state_survives_reopen() {
        let (dir, mut shop, _audit) = temp_shop();
        shop.add_product(widget()).unwrap();
        shop.process_sale(7, [SaleLine::new(1, 2), SaleLine::new(1, 1)])
            .unwrap();

        let paths = ShopPaths::new(dir.path().join("inventory.csv"), dir.path().join("sales.csv"));
        let audit = Arc::new(MemoryAudit::new());
        let reopened = Shop::open(&paths, audit.clone()).unwrap();

        assert_eq!(reopened.product(1).unwrap().quantity, 7);
        assert_eq!(reopened.ledger().view(), shop.ledger().view());
        assert_eq!(reopened.ledger().summary().units_sold, 3);
        assert_eq!(audit.kinds(), vec!["inventory_loaded", "sales_loaded"]);

        let mut ledger = SalesLedger::new(&paths.sales, audit);
        assert_eq!(ledger.load().unwrap(), LoadStatus::Loaded { count: 2 });
    }

    #[test]
    fn test_file_error_aborts_sale() {
        let (dir, mut shop, _audit) = temp_shop();
        shop.add_product(widget()).unwrap();

        // Block the sales file rewrite
        fs::create_dir(dir.path().join("sales.csv")).unwrap();

        let result = shop.process_sale(1, [SaleLine::new(1, 2), SaleLine::new(1, 2)]);
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(shop.ledger().is_empty());

        // Units taken for the unrecorded line are back, in memory and on disk
        assert_eq!(shop.product(1).unwrap().quantity, 10);
        assert!(file_text(&shop).0.contains("1,Widget,9.99,10"));
    }

    #[test]
    fn test_failed_record_restores_stock() {
        let (dir, mut shop, audit) = temp_shop();
        shop.add_product(widget()).unwrap();
        fs::create_dir(dir.path().join("sales.csv")).unwrap();
        audit.clear();

        let err = shop.process_line(1, SaleLine::new(1, 3)).unwrap_err();
        assert!(!err.is_recoverable());

        assert_eq!(shop.product(1).unwrap().quantity, 10);
        assert!(shop.ledger().is_empty());
        assert_eq!(
            audit.kinds(),
            vec!["inventory_saved", "quantity_updated", "inventory_saved", "stock_restored"]
        );

        let reopened = ProductStore::open(dir.path().join("inventory.csv"), audit.clone()).unwrap();
        assert_eq!(reopened.get(1), Some(&widget()));
    }

    #[test]
    fn test_oversized_total_is_rejected() {
        let (_dir, mut shop, _audit) = temp_shop();
        let ingot = Product::new(1, "Ingot", "100000000000000".parse().unwrap(), 1000);
        shop.add_product(ingot.clone()).unwrap();
        let before = file_text(&shop);

        let err = shop.process_line(1, SaleLine::new(1, 1000)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));
        assert!(err.is_recoverable());

        assert_eq!(shop.product(1), Some(&ingot));
        assert!(shop.ledger().is_empty());
        assert_eq!(file_text(&shop), before);
    }
}
