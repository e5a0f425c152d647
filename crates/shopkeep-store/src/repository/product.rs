//! # Product Store
//!
//! The inventory: every product keyed by id, mirrored to `inventory.csv`.
//!
//! ## Key Operations
//! - Load the whole file at startup
//! - Add or replace a product (rewrites the file)
//! - Take units out of stock (rewrites the file)
//!
//! ## File Layout
//! ```text
//! id,name,unit_price,quantity
//! 1,Widget,9.99,7
//! 2,"Bolt, M6",0.15,400
//! ```
//!
//! Files written by the older tool (`Pid,Pname,price,Quantity`) still load:
//! each column also accepts its legacy header.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::csv_file::{self, CsvRow};
use crate::error::StoreResult;
use crate::repository::LoadStatus;
use shopkeep_core::validation::{validate_product, validate_product_name, ValidationResult};
use shopkeep_core::{AuditEvent, AuditLog, Money, Product, ProductId};

// =============================================================================
// On-Disk Row
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct ProductRow {
    #[serde(alias = "Pid")]
    id: ProductId,
    #[serde(alias = "Pname")]
    name: String,
    #[serde(alias = "price", with = "shopkeep_core::money::decimal")]
    unit_price: Money,
    #[serde(alias = "Quantity")]
    quantity: i64,
}

impl CsvRow for ProductRow {
    type Record = Product;
    const HEADER: &'static [&'static str] = &["id", "name", "unit_price", "quantity"];

    fn into_record(self) -> ValidationResult<Product> {
        let product = Product::new(self.id, self.name, self.unit_price, self.quantity);
        validate_product(&product)?;
        Ok(product)
    }

    fn from_record(product: &Product) -> Self {
        ProductRow {
            id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity: product.quantity,
        }
    }
}

// =============================================================================
// Product Store
// =============================================================================

/// File-backed inventory.
///
/// ## Usage
/// ```rust,ignore
/// let mut store = ProductStore::open("inventory.csv", audit)?;
///
/// store.add(Product::new(1, "Widget", "9.99".parse()?, 10))?;
/// store.decrement_quantity(1, 3)?;          // 7 left, file rewritten
///
/// for product in store.view() { /* ascending id */ }
/// ```
///
/// Every mutating call rewrites the whole file before it returns. If the
/// rewrite fails the in-memory change is undone, so memory and disk agree.
pub struct ProductStore {
    path: PathBuf,
    products: BTreeMap<ProductId, Product>,
    audit: Arc<dyn AuditLog>,
}

impl fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductStore")
            .field("path", &self.path)
            .field("products", &self.products.len())
            .finish()
    }
}

impl ProductStore {
    /// Creates an empty store bound to `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>, audit: Arc<dyn AuditLog>) -> Self {
        ProductStore {
            path: path.into(),
            products: BTreeMap::new(),
            audit,
        }
    }

    /// Creates a store bound to `path` and loads it.
    ///
    /// A missing file gives an empty store; a malformed one is an error.
    pub fn open(path: impl Into<PathBuf>, audit: Arc<dyn AuditLog>) -> StoreResult<Self> {
        let mut store = ProductStore::new(path, audit);
        store.load()?;
        Ok(store)
    }

    /// Replaces the in-memory contents with the file's.
    ///
    /// ## Outcomes
    /// ```text
    /// file present, valid   → Loaded { count }, InventoryLoaded event
    /// file absent           → NotFound, store emptied, InventoryFileMissing event
    /// file present, invalid → Err(Malformed), store unchanged
    /// ```
    ///
    /// A later row with an id seen earlier replaces the earlier one.
    pub fn load(&mut self) -> StoreResult<LoadStatus> {
        let Some(rows) = csv_file::read_rows::<ProductRow>(&self.path)? else {
            self.products.clear();
            self.audit.record(&AuditEvent::InventoryFileMissing {
                path: self.path.clone(),
            });
            return Ok(LoadStatus::NotFound);
        };

        self.products = rows.into_iter().map(|p| (p.id, p)).collect();

        let count = self.products.len();
        self.audit.record(&AuditEvent::InventoryLoaded {
            path: self.path.clone(),
            count,
        });

        Ok(LoadStatus::Loaded { count })
    }

    /// Rewrites the file from the in-memory contents.
    pub fn save(&self) -> StoreResult<()> {
        let count = csv_file::write_rows::<ProductRow, _>(&self.path, self.products.values())?;

        self.audit.record(&AuditEvent::InventorySaved {
            path: self.path.clone(),
            count,
        });

        Ok(())
    }

    /// Adds a product, replacing any existing one with the same id.
    ///
    /// ## Returns
    /// The product that was replaced, if any.
    ///
    /// ## Errors
    /// - `Validation` if the name is blank or the product breaks an
    ///   invariant (nothing stored)
    /// - `Io`/`Csv` if the rewrite fails (previous entry restored)
    pub fn add(&mut self, product: Product) -> StoreResult<Option<Product>> {
        validate_product_name(&product.name)?;
        validate_product(&product)?;

        let id = product.id;
        let name = product.name.clone();
        let previous = self.products.insert(id, product);

        if let Err(err) = self.save() {
            match &previous {
                Some(old) => self.products.insert(id, old.clone()),
                None => self.products.remove(&id),
            };
            return Err(err);
        }

        debug!(product_id = id, replaced = previous.is_some(), "Stored product");

        self.audit.record(&AuditEvent::ProductAdded {
            product_id: id,
            name,
            replaced: previous.is_some(),
        });

        Ok(previous)
    }

    /// Takes `amount` units out of stock.
    ///
    /// ## Returns
    /// - `Some(remaining)` after the file has been rewritten
    /// - `None` if no product has this id (nothing written, warning recorded)
    ///
    /// No stock check happens here; callers check [`Product::can_sell`]
    /// first.
    pub fn decrement_quantity(&mut self, id: ProductId, amount: i64) -> StoreResult<Option<i64>> {
        let Some((name, remaining)) = self.adjust_quantity(id, |qty| qty.saturating_sub(amount))? else {
            return Ok(None);
        };

        self.audit.record(&AuditEvent::QuantityUpdated {
            product_id: id,
            name,
            amount,
            remaining,
        });

        Ok(Some(remaining))
    }

    /// Puts `amount` units back into stock after a sale line that took
    /// them could not be recorded.
    ///
    /// Same return values and rollback as [`ProductStore::decrement_quantity`].
    pub fn restock(&mut self, id: ProductId, amount: i64) -> StoreResult<Option<i64>> {
        let Some((name, remaining)) = self.adjust_quantity(id, |qty| qty.saturating_add(amount))? else {
            return Ok(None);
        };

        self.audit.record(&AuditEvent::StockRestored {
            product_id: id,
            name,
            amount,
            remaining,
        });

        Ok(Some(remaining))
    }

    /// Applies `change` to the stock of `id` and rewrites the file.
    ///
    /// Returns the product name and new quantity, or `None` for an unknown
    /// id. A failed rewrite restores the old quantity.
    fn adjust_quantity(
        &mut self,
        id: ProductId,
        change: impl FnOnce(i64) -> i64,
    ) -> StoreResult<Option<(String, i64)>> {
        let Some(product) = self.products.get_mut(&id) else {
            self.audit
                .record(&AuditEvent::UnknownProductUpdate { product_id: id });
            return Ok(None);
        };

        let previous = product.quantity;
        product.quantity = change(previous);
        let remaining = product.quantity;
        let name = product.name.clone();

        if let Err(err) = self.save() {
            if let Some(product) = self.products.get_mut(&id) {
                product.quantity = previous;
            }
            return Err(err);
        }

        Ok(Some((name, remaining)))
    }

    /// Snapshot of every product, ascending by id.
    pub fn view(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    /// Iterates products in ascending id order without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.products.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
