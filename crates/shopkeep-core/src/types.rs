//! # Domain Types
//!
//! Core domain types used throughout Shopkeep.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (key)       │   │  sale_id        │   │  product_id     │       │
//! │  │  name           │   │  product_id     │   │  quantity       │       │
//! │  │  unit_price     │   │  product_name   │   └─────────────────┘       │
//! │  │  quantity       │   │  quantity_sold  │                             │
//! │  └─────────────────┘   │  total_price    │   ┌─────────────────┐       │
//! │                        └─────────────────┘   │  SalesSummary   │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A [`Sale`] copies the product name and the computed total at the moment
//! the line is committed. Changing or replacing the product afterwards never
//! rewrites history.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::ValidationResult;

/// Product identifier, unique within the inventory.
pub type ProductId = u64;

/// Sale identifier supplied by the operator. Several lines (and several
/// sales) may share one.
pub type SaleId = u64;

// =============================================================================
// Product
// =============================================================================

/// A catalog entry with its current stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique key in the inventory.
    pub id: ProductId,

    /// Display name, copied into every sale of this product.
    pub name: String,

    /// Price for one unit.
    pub unit_price: Money,

    /// Units on hand. Never negative.
    pub quantity: i64,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        Product {
            id,
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Checks if `quantity` units can be taken from stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.quantity
    }

    /// Price of `quantity` units at the current unit price.
    ///
    /// Fails with `TooLarge` when the total doesn't fit in `i64` cents.
    pub fn line_total(&self, quantity: i64) -> ValidationResult<Money> {
        self.unit_price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| ValidationError::TooLarge {
                field: "total_price".to_string(),
            })
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One committed sale line. Immutable once recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity_sold: i64,
    /// unit_price × quantity_sold at time of sale (frozen).
    pub total_price: Money,
}

impl Sale {
    /// Builds the sale snapshot for `quantity` units of `product`.
    ///
    /// ## Price Freezing
    /// Name and total are captured here. Later edits to the product do not
    /// touch this record.
    pub fn from_product(sale_id: SaleId, product: &Product, quantity: i64) -> ValidationResult<Self> {
        Ok(Sale {
            sale_id,
            product_id: product.id,
            product_name: product.name.clone(),
            quantity_sold: quantity,
            total_price: product.line_total(quantity)?,
        })
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A requested line of a sale: which product and how many units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl SaleLine {
    #[inline]
    pub const fn new(product_id: ProductId, quantity: i64) -> Self {
        SaleLine {
            product_id,
            quantity,
        }
    }
}

// =============================================================================
// Sales Summary
// =============================================================================

/// Totals shown under the sales report. Sums saturate rather than wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Number of recorded sale lines.
    pub line_count: usize,
    /// Units sold across all lines.
    pub units_sold: i64,
    /// Sum of all line totals.
    pub revenue: Money,
}

impl SalesSummary {
    pub fn from_sales<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Self {
        sales
            .into_iter()
            .fold(SalesSummary::default(), |mut summary, sale| {
                summary.line_count += 1;
                summary.units_sold = summary.units_sold.saturating_add(sale.quantity_sold);
                summary.revenue = summary.revenue.saturating_add(sale.total_price);
                summary
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        Product::new(1, "Widget", Money::from_cents(999), 10)
    }

    #[test]
    fn test_can_sell() {
        let product = widget();
        assert!(product.can_sell(3));
        assert!(product.can_sell(10));
        assert!(!product.can_sell(11));
    }

    #[test]
    fn test_sale_snapshot() {
        let mut product = widget();
        let sale = Sale::from_product(7, &product, 3).unwrap();

        assert_eq!(sale.sale_id, 7);
        assert_eq!(sale.product_id, 1);
        assert_eq!(sale.product_name, "Widget");
        assert_eq!(sale.quantity_sold, 3);
        assert_eq!(sale.total_price, Money::from_cents(2997));

        // Later edits don't reach the snapshot
        product.name = "Gadget".to_string();
        product.unit_price = Money::from_cents(1);
        assert_eq!(sale.product_name, "Widget");
        assert_eq!(sale.total_price, Money::from_cents(2997));
    }

    #[test]
    fn test_total_past_i64_is_refused() {
        let product = Product::new(1, "Ingot", "100000000000000".parse().unwrap(), 1000);

        assert!(product.can_sell(1000));
        assert_eq!(
            Sale::from_product(1, &product, 1000),
            Err(ValidationError::TooLarge {
                field: "total_price".to_string()
            })
        );
    }

    #[test]
    fn test_sales_summary() {
        let product = widget();
        let sales = vec![
            Sale::from_product(1, &product, 3).unwrap(),
            Sale::from_product(1, &product, 2).unwrap(),
        ];

        let summary = SalesSummary::from_sales(&sales);
        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.units_sold, 5);
        assert_eq!(summary.revenue, Money::from_cents(4995));

        assert_eq!(SalesSummary::from_sales(&Vec::<Sale>::new()), SalesSummary::default());
    }
}
