//! Grid tables for the inventory and sales views.
//!
//! ```text
//! +----+--------+-------+----------+
//! | ID | Name   | Price | Quantity |
//! +====+========+=======+==========+
//! |  1 | Widget | $9.99 |        7 |
//! +----+--------+-------+----------+
//! ```

use comfy_table::{CellAlignment, ContentArrangement, Table, TableComponent};

use shopkeep_core::{Product, Sale, SalesSummary};

/// Borders for every table: `+`/`-`/`|`, `=` under the header, a rule
/// between rows.
const GRID: [(TableComponent, char); 19] = [
    (TableComponent::LeftBorder, '|'),
    (TableComponent::RightBorder, '|'),
    (TableComponent::TopBorder, '-'),
    (TableComponent::BottomBorder, '-'),
    (TableComponent::LeftHeaderIntersection, '+'),
    (TableComponent::HeaderLines, '='),
    (TableComponent::MiddleHeaderIntersections, '+'),
    (TableComponent::RightHeaderIntersection, '+'),
    (TableComponent::VerticalLines, '|'),
    (TableComponent::HorizontalLines, '-'),
    (TableComponent::MiddleIntersections, '+'),
    (TableComponent::LeftBorderIntersections, '+'),
    (TableComponent::RightBorderIntersections, '+'),
    (TableComponent::TopBorderIntersections, '+'),
    (TableComponent::BottomBorderIntersections, '+'),
    (TableComponent::TopLeftCorner, '+'),
    (TableComponent::TopRightCorner, '+'),
    (TableComponent::BottomLeftCorner, '+'),
    (TableComponent::BottomRightCorner, '+'),
];

/// An empty grid with the given column titles and alignments.
fn grid(columns: &[(&str, CellAlignment)]) -> Table {
    let mut table = Table::new();
    for (component, ch) in GRID {
        table.set_style(component, ch);
    }
    table
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(columns.iter().map(|(title, _)| *title));

    for (index, (_, alignment)) in columns.iter().enumerate() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(*alignment);
        }
    }

    table
}

// =============================================================================
// Views
// =============================================================================

/// `ID | Name | Price | Quantity`, one row per product.
pub fn inventory_table<'a>(products: impl IntoIterator<Item = &'a Product>) -> Table {
    let mut table = grid(&[
        ("ID", CellAlignment::Right),
        ("Name", CellAlignment::Left),
        ("Price", CellAlignment::Right),
        ("Quantity", CellAlignment::Right),
    ]);

    for product in products {
        table.add_row(vec![
            product.id.to_string(),
            product.name.clone(),
            product.unit_price.to_string(),
            product.quantity.to_string(),
        ]);
    }

    table
}

/// `Sale ID | Product ID | Name | Quantity Sold | Total Price`.
pub fn sales_table<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Table {
    let mut table = grid(&[
        ("Sale ID", CellAlignment::Right),
        ("Product ID", CellAlignment::Right),
        ("Name", CellAlignment::Left),
        ("Quantity Sold", CellAlignment::Right),
        ("Total Price", CellAlignment::Right),
    ]);

    for sale in sales {
        table.add_row(vec![
            sale.sale_id.to_string(),
            sale.product_id.to_string(),
            sale.product_name.clone(),
            sale.quantity_sold.to_string(),
            sale.total_price.to_string(),
        ]);
    }

    table
}

/// Footer printed under the sales table.
pub fn summary_line(summary: &SalesSummary) -> String {
    format!(
        "Lines: {} | Units sold: {} | Revenue: {}",
        summary.line_count, summary.units_sold, summary.revenue
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep_core::Money;

    #[test]
    fn test_inventory_grid() {
        let products = vec![
            Product::new(1, "Widget", Money::from_cents(999), 7),
            Product::new(10, "Bolt", Money::from_cents(15), 400),
        ];
        let rendered = inventory_table(&products).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "+----+--------+-------+----------+");
        assert_eq!(lines[1], "| ID | Name   | Price | Quantity |");
        assert_eq!(lines[2], "+====+========+=======+==========+");
        assert_eq!(lines[3], "|  1 | Widget | $9.99 |        7 |");
        assert_eq!(lines[4], "+----+--------+-------+----------+");
        assert_eq!(lines[5], "| 10 | Bolt   | $0.15 |      400 |");
        assert_eq!(lines.last(), Some(&"+----+--------+-------+----------+"));
    }

    #[test]
    fn test_empty_table_shows_header() {
        let rendered = inventory_table(&Vec::<Product>::new()).to_string();
        assert!(rendered.contains("| ID | Name | Price | Quantity |"));
    }

    #[test]
    fn test_sales_table_cells() {
        let product = Product::new(1, "Bolt, M6", Money::from_cents(15), 400);
        let sales = vec![Sale::from_product(100, &product, 10).unwrap()];
        let rendered = sales_table(&sales).to_string();

        assert!(rendered.contains("| Sale ID | Product ID | Name     | Quantity Sold | Total Price |"));
        assert!(rendered.contains("| Bolt, M6 |"));
        assert!(rendered.contains("$1.50"));
    }

    #[test]
    fn test_summary_line() {
        let summary = SalesSummary {
            line_count: 2,
            units_sold: 5,
            revenue: Money::from_cents(4995),
        };
        assert_eq!(summary_line(&summary), "Lines: 2 | Units sold: 5 | Revenue: $49.95");
    }
}
