//! # Menu Loop
//!
//! The interactive session: print the menu, read a choice, run it, repeat.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  --- Small Shop Management System ---                                   │
//! │  1. View Inventory          → inventory grid table                     │
//! │  2. Add Product             → PID, name, price, quantity → Shop        │
//! │  3. Process a Sale          → sale id, then PID/quantity until 'done'  │
//! │  4. View Sales Report       → sales grid table + summary               │
//! │  5. Exit                    → "Exiting... Goodbye!"                    │
//! │                                                                         │
//! │  anything else              → "Invalid choice. Please try again."      │
//! │  end of input (any prompt)  → same as 5                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rejected sale lines and file errors are reported and the loop goes on.
//! Only a failure to talk to the terminal itself ends the session early.

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::{error, info};

use crate::error::CliResult;
use crate::prompt::{
    parse_id, parse_name, parse_price, parse_quantity, parse_sale_entry, parse_stock, SaleEntry,
    Terminal,
};
use crate::table::{inventory_table, sales_table, summary_line};
use shopkeep_core::{AuditEvent, AuditLog, CoreError, Product, SaleLine};
use shopkeep_store::{LineRejection, SaleReport, Shop, StoreError};

const MENU: &str = "\
--- Small Shop Management System ---
1. View Inventory
2. Add Product to Inventory
3. Process a Sale
4. View Sales Report
5. Exit";

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    ViewInventory,
    AddProduct,
    ProcessSale,
    ViewSalesReport,
    Exit,
}

impl Choice {
    /// Maps the typed answer to a menu entry. Only `1`..`5` are accepted.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "1" => Some(Choice::ViewInventory),
            "2" => Some(Choice::AddProduct),
            "3" => Some(Choice::ProcessSale),
            "4" => Some(Choice::ViewSalesReport),
            "5" => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// Whether the session keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Runs the menu over a [`Shop`].
///
/// Generic over the streams so a whole session can be scripted:
/// ```rust,ignore
/// let mut menu = Menu::new(shop, "1\n5\n".as_bytes(), Vec::new(), audit);
/// menu.run()?;
/// let (_shop, output) = menu.into_parts();
/// ```
pub struct Menu<R, W> {
    shop: Shop,
    term: Terminal<R, W>,
    audit: Arc<dyn AuditLog>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(shop: Shop, input: R, output: W, audit: Arc<dyn AuditLog>) -> Self {
        Menu {
            shop,
            term: Terminal::new(input, output, audit.clone()),
            audit,
        }
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    /// Hands back the shop and the output stream.
    pub fn into_parts(self) -> (Shop, W) {
        (self.shop, self.term.into_output())
    }

    /// Loops until Exit or end of input.
    pub fn run(&mut self) -> CliResult<()> {
        loop {
            writeln!(self.term.out(), "\n{}", MENU)?;

            let Some(answer) = self.term.read_line("Enter your choice: ")? else {
                break;
            };

            let flow = match Choice::parse(&answer) {
                Some(Choice::ViewInventory) => self.view_inventory()?,
                Some(Choice::AddProduct) => self.add_product()?,
                Some(Choice::ProcessSale) => self.process_sale()?,
                Some(Choice::ViewSalesReport) => self.view_sales_report()?,
                Some(Choice::Exit) => Flow::Exit,
                None => {
                    self.audit
                        .record(&AuditEvent::InvalidMenuChoice { input: answer });
                    writeln!(self.term.out(), "Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        writeln!(self.term.out(), "Exiting... Goodbye!")?;
        self.audit.record(&AuditEvent::SystemExit);
        Ok(())
    }

    // =========================================================================
    // Actions
    // =========================================================================

    fn view_inventory(&mut self) -> CliResult<Flow> {
        let table = inventory_table(self.shop.inventory().iter());
        writeln!(self.term.out(), "{}", table)?;
        Ok(Flow::Continue)
    }

    fn view_sales_report(&mut self) -> CliResult<Flow> {
        let ledger = self.shop.ledger();
        let table = sales_table(ledger.iter());
        let summary = summary_line(&ledger.summary());

        let out = self.term.out();
        writeln!(out, "{}", table)?;
        writeln!(out, "{}", summary)?;
        Ok(Flow::Continue)
    }

    fn add_product(&mut self) -> CliResult<Flow> {
        let Some(id) = self.term.prompt("Enter PID: ", "product id", parse_id)? else {
            return Ok(Flow::Exit);
        };
        let Some(name) = self.term.prompt("Enter Product Name: ", "name", parse_name)? else {
            return Ok(Flow::Exit);
        };
        let Some(price) = self.term.prompt("Enter Product Price: ", "price", parse_price)? else {
            return Ok(Flow::Exit);
        };
        let Some(quantity) = self
            .term
            .prompt("Enter Product Quantity: ", "quantity", parse_stock)?
        else {
            return Ok(Flow::Exit);
        };

        match self.shop.add_product(Product::new(id, name.clone(), price, quantity)) {
            Ok(previous) => {
                info!(
                    product_id = id,
                    name = %name,
                    price = %price,
                    quantity,
                    "Product added through menu"
                );
                let verb = if previous.is_some() { "updated" } else { "added" };
                writeln!(self.term.out(), "Product {} {}.", name, verb)?;
            }
            Err(err) => self.report_store_error(&err)?,
        }

        Ok(Flow::Continue)
    }

    fn process_sale(&mut self) -> CliResult<Flow> {
        let Some(sale_id) = self.term.prompt("Enter Sale ID: ", "sale id", parse_id)? else {
            return Ok(Flow::Exit);
        };

        let mut report = SaleReport {
            sale_id,
            ..SaleReport::default()
        };

        let flow = loop {
            let Some(entry) = self.term.prompt(
                "Enter PID to sell (or 'done' to finish): ",
                "product id",
                parse_sale_entry,
            )?
            else {
                break Flow::Exit;
            };

            let product_id = match entry {
                SaleEntry::Done => break Flow::Continue,
                SaleEntry::Product(id) => id,
            };

            let name = match self.shop.product_for_sale(sale_id, product_id) {
                Ok(product) => product.name.clone(),
                Err(_) => {
                    writeln!(self.term.out(), "Product not found!")?;
                    continue;
                }
            };

            let prompt = format!("Enter Quantity for {}: ", name);
            let Some(quantity) = self.term.prompt(&prompt, "quantity", parse_quantity)? else {
                break Flow::Exit;
            };

            let line = SaleLine::new(product_id, quantity);
            match self.shop.process_line(sale_id, line) {
                Ok(sale) => {
                    writeln!(
                        self.term.out(),
                        "Sold {} x {} for {}.",
                        sale.quantity_sold,
                        sale.product_name,
                        sale.total_price
                    )?;
                    report.accepted.push(sale);
                }
                Err(err) => match err.into_rejection() {
                    Ok(error) => {
                        self.report_rejection(&error)?;
                        report.rejected.push(LineRejection { line, error });
                    }
                    Err(err) => self.report_store_error(&err)?,
                },
            }
        };

        if !report.accepted.is_empty() {
            writeln!(
                self.term.out(),
                "Sale {} total: {} ({} lines, {} rejected).",
                report.sale_id,
                report.total(),
                report.accepted.len(),
                report.rejected.len()
            )?;
        }

        Ok(flow)
    }

    // =========================================================================
    // Messages
    // =========================================================================

    fn report_rejection(&mut self, error: &CoreError) -> CliResult<()> {
        let out = self.term.out();
        match error {
            CoreError::UnknownProduct(_) => writeln!(out, "Product not found!")?,
            CoreError::InsufficientStock { .. } => writeln!(out, "Insufficient stock!")?,
            CoreError::Validation(err) => writeln!(out, "Rejected: {}.", err)?,
        }
        Ok(())
    }

    fn report_store_error(&mut self, err: &StoreError) -> CliResult<()> {
        if !err.is_recoverable() {
            error!(error = %err, "Store operation failed");
        }
        writeln!(self.term.out(), "Error: {}", err)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep_core::{MemoryAudit, Money, Severity};
    use shopkeep_store::ShopPaths;

    struct Session {
        _dir: tempfile::TempDir,
        shop: Shop,
        output: String,
        audit: Arc<MemoryAudit>,
    }

    fn run_with(setup: impl FnOnce(&mut Shop), script: &str) -> Session {
        let dir = tempfile::tempdir().unwrap();
        let paths = ShopPaths::new(dir.path().join("inventory.csv"), dir.path().join("sales.csv"));
        let audit = Arc::new(MemoryAudit::new());

        let mut shop = Shop::open(&paths, audit.clone()).unwrap();
        setup(&mut shop);
        audit.clear();

        let mut menu = Menu::new(shop, script.as_bytes(), Vec::new(), audit.clone());
        menu.run().unwrap();
        let (shop, output) = menu.into_parts();

        Session {
            _dir: dir,
            shop,
            output: String::from_utf8(output).unwrap(),
            audit,
        }
    }

    fn with_widget(shop: &mut Shop) {
        shop.add_product(Product::new(1, "Widget", Money::from_cents(999), 10))
            .unwrap();
    }

    #[test]
    fn test_choice_parse() {
        assert_eq!(Choice::parse("1"), Some(Choice::ViewInventory));
        assert_eq!(Choice::parse(" 5 "), Some(Choice::Exit));
        assert_eq!(Choice::parse("6"), None);
        assert_eq!(Choice::parse("exit"), None);
    }

    #[test]
    fn test_exit_choice() {
        let session = run_with(|_| {}, "5\n");

        assert!(session.output.contains("--- Small Shop Management System ---"));
        assert!(session.output.ends_with("Exiting... Goodbye!\n"));
        assert_eq!(session.audit.kinds(), vec!["system_exit"]);
    }

    #[test]
    fn test_end_of_input_exits() {
        let session = run_with(|_| {}, "");
        assert!(session.output.contains("Exiting... Goodbye!"));
        assert_eq!(session.audit.kinds(), vec!["system_exit"]);
    }

    #[test]
    fn test_invalid_choice() {
        let session = run_with(|_| {}, "9\n5\n");

        assert!(session.output.contains("Invalid choice. Please try again."));
        assert_eq!(session.audit.kinds(), vec!["invalid_menu_choice", "system_exit"]);
        assert_eq!(session.audit.count(Severity::Warning), 1);
    }

    #[test]
    fn test_add_product_with_reprompts() {
        let session = run_with(|_| {}, "2\nabc\n1\nWidget\nfree\n9.99\n-3\n10\n1\n5\n");

        let product = session.shop.product(1).unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.unit_price, Money::from_cents(999));
        assert_eq!(product.quantity, 10);

        assert!(session.output.contains("Product Widget added."));
        assert!(session.output.contains("|  1 | Widget | $9.99 |       10 |"));
        assert_eq!(
            session
                .audit
                .kinds()
                .iter()
                .filter(|kind| **kind == "invalid_input")
                .count(),
            3
        );
    }

    #[test]
    fn test_process_sale_session() {
        let script = "3\n100\n1\n3\n42\n1\n20\nDONE\n4\n5\n";
        let session = run_with(with_widget, script);

        assert!(session.output.contains("Enter Quantity for Widget: "));
        assert!(session.output.contains("Sold 3 x Widget for $29.97."));
        assert!(session.output.contains("Product not found!"));
        assert!(session.output.contains("Insufficient stock!"));
        assert!(session.output.contains("Sale 100 total: $29.97 (1 lines, 1 rejected)."));
        assert!(session.output.contains("Lines: 1 | Units sold: 3 | Revenue: $29.97"));

        assert_eq!(session.shop.product(1).unwrap().quantity, 7);
        assert_eq!(session.shop.ledger().len(), 1);

        let kinds = session.audit.kinds();
        assert!(kinds.contains(&"sale_processed"));
        assert!(kinds.contains(&"sale_unknown_product"));
        assert!(kinds.contains(&"sale_insufficient_stock"));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let session = run_with(with_widget, "3\n1\n1\n0\ndone\n5\n");

        assert!(session.output.contains("must be positive"));
        assert_eq!(session.shop.product(1).unwrap().quantity, 10);
        assert!(session.shop.ledger().is_empty());
    }

    #[test]
    fn test_end_of_input_mid_sale() {
        let session = run_with(with_widget, "3\n1\n1\n2\n");

        assert_eq!(session.shop.product(1).unwrap().quantity, 8);
        assert!(session.output.contains("Exiting... Goodbye!"));
        assert_eq!(session.audit.kinds().last(), Some(&"system_exit"));
    }
}
