//! # Terminal Prompts
//!
//! Line-oriented input with re-prompting.
//!
//! ## Prompt Loop
//! ```text
//! Enter Product Price: abc
//!      │
//!      ▼
//! parse_price("abc") ── Err ──► InvalidInput event
//!      │                        "Invalid price: ... Please try again."
//!      │                        ask again
//!      │ Ok
//!      ▼
//! Some(Money(999))
//! ```
//!
//! End of input at any prompt yields `None`; the menu treats that as Exit.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use shopkeep_core::validation::{validate_product_name, validate_stock_quantity};
use shopkeep_core::{AuditEvent, AuditLog, Money, ProductId};

/// Prompts on `W`, reads answers from `R`.
pub struct Terminal<R, W> {
    input: R,
    output: W,
    audit: Arc<dyn AuditLog>,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W, audit: Arc<dyn AuditLog>) -> Self {
        Terminal {
            input,
            output,
            audit,
        }
    }

    /// Output stream, for printing tables and messages.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints `prompt` and reads one trimmed line. `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    /// Asks until `parse` accepts the answer.
    ///
    /// Every rejected answer is recorded as an `InvalidInput` event for
    /// `field` and explained on the terminal.
    pub fn prompt<T, F>(&mut self, prompt: &str, field: &str, parse: F) -> io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        loop {
            let Some(text) = self.read_line(prompt)? else {
                return Ok(None);
            };

            match parse(&text) {
                Ok(value) => return Ok(Some(value)),
                Err(reason) => {
                    writeln!(self.output, "Invalid {}: {}. Please try again.", field, reason)?;
                    self.audit.record(&AuditEvent::InvalidInput {
                        field: field.to_string(),
                        input: text,
                    });
                }
            }
        }
    }
}

// =============================================================================
// Parsers
// =============================================================================

/// Product or sale id: a non-negative whole number.
pub fn parse_id(text: &str) -> Result<u64, String> {
    text.parse()
        .map_err(|_| format!("'{}' is not a non-negative whole number", text))
}

pub fn parse_name(text: &str) -> Result<String, String> {
    validate_product_name(text).map_err(|e| e.to_string())?;
    Ok(text.to_string())
}

pub fn parse_price(text: &str) -> Result<Money, String> {
    text.parse::<Money>().map_err(|e| e.to_string())
}

/// Stock level for a new product: zero or more.
pub fn parse_stock(text: &str) -> Result<i64, String> {
    let qty = parse_quantity(text)?;
    validate_stock_quantity(qty).map_err(|e| e.to_string())?;
    Ok(qty)
}

/// Quantity on a sale line. Range checks happen in the Shop controller.
pub fn parse_quantity(text: &str) -> Result<i64, String> {
    text.parse()
        .map_err(|_| format!("'{}' is not a whole number", text))
}

/// Answer to "Enter PID to sell (or 'done' to finish)".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleEntry {
    Product(ProductId),
    Done,
}

/// Accepts a product id or `done` in any case.
pub fn parse_sale_entry(text: &str) -> Result<SaleEntry, String> {
    if text.eq_ignore_ascii_case("done") {
        return Ok(SaleEntry::Done);
    }
    parse_id(text).map(SaleEntry::Product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep_core::MemoryAudit;

    fn terminal(input: &str) -> (Terminal<&[u8], Vec<u8>>, Arc<MemoryAudit>) {
        let audit = Arc::new(MemoryAudit::new());
        let term = Terminal::new(input.as_bytes(), Vec::new(), audit.clone());
        (term, audit)
    }

    #[test]
    fn test_read_line_trims_and_detects_eof() {
        let (mut term, _audit) = terminal("  42  \n");

        assert_eq!(term.read_line("> ").unwrap(), Some("42".to_string()));
        assert_eq!(term.read_line("> ").unwrap(), None);
    }

    #[test]
    fn test_prompt_reasks_until_valid() {
        let (mut term, audit) = terminal("abc\n-1\n7\n");

        let value = term.prompt("Qty: ", "quantity", parse_stock).unwrap();
        assert_eq!(value, Some(7));

        let output = String::from_utf8(term.into_output()).unwrap();
        assert_eq!(output.matches("Qty: ").count(), 3);
        assert_eq!(output.matches("Please try again.").count(), 2);
        assert_eq!(audit.kinds(), vec!["invalid_input", "invalid_input"]);
    }

    #[test]
    fn test_prompt_eof_while_reasking() {
        let (mut term, _audit) = terminal("x\n");
        assert_eq!(term.prompt("Id: ", "id", parse_id).unwrap(), None);
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_id("12"), Ok(12));
        assert!(parse_id("-1").is_err());
        assert!(parse_name("").is_err());
        assert_eq!(parse_price("9.99").unwrap().cents(), 999);
        assert!(parse_price("free").is_err());
        assert_eq!(parse_quantity("-2"), Ok(-2));
        assert!(parse_stock("-2").is_err());
    }

    #[test]
    fn test_sale_entry_sentinel_any_case() {
        assert_eq!(parse_sale_entry("done"), Ok(SaleEntry::Done));
        assert_eq!(parse_sale_entry("DONE"), Ok(SaleEntry::Done));
        assert_eq!(parse_sale_entry("Done"), Ok(SaleEntry::Done));
        assert_eq!(parse_sale_entry("3"), Ok(SaleEntry::Product(3)));
        assert!(parse_sale_entry("finish").is_err());
    }
}
