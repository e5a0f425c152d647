//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    9.99 × 3 = 29.970000000000002  ❌ ends up in the sales file          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    999 cents × 3 = 2997 cents → written as "29.97"                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Text Form
//! Both CSV files store amounts as plain decimals (`9.99`, `10`, `0.5`).
//! [`Money::from_str`](std::str::FromStr) accepts that form and rounds any
//! digits beyond the cent to the nearest cent, half away from zero, so files
//! written by older float-based tooling still load.
//!
//! ## Usage
//! ```rust
//! use shopkeep_core::money::Money;
//!
//! let price: Money = "9.99".parse().unwrap();
//! assert_eq!(price.cents(), 999);
//!
//! let total = price.checked_mul_quantity(3).unwrap();
//! assert_eq!(total.to_decimal_string(), "29.97");
//! assert_eq!(total.to_string(), "$29.97");
//!
//! // Past i64::MAX cents there is no total, not a panic
//! assert_eq!(price.checked_mul_quantity(i64::MAX), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic never silently wraps into nonsense; the
///   "never negative" rule for prices is enforced by validation instead
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity. `None` on overflow.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Widget $9.99
    /// Quantity: 3
    ///      │
    ///      ▼
    /// checked_mul_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ├── overflow → None, the sale line is refused
    ///      ▼
    /// Sale.total_price: $29.97
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, stopping at the `i64` bounds instead of wrapping.
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Formats the value as a bare decimal (`29.97`), the form used on disk.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a non-negative decimal amount.
///
/// ## Accepted Forms
/// ```text
/// "9.99"                → 999
/// "10"                  → 1000
/// ".5"                  → 50
/// "29.970000000000002"  → 2997   (rounded to the cent)
/// "0.125"               → 13     (half away from zero)
/// "-1.00"               → MustNotBeNegative
/// "abc", "1.2.3", "1e5" → InvalidFormat
/// ```
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();

        if text.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        if text.starts_with('-') {
            return Err(ValidationError::MustNotBeNegative {
                field: "amount".to_string(),
            });
        }

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("'{}' is not a decimal number", text),
            ));
        }

        let too_large = || ValidationError::TooLarge {
            field: "amount".to_string(),
        };

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };

        let digits = fraction.as_bytes();
        let digit = |i: usize| digits.get(i).map(|d| i64::from(d - b'0')).unwrap_or(0);

        let mut cents = whole_units
            .checked_mul(100)
            .and_then(|c| c.checked_add(digit(0) * 10 + digit(1)))
            .ok_or_else(too_large)?;

        if digit(2) >= 5 {
            cents = cents.checked_add(1).ok_or_else(too_large)?;
        }

        Ok(Money(cents))
    }
}

/// Serde adapter that stores [`Money`] as a decimal string.
///
/// Used by the CSV row types:
/// ```rust,ignore
/// #[serde(with = "shopkeep_core::money::decimal")]
/// unit_price: Money,
/// ```
pub mod decimal {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::Money;

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&money.to_decimal_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money with a currency sign (`$29.97`), for tables and messages.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturating, like [`Money::saturating_add`].
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
