//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many retail systems:                                                │
//! │    $10.00 / 3 = $3.33 (×3 = $9.99)  → Lost $0.01!                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1000 cents / 3 = 333 cents (×3 = 999 cents)                         │
//! │    We KNOW we lost 1 cent, and handle it explicitly                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mercato_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;            // $21.98
//! let total = price + Money::from_cents(500); // $15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TransactionItem;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds, corrections
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use mercato_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (refund/correction territory).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Saturating addition, for totals over untrusted batch sizes.
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Saturating multiplication by a unit count.
    #[inline]
    pub const fn saturating_mul(self, units: i64) -> Money {
        Money(self.0.saturating_mul(units))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Formats as a plain decimal amount, e.g. `10.99` or `-3.50`.
/// Currency symbols are a presentation concern owned by the frontend.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, units: i64) -> Money {
        Money(self.0 * units)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

// =============================================================================
// Report Totals
// =============================================================================

/// Aggregate money figures for one published report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ReportTotals {
    /// Revenue: Σ price × units.
    pub gross: Money,
    /// Cost of goods: Σ cost × units.
    pub cost: Money,
    /// Gross minus cost.
    pub margin: Money,
    /// Total units across all lines.
    pub units_sold: i64,
}

/// Computes the totals stamped onto the parent transaction at publish
/// time. Saturating math: a hostile batch must not panic the engine.
pub fn report_totals(items: &[TransactionItem]) -> ReportTotals {
    let mut gross = Money::zero();
    let mut cost = Money::zero();
    let mut units_sold: i64 = 0;

    for item in items {
        gross = gross.saturating_add(Money::from_cents(item.price_cents).saturating_mul(item.units_sold));
        cost = cost.saturating_add(Money::from_cents(item.cost_cents).saturating_mul(item.units_sold));
        units_sold = units_sold.saturating_add(item.units_sold);
    }

    ReportTotals {
        gross,
        cost,
        margin: gross - cost,
        units_sold,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(price_cents: i64, cost_cents: i64, units_sold: i64) -> TransactionItem {
        TransactionItem {
            id: "i".to_string(),
            transaction_id: "t".to_string(),
            product_id: "p".to_string(),
            product_name: "Sparkling Water 500ml".to_string(),
            price_cents,
            cost_cents,
            units_sold,
            store_id: 1,
            organization_id: 1,
            user_id: "u".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_cents(1099);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1599);
        assert_eq!((a - b).cents(), 599);
        assert_eq!((a * 3).cents(), 3297);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-350).to_string(), "-3.50");
    }

    #[test]
    fn test_money_sum() {
        let total: Money = [100, 250, 50].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.cents(), 400);
    }

    #[test]
    fn test_report_totals() {
        let totals = report_totals(&[item(350, 120, 4), item(1000, 600, 1)]);

        assert_eq!(totals.gross.cents(), 2400);
        assert_eq!(totals.cost.cents(), 1080);
        assert_eq!(totals.margin.cents(), 1320);
        assert_eq!(totals.units_sold, 5);
    }

    #[test]
    fn test_report_totals_saturate() {
        let totals = report_totals(&[item(i64::MAX, 0, 2)]);
        assert_eq!(totals.gross.cents(), i64::MAX);
    }

    #[test]
    fn test_report_totals_empty() {
        let totals = report_totals(&[]);
        assert!(totals.gross.is_zero());
        assert_eq!(totals.units_sold, 0);
    }
}
