//! # Domain Types
//!
//! Core domain types used throughout Mercato.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  Transaction    │   │ TransactionItem │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  store_id       │   │  status         │   │  product_id     │       │
//! │  │  name           │   │  report_title   │   │  units_sold     │       │
//! │  │  inventory_count│   │  gross_cents    │   │  price_cents    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  SubmittedItem  │   │  OffendingItem  │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  boundary type  │   │  transient,     │                             │
//! │  │  for one line   │   │  never stored   │                             │
//! │  │  of a report    │   │  (oversell)     │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Entities have:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Tenancy keys: (`store_id`, `organization_id`) - integer identifiers
//!   owned by the platform's tenancy service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product tracked by a store's inventory.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Store this product belongs to.
    pub store_id: i64,

    /// Organization (tenant) the store belongs to.
    pub organization_id: i64,

    /// Display name shown in the admin UI and on reports.
    pub name: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Cost in cents (for margin calculations).
    pub cost_cents: Option<i64>,

    /// Current sellable stock quantity.
    ///
    /// Non-negative under normal operation. The publish-report engine is
    /// the only writer that moves this for sales, and it refuses any
    /// batch that would drive it below zero.
    pub inventory_count: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether current stock covers `units` additional units sold.
    pub fn can_fulfill(&self, units: i64) -> bool {
        units <= self.inventory_count
    }
}

// =============================================================================
// Transaction Status
// =============================================================================

/// The status of a POS transaction (report).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionStatus {
    /// Sale in progress; items may still be reported.
    Pending,
    /// Report has been reconciled and inventory applied.
    Published,
    /// A downstream, non-atomic item-creation step failed after the fact.
    /// Set by an external collaborator, never by the publish engine.
    PendingRollback,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Pending
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// One POS sale/report: a batch of sold line items submitted together.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub store_id: i64,
    pub organization_id: i64,
    /// User who opened the sale.
    pub user_id: String,
    pub status: TransactionStatus,
    /// Title shown on the published report.
    pub report_title: Option<String>,
    pub notes: Option<String>,
    /// Revenue total across items, computed at publish time.
    pub gross_cents: i64,
    /// Gross minus cost across items, computed at publish time.
    pub margin_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub published_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Transaction Item
// =============================================================================

/// A persisted product line within a transaction.
///
/// Carries a denormalized `product_name` so published reports render
/// without joining products, even if the product is later renamed.
///
/// Invariant: once published, any change to `units_sold` is applied
/// together with the equal-and-opposite adjustment to the referenced
/// product's `inventory_count`, inside the same database transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    /// Reference to the sold product. A reference, not ownership: the
    /// item outlives product renames and soft deletes.
    pub product_id: String,
    /// Product name at time of reporting.
    pub product_name: String,
    /// Unit price in cents.
    pub price_cents: i64,
    /// Unit cost in cents.
    pub cost_cents: i64,
    /// Units sold on this line.
    pub units_sold: i64,
    pub store_id: i64,
    pub organization_id: i64,
    /// User who published the line.
    pub user_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl TransactionItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the revenue for this line (unit price × units sold).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.units_sold
    }

    /// Returns the cost for this line (unit cost × units sold).
    #[inline]
    pub fn line_cost(&self) -> Money {
        Money::from_cents(self.cost_cents) * self.units_sold
    }
}

// =============================================================================
// Submitted Item
// =============================================================================

/// One reported line item as submitted by a POS client.
///
/// This is the boundary type for the publish-report path. Clients send
/// loosely-shaped line items; this type pins the shape down:
/// - `id` absent means "new, not yet persisted"
/// - `units_sold` defaults to 0 when the client omits it
/// - everything is validated in [`crate::validation`] before any
///   database work happens
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmittedItem {
    /// Identifier of the persisted transaction item this line updates.
    /// `None` means the line is brand new.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Product being sold.
    pub product_id: String,

    /// Product name as shown on the client (denormalized for display).
    pub product_name: String,

    /// Unit price in cents.
    #[serde(default)]
    pub price_cents: i64,

    /// Unit cost in cents.
    #[serde(default)]
    pub cost_cents: i64,

    /// Units sold on this line. Defaults to 0 when absent.
    #[serde(default)]
    pub units_sold: i64,

    /// Store the sale happened in.
    #[serde(default)]
    pub store_id: i64,

    /// Organization (tenant) the store belongs to.
    #[serde(default)]
    pub organization_id: i64,
}

impl SubmittedItem {
    /// Builds a new (unpersisted) line item with zeroed money fields.
    ///
    /// ## Example
    /// ```rust
    /// use mercato_core::SubmittedItem;
    ///
    /// let line = SubmittedItem::new("8e7d31ce-9e5a-4a8e-b6b3-0f6d1e3c2a01", "Cold Brew 330ml", 2);
    /// assert!(line.id.is_none());
    /// assert_eq!(line.units_sold, 2);
    /// ```
    pub fn new(product_id: impl Into<String>, product_name: impl Into<String>, units_sold: i64) -> Self {
        SubmittedItem {
            id: None,
            product_id: product_id.into(),
            product_name: product_name.into(),
            price_cents: 0,
            cost_cents: 0,
            units_sold,
            store_id: 0,
            organization_id: 0,
        }
    }

    /// Returns the same line pointing at an already-persisted item.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// =============================================================================
// Offending Item
// =============================================================================

/// A transient record flagging a line whose requested quantity would
/// oversell available inventory. Never persisted; exists only in the
/// response path so a client can correct the whole batch in one round
/// trip.
///
/// Serialized untagged: the two shapes are distinguished by their
/// fields (`provided_units_sold` vs `updated_provided_units_sold` +
/// `existing_units_sold`), matching what the storefront expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum OffendingItem {
    /// A brand-new line that consumes more stock than is available.
    New {
        product_id: String,
        product_name: String,
        /// Product stock at check time.
        inventory_count: i64,
        /// Units the client asked to sell.
        provided_units_sold: i64,
    },
    /// A modification that increases units sold beyond available stock.
    Updated {
        product_id: String,
        product_name: String,
        /// Product stock at check time.
        inventory_count: i64,
        /// Units the client now asks to sell.
        updated_provided_units_sold: i64,
        /// Units recorded by the previously published report.
        existing_units_sold: i64,
    },
}

impl OffendingItem {
    /// Product the violation is about.
    pub fn product_id(&self) -> &str {
        match self {
            OffendingItem::New { product_id, .. } => product_id,
            OffendingItem::Updated { product_id, .. } => product_id,
        }
    }
}

// =============================================================================
// Published Report
// =============================================================================

/// A previously published transaction together with its persisted items.
///
/// This is what the publish engine loads for change detection: only a
/// transaction whose status is `published` counts as "existing"; a
/// merely-pending one never blocks re-evaluation.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct PublishedReport {
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
}

impl PublishedReport {
    /// Looks up a persisted item by identifier.
    pub fn find_item(&self, id: &str) -> Option<&TransactionItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

// =============================================================================
// Publish Inputs
// =============================================================================

/// Caller-supplied fields applied to the parent transaction when a
/// report is published. The engine forces `status = published` itself;
/// callers cannot publish into any other status.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportParams {
    pub report_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Tenancy context for one publish request, resolved by the caller
/// (route layer) from the authenticated session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PublishContext {
    pub store_id: i64,
    pub organization_id: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default() {
        assert_eq!(TransactionStatus::default(), TransactionStatus::Pending);
    }

    #[test]
    fn test_submitted_item_defaults_from_json() {
        // Clients may omit units_sold entirely; it must default to 0.
        let line: SubmittedItem = serde_json::from_str(
            r#"{"product_id": "p-1", "product_name": "Drip Coffee"}"#,
        )
        .unwrap();

        assert!(line.id.is_none());
        assert_eq!(line.units_sold, 0);
        assert_eq!(line.price_cents, 0);
    }

    #[test]
    fn test_offending_item_wire_shapes() {
        let fresh = OffendingItem::New {
            product_id: "p-1".to_string(),
            product_name: "Drip Coffee".to_string(),
            inventory_count: 5,
            provided_units_sold: 9,
        };
        let value = serde_json::to_value(&fresh).unwrap();
        assert_eq!(value["provided_units_sold"], 9);
        assert!(value.get("existing_units_sold").is_none());

        let modified = OffendingItem::Updated {
            product_id: "p-1".to_string(),
            product_name: "Drip Coffee".to_string(),
            inventory_count: 5,
            updated_provided_units_sold: 19,
            existing_units_sold: 10,
        };
        let value = serde_json::to_value(&modified).unwrap();
        assert_eq!(value["updated_provided_units_sold"], 19);
        assert_eq!(value["existing_units_sold"], 10);
    }

    #[test]
    fn test_line_totals() {
        let item = TransactionItem {
            id: "i-1".to_string(),
            transaction_id: "t-1".to_string(),
            product_id: "p-1".to_string(),
            product_name: "Drip Coffee".to_string(),
            price_cents: 350,
            cost_cents: 120,
            units_sold: 4,
            store_id: 1,
            organization_id: 1,
            user_id: "u-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(item.line_total().cents(), 1400);
        assert_eq!(item.line_cost().cents(), 480);
    }
}
