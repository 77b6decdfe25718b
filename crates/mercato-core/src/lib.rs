//! # mercato-core: Pure Business Logic for Mercato
//!
//! This crate is the **heart** of the Mercato retail platform. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront / Admin (TypeScript)                    │   │
//! │  │    POS UI ──► Report UI ──► Inventory UI ──► Dashboards        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ API routes (external)                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mercato-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  change   │  │constraint │  │   │
//! │  │   │  Product  │  │   Money   │  │ detection │  │ oversell  │  │   │
//! │  │   │Transaction│  │  totals   │  │           │  │  rules    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 mercato-db (Database Layer)                     │   │
//! │  │     SQLite queries, migrations, the publish-report engine      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Transaction, TransactionItem, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`change`] - Report change detection (has a resubmission changed?)
//! - [`constraint`] - Inventory constraint rules (no overselling)
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation of submitted line items
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use mercato_core::{has_changed, requires_validation, SubmittedItem};
//!
//! let submitted = vec![SubmittedItem::new("4b4a6a1e-3f86-4d1a-9a6e-2c6d3f0a9b11", "Espresso Beans 1kg", 3)];
//!
//! // First publish: nothing persisted yet, so everything counts as changed
//! let changed = has_changed(&submitted, None);
//! assert!(changed);
//!
//! // ...which means every line item must pass the inventory constraint check
//! assert!(requires_validation(changed, false));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod change;
pub mod constraint;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mercato_core::Money` instead of
// `use mercato_core::money::Money`

pub use change::has_changed;
pub use constraint::{evaluate_item, requires_validation};
pub use error::ValidationError;
pub use money::{report_totals, Money, ReportTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single published report
///
/// ## Business Reason
/// Prevents runaway submissions and keeps the atomic publish transaction
/// bounded. Can be made configurable per-organization in future versions.
pub const MAX_REPORT_ITEMS: usize = 200;

/// Maximum units sold on a single line item
///
/// ## Business Reason
/// Prevents accidental over-reporting (e.g., typing 1000 instead of 10).
/// Configurable per-organization in future versions.
pub const MAX_UNITS_PER_LINE: i64 = 9999;
