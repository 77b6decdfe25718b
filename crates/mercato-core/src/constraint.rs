//! # Inventory Constraint Rules
//!
//! The pure half of the oversell check: given a submitted line, the
//! product's current state, and the previously published version of the
//! line (if any), decide whether applying the submission would oversell
//! stock.
//!
//! ## The Asymmetry That Matters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  When Is a Line Checked?                                │
//! │                                                                         │
//! │  DECREASE units sold   → returns stock      → never a violation        │
//! │  INCREASE units sold   → consumes stock     → bounded by inventory     │
//! │  BRAND-NEW line        → consumes stock     → bounded by inventory     │
//! │                                                                         │
//! │  The boundary is inclusive: selling down to exactly zero stock         │
//! │  is allowed.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fetching products and walking the working set is I/O and lives in
//! mercato-db; this module only encodes the rules.

use crate::types::{OffendingItem, Product, SubmittedItem, TransactionItem};

/// Decides whether a submission's line items need constraint checking
/// at all.
///
/// ## Policy
/// * submission changed → validate **all** submitted lines
/// * unchanged, but no published version exists → validate **all**
///   (first publish, nothing to compare)
/// * unchanged against an existing published version → validate
///   **none** (an unmodified republish moves no stock)
#[inline]
pub fn requires_validation(changed: bool, has_existing: bool) -> bool {
    changed || !has_existing
}

/// Evaluates one submitted line against stock, producing the offending
/// record if the line would oversell.
///
/// ## Arguments
/// * `submitted` - the reported line
/// * `product` - current product state; `None` means the lookup cleanly
///   found nothing, which is treated as zero stock
/// * `existing` - the persisted line this submission updates, if any
///
/// ## Behavior
/// * modification: `inventory_change = existing.units_sold -
///   submitted.units_sold`; flagged iff the change consumes stock
///   (`inventory_change < 0`) and the product is missing or the
///   consumption exceeds current stock
/// * new line: flagged iff the product is missing or `units_sold`
///   exceeds current stock
pub fn evaluate_item(
    submitted: &SubmittedItem,
    product: Option<&Product>,
    existing: Option<&TransactionItem>,
) -> Option<OffendingItem> {
    let units_sold = submitted.units_sold;
    let inventory_count = product.map(|p| p.inventory_count).unwrap_or(0);

    match existing {
        Some(prior) => {
            let reported_units_sold = prior.units_sold;
            // Positive: stock returned. Negative: additional stock consumed.
            let inventory_change = reported_units_sold - units_sold;

            if inventory_change < 0
                && (product.is_none() || inventory_change.abs() > inventory_count)
            {
                Some(OffendingItem::Updated {
                    product_id: submitted.product_id.clone(),
                    product_name: submitted.product_name.clone(),
                    inventory_count,
                    updated_provided_units_sold: units_sold,
                    existing_units_sold: reported_units_sold,
                })
            } else {
                None
            }
        }
        None => {
            if product.is_none() || units_sold > inventory_count {
                Some(OffendingItem::New {
                    product_id: submitted.product_id.clone(),
                    product_name: submitted.product_name.clone(),
                    inventory_count,
                    provided_units_sold: units_sold,
                })
            } else {
                None
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
