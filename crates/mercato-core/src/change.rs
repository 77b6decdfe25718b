//! # Report Change Detection
//!
//! Decides whether a newly submitted batch of line items differs
//! materially from the previously published version of the same
//! transaction.
//!
//! ## Why This Exists
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Republish Flow                                        │
//! │                                                                         │
//! │  POS client submits line items for transaction T                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Is there a PUBLISHED version of T already?                            │
//! │       │                                                                 │
//! │       ├── No  → changed = true (first publish, full processing)        │
//! │       │                                                                 │
//! │       └── Yes → compare submitted lines against published lines        │
//! │                 • new line id (or no id at all)? → changed             │
//! │                 • units_sold differs for a shared id? → changed        │
//! │                 • otherwise → unchanged (skip constraint checks)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines that exist in the published transaction but are absent from
//! the submission do NOT count as a change: line items are adjusted,
//! never retracted, and the engine downstream neither restocks nor
//! deletes such orphans.

use crate::types::{PublishedReport, SubmittedItem};
use std::collections::HashSet;

/// Reports whether `submitted` differs materially from the previously
/// published report.
///
/// Pure function of its inputs; no side effects.
///
/// ## Arguments
/// * `submitted` - line items as reported by the client, in order
/// * `existing` - the published snapshot of the same transaction, if any
///
/// ## Example
/// ```rust
/// use mercato_core::{has_changed, SubmittedItem};
///
/// let lines = vec![SubmittedItem::new("0a3afc5e-11b2-4f2e-8a64-6f1f2b7f3d55", "Flat White", 2)];
/// assert!(has_changed(&lines, None)); // first publish is always a change
/// ```
pub fn has_changed(submitted: &[SubmittedItem], existing: Option<&PublishedReport>) -> bool {
    let Some(existing) = existing else {
        // First publish: nothing to compare against.
        return true;
    };

    let existing_ids: HashSet<&str> = existing.items.iter().map(|item| item.id.as_str()).collect();

    // (a) Any submitted line the published report has never seen.
    let has_new_item = submitted.iter().any(|line| match line.id.as_deref() {
        Some(id) => !existing_ids.contains(id),
        None => true,
    });

    // (b) Any published line whose quantity the submission moves.
    let has_quantity_change = existing.items.iter().any(|prior| {
        submitted
            .iter()
            .find(|line| line.id.as_deref() == Some(prior.id.as_str()))
            .is_some_and(|line| line.units_sold != prior.units_sold)
    });

    has_new_item || has_quantity_change
}

// =============================================================================
// Unit Tests
// =============================================================================
