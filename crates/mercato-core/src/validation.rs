//! # Validation Module
//!
//! Boundary validation for submitted reports.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Publish boundary (Rust)                                      │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: shape and range validation per line item             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: validate once at the boundary instead of            │
//! │  trusting the submitted shape at every call site.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::SubmittedItem;
use crate::{MAX_REPORT_ITEMS, MAX_UNITS_PER_LINE};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use mercato_core::validation::validate_uuid;
///
/// assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "product_name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "product_name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a units-sold quantity.
///
/// ## Rules
/// - Must not be negative (zero is legal: a line can be zeroed out)
/// - Must not exceed MAX_UNITS_PER_LINE
pub fn validate_units_sold(units: i64) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "units_sold".to_string(),
        });
    }

    if units > MAX_UNITS_PER_LINE {
        return Err(ValidationError::OutOfRange {
            field: "units_sold".to_string(),
            min: 0,
            max: MAX_UNITS_PER_LINE,
        });
    }

    Ok(())
}

/// Validates a money amount in cents.
///
/// Zero is allowed (free items); negatives are not.
pub fn validate_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Line Item Validation
// =============================================================================

/// Validates one submitted line item.
///
/// Called by the publish engine for every line before any database work
/// starts, so the rest of the pipeline can trust the shape.
pub fn validate_submitted_item(item: &SubmittedItem) -> ValidationResult<()> {
    if let Some(id) = item.id.as_deref() {
        validate_uuid("id", id)?;
    }

    validate_uuid("product_id", &item.product_id)?;
    validate_product_name(&item.product_name)?;
    validate_units_sold(item.units_sold)?;
    validate_cents("price_cents", item.price_cents)?;
    validate_cents("cost_cents", item.cost_cents)?;

    Ok(())
}

/// Validates a whole submission batch (size cap plus every line).
///
/// Emptiness is deliberately NOT checked here: an empty batch is a
/// publish-level rejection with its own error kind, handled before
/// validation runs.
pub fn validate_submission(items: &[SubmittedItem]) -> ValidationResult<()> {
    if items.len() > MAX_REPORT_ITEMS {
        return Err(ValidationError::BatchTooLarge {
            max: MAX_REPORT_ITEMS,
        });
    }

    for item in items {
        validate_submitted_item(item)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
