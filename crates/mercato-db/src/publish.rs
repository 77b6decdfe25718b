//! # Publish-Report Reconciliation Engine
//!
//! Takes a batch of reported line items for one transaction, reconciles
//! it against the previously published version (if any), refuses any
//! batch that would oversell inventory, and applies line-item upserts
//! plus inventory deltas atomically.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    publish_report(...)                                  │
//! │                                                                         │
//! │  empty batch? ──────────────► InvalidSubmission (no I/O at all)        │
//! │  shape validation fails? ───► InvalidSubmission (no I/O at all)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────── ONE DATABASE TRANSACTION ──────────────────────┐   │
//! │  │                                                                 │   │
//! │  │  1. load published snapshot (status = 'published')              │   │
//! │  │  2. change detection (mercato-core)                             │   │
//! │  │  3. constraint check over the working set                       │   │
//! │  │     ├── product fetch fails → ProductNotFound (fatal)          │   │
//! │  │     └── any offending items → InventoryConstraint, NO writes   │   │
//! │  │  4. per line: update item + inventory delta                     │   │
//! │  │              or create item + inventory decrement               │   │
//! │  │  5. totals + mark parent transaction published                  │   │
//! │  │                                                                 │   │
//! │  └──────────── commit, or roll back EVERYTHING on error ───────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line operations run sequentially on the transaction's connection.
//! SQLite hands a transaction exactly one connection, so there is no
//! statement-level fan-out to win here; the inventory delta statements
//! are atomic on their own, so ordering between lines never matters.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{product, report};
use mercato_core::{
    evaluate_item, has_changed, report_totals, requires_validation, validation, OffendingItem,
    PublishContext, PublishedReport, ReportParams, SubmittedItem, Transaction, TransactionItem,
};

// =============================================================================
// Error Taxonomy
// =============================================================================

/// Failures of the publish-report path.
///
/// All variants are raised inside the atomic transaction and propagate
/// out uncaught, so the transaction rolls back any partial writes. The
/// route layer owns mapping kinds to transport responses; nothing here
/// is ever downgraded into a silent fallback.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A product lookup failed at the data layer while checking
    /// constraints. Fatal to the whole batch, not a per-line warning.
    #[error("product lookup failed for {product_name} ({product_id})")]
    ProductNotFound {
        product_id: String,
        product_name: String,
        #[source]
        source: DbError,
    },

    /// One or more lines would oversell inventory. Carries EVERY
    /// offending line so the client can correct the batch in one round
    /// trip.
    #[error("{} line item(s) would oversell available inventory", .offending_items.len())]
    InventoryConstraint { offending_items: Vec<OffendingItem> },

    /// The submission is structurally invalid (empty batch, malformed
    /// line items).
    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    /// Any other data-layer failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Successful publish result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PublishOutcome {
    /// The parent transaction after publishing.
    pub transaction: Transaction,
    /// Every line item created or updated by this publish, in
    /// submission order.
    pub transaction_items: Vec<TransactionItem>,
}

// =============================================================================
// Engine
// =============================================================================

/// The publish-report engine.
///
/// ## Usage
/// ```rust,ignore
/// let outcome = db
///     .publisher()
///     .publish_report(&transaction_id, &items, &params, &ctx, "cashier-7")
///     .await?;
/// println!("published {} lines", outcome.transaction_items.len());
/// ```
#[derive(Debug, Clone)]
pub struct ReportPublisher {
    pool: SqlitePool,
}

impl ReportPublisher {
    /// Creates a new ReportPublisher.
    pub fn new(pool: SqlitePool) -> Self {
        ReportPublisher { pool }
    }

    /// Publishes a report: reconciles `items` against the previously
    /// published version of the transaction and applies all record and
    /// inventory changes atomically.
    ///
    /// ## Arguments
    /// * `transaction_id` - the transaction being published
    /// * `items` - reported line items, in client order
    /// * `params` - report title/notes stamped onto the transaction
    /// * `ctx` - tenancy context resolved by the caller
    /// * `user_id` - acting user, recorded on newly created lines
    ///
    /// ## Errors
    /// * [`PublishError::InvalidSubmission`] - empty or malformed batch
    /// * [`PublishError::InventoryConstraint`] - at least one line would
    ///   oversell; carries all offending lines
    /// * [`PublishError::ProductNotFound`] - a product lookup failed
    /// * [`PublishError::Db`] - any other data-layer failure
    pub async fn publish_report(
        &self,
        transaction_id: &str,
        items: &[SubmittedItem],
        params: &ReportParams,
        ctx: &PublishContext,
        user_id: &str,
    ) -> Result<PublishOutcome, PublishError> {
        debug!(
            transaction_id = %transaction_id,
            store_id = %ctx.store_id,
            lines = items.len(),
            "publish_report"
        );

        // Rejections that need no I/O happen before the transaction opens.
        if items.is_empty() {
            return Err(PublishError::InvalidSubmission(
                "a report needs at least one line item".to_string(),
            ));
        }
        validation::validate_submission(items)
            .map_err(|err| PublishError::InvalidSubmission(err.to_string()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // 1. Only a previously *published* transaction counts as existing.
        let existing = load_published_snapshot(&mut tx, transaction_id).await?;

        // 2. Classify the batch.
        let changed = has_changed(items, existing.as_ref());
        debug!(changed = changed, existing = existing.is_some(), "Change detection");

        // 3. Constraint check over the working set. No writes have
        //    happened yet, so returning here abandons nothing.
        if requires_validation(changed, existing.is_some()) {
            let offending_items =
                check_inventory_constraints(&mut tx, items, existing.as_ref()).await?;

            if !offending_items.is_empty() {
                warn!(
                    transaction_id = %transaction_id,
                    offending = offending_items.len(),
                    "Publish rejected: inventory constraint violation"
                );
                return Err(PublishError::InventoryConstraint { offending_items });
            }
        }

        // 4. Upsert every line and move its stock.
        let now = Utc::now();
        let mut transaction_items = Vec::with_capacity(items.len());

        for line in items {
            let persisted = match line.id.as_deref() {
                Some(id) => {
                    report::fetch_item_scoped(&mut tx, id, &line.product_id, transaction_id)
                        .await?
                }
                None => None,
            };

            let item = match persisted {
                Some(prior) => {
                    // Update path. Positive change returns stock,
                    // negative consumes more.
                    let inventory_change = prior.units_sold - line.units_sold;

                    let updated = TransactionItem {
                        product_name: line.product_name.clone(),
                        price_cents: line.price_cents,
                        cost_cents: line.cost_cents,
                        units_sold: line.units_sold,
                        store_id: line.store_id,
                        organization_id: line.organization_id,
                        updated_at: now,
                        ..prior
                    };
                    report::update_item(&mut tx, &updated).await?;

                    if inventory_change != 0 {
                        product::apply_inventory_delta(&mut tx, &line.product_id, inventory_change)
                            .await?;
                    }
                    updated
                }
                None => {
                    // Create path. Client-supplied ids are references,
                    // not identities: a fresh row always gets a fresh id.
                    let created = TransactionItem {
                        id: Uuid::new_v4().to_string(),
                        transaction_id: transaction_id.to_string(),
                        product_id: line.product_id.clone(),
                        product_name: line.product_name.clone(),
                        price_cents: line.price_cents,
                        cost_cents: line.cost_cents,
                        units_sold: line.units_sold,
                        store_id: line.store_id,
                        organization_id: line.organization_id,
                        user_id: user_id.to_string(),
                        created_at: now,
                        updated_at: now,
                    };
                    report::insert_item(&mut tx, &created).await?;

                    if line.units_sold != 0 {
                        product::apply_inventory_delta(&mut tx, &line.product_id, -line.units_sold)
                            .await?;
                    }
                    created
                }
            };

            transaction_items.push(item);
        }

        // 5. Stamp the parent transaction: forced published status,
        //    report fields, and totals computed from the final lines.
        let totals = report_totals(&transaction_items);
        report::mark_published(&mut tx, transaction_id, ctx.store_id, params, &totals, now).await?;

        let transaction = report::fetch_transaction(&mut tx, transaction_id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", transaction_id))?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            transaction_id = %transaction_id,
            lines = transaction_items.len(),
            gross_cents = totals.gross.cents(),
            "Report published"
        );

        Ok(PublishOutcome {
            transaction,
            transaction_items,
        })
    }
}

/// Loads the published snapshot (transaction + items) used for change
/// detection, if one exists.
async fn load_published_snapshot(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    transaction_id: &str,
) -> DbResult<Option<PublishedReport>> {
    let Some(transaction) = report::fetch_published(tx, transaction_id).await? else {
        return Ok(None);
    };
    let items = report::fetch_items(tx, transaction_id).await?;

    Ok(Some(PublishedReport { transaction, items }))
}

/// Walks the working set and collects every line that would oversell.
///
/// A data-layer failure on the product fetch aborts immediately as
/// `ProductNotFound`; a clean miss is evaluated as zero stock, which
/// flags any consuming line.
async fn check_inventory_constraints(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    items: &[SubmittedItem],
    existing: Option<&PublishedReport>,
) -> Result<Vec<OffendingItem>, PublishError> {
    let mut offending_items = Vec::new();

    for line in items {
        let fetched = product::fetch_product(tx, &line.product_id).await.map_err(|source| {
            PublishError::ProductNotFound {
                product_id: line.product_id.clone(),
                product_name: line.product_name.clone(),
                source,
            }
        })?;

        let prior = existing.and_then(|snapshot| {
            line.id.as_deref().and_then(|id| snapshot.find_item(id))
        });

        if let Some(offending) = evaluate_item(line, fetched.as_ref(), prior) {
            offending_items.push(offending);
        }
    }

    Ok(offending_items)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use crate::repository::report::generate_transaction_id;
    use mercato_core::{Product, TransactionStatus};

    const STORE: i64 = 7;
    const ORG: i64 = 2;

    fn ctx() -> PublishContext {
        PublishContext {
            store_id: STORE,
            organization_id: ORG,
        }
    }

    fn params(title: &str) -> ReportParams {
        ReportParams {
            report_title: title.to_string(),
            notes: None,
        }
    }

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, inventory_count: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            store_id: STORE,
            organization_id: ORG,
            name: name.to_string(),
            price_cents: 450,
            cost_cents: Some(150),
            inventory_count,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    async fn seed_transaction(db: &Database) -> Transaction {
        let now = Utc::now();
        let transaction = Transaction {
            id: generate_transaction_id(),
            store_id: STORE,
            organization_id: ORG,
            user_id: "cashier-1".to_string(),
            status: TransactionStatus::Pending,
            report_title: None,
            notes: None,
            gross_cents: 0,
            margin_cents: 0,
            created_at: now,
            updated_at: now,
            published_at: None,
        };
        db.reports().create(&transaction).await.unwrap();
        transaction
    }

    fn line(product: &Product, units_sold: i64) -> SubmittedItem {
        SubmittedItem {
            id: None,
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            price_cents: product.price_cents,
            cost_cents: product.cost_cents.unwrap_or(0),
            units_sold,
            store_id: STORE,
            organization_id: ORG,
        }
    }

    async fn stock_of(db: &Database, product: &Product) -> i64 {
        db.products()
            .get_by_id(&product.id)
            .await
            .unwrap()
            .unwrap()
            .inventory_count
    }

    #[tokio::test]
    async fn test_first_publish_creates_items_and_moves_stock() {
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 10).await;
        let pastry = seed_product(&db, "Croissant", 4).await;
        let transaction = seed_transaction(&db).await;

        let outcome = db
            .publisher()
            .publish_report(
                &transaction.id,
                &[line(&coffee, 3), line(&pastry, 4)],
                &params("Morning shift"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap();

        assert_eq!(outcome.transaction.status, TransactionStatus::Published);
        assert_eq!(outcome.transaction.report_title.as_deref(), Some("Morning shift"));
        assert!(outcome.transaction.published_at.is_some());
        assert_eq!(outcome.transaction_items.len(), 2);
        // gross = 450*3 + 450*4, margin = (450-150)*7
        assert_eq!(outcome.transaction.gross_cents, 3150);
        assert_eq!(outcome.transaction.margin_cents, 2100);

        assert_eq!(stock_of(&db, &coffee).await, 7);
        assert_eq!(stock_of(&db, &pastry).await, 0); // exact depletion allowed

        let persisted = db.reports().get_items(&transaction.id).await.unwrap();
        assert_eq!(persisted.len(), 2);
        assert!(persisted.iter().all(|item| item.user_id == "cashier-1"));

        // Route layer serializes the outcome as-is; the key is part of
        // the API contract.
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["transaction_items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_submission_rejected_without_writes() {
        let db = setup().await;
        let transaction = seed_transaction(&db).await;

        let err = db
            .publisher()
            .publish_report(&transaction.id, &[], &params("Empty"), &ctx(), "cashier-1")
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::InvalidSubmission(_)));

        let loaded = db.reports().get_by_id(&transaction.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_malformed_line_rejected() {
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 10).await;
        let transaction = seed_transaction(&db).await;

        let err = db
            .publisher()
            .publish_report(
                &transaction.id,
                &[line(&coffee, -2)],
                &params("Bad"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::InvalidSubmission(_)));
        assert_eq!(stock_of(&db, &coffee).await, 10);
    }

    #[tokio::test]
    async fn test_oversell_reports_every_offending_line() {
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 5).await;
        let pastry = seed_product(&db, "Croissant", 2).await;
        let transaction = seed_transaction(&db).await;

        let err = db
            .publisher()
            .publish_report(
                &transaction.id,
                &[line(&coffee, 9), line(&pastry, 3)],
                &params("Oversold"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap_err();

        let PublishError::InventoryConstraint { offending_items } = err else {
            panic!("expected InventoryConstraint");
        };
        assert_eq!(offending_items.len(), 2);
        assert_eq!(
            offending_items[0],
            OffendingItem::New {
                product_id: coffee.id.clone(),
                product_name: coffee.name.clone(),
                inventory_count: 5,
                provided_units_sold: 9,
            }
        );

        // Nothing moved, nothing persisted.
        assert_eq!(stock_of(&db, &coffee).await, 5);
        assert_eq!(stock_of(&db, &pastry).await, 2);
        assert!(db.reports().get_items(&transaction.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_product_is_flagged_as_zero_stock() {
        let db = setup().await;
        let transaction = seed_transaction(&db).await;

        let ghost = SubmittedItem::new(generate_product_id(), "Ghost Item", 1);

        let err = db
            .publisher()
            .publish_report(&transaction.id, &[ghost], &params("Ghost"), &ctx(), "cashier-1")
            .await
            .unwrap_err();

        let PublishError::InventoryConstraint { offending_items } = err else {
            panic!("expected InventoryConstraint");
        };
        assert_eq!(offending_items.len(), 1);
        match &offending_items[0] {
            OffendingItem::New {
                inventory_count,
                provided_units_sold,
                ..
            } => {
                assert_eq!(*inventory_count, 0);
                assert_eq!(*provided_units_sold, 1);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_product_fetch_failure_is_fatal() {
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 5).await;
        let transaction = seed_transaction(&db).await;

        // Break the data layer underneath the constraint check.
        sqlx::query("DROP TABLE products")
            .execute(db.pool())
            .await
            .unwrap();

        let err = db
            .publisher()
            .publish_report(
                &transaction.id,
                &[line(&coffee, 1)],
                &params("Broken"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap_err();

        match err {
            PublishError::ProductNotFound {
                product_id,
                product_name,
                ..
            } => {
                assert_eq!(product_id, coffee.id);
                assert_eq!(product_name, coffee.name);
            }
            other => panic!("expected ProductNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_failure_rolls_back_everything() {
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 10).await;

        // No such transaction row: the constraint check passes, the item
        // insert then hits the foreign key and the whole batch unwinds.
        let missing_transaction = generate_transaction_id();

        let err = db
            .publisher()
            .publish_report(
                &missing_transaction,
                &[line(&coffee, 3)],
                &params("Orphan"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::Db(DbError::ForeignKeyViolation { .. })
        ));
        assert_eq!(stock_of(&db, &coffee).await, 10);
        assert!(db.reports().get_items(&missing_transaction).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_republish_is_idempotent() {
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 10).await;
        let transaction = seed_transaction(&db).await;

        let first = db
            .publisher()
            .publish_report(
                &transaction.id,
                &[line(&coffee, 3)],
                &params("Shift"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &coffee).await, 7);

        // Resubmit the exact same line, now carrying its persisted id.
        let resubmit = line(&coffee, 3).with_id(first.transaction_items[0].id.clone());
        let second = db
            .publisher()
            .publish_report(&transaction.id, &[resubmit], &params("Shift"), &ctx(), "cashier-1")
            .await
            .unwrap();

        assert_eq!(stock_of(&db, &coffee).await, 7);
        assert_eq!(second.transaction_items.len(), 1);
        assert_eq!(second.transaction_items[0].id, first.transaction_items[0].id);
        assert_eq!(db.reports().get_items(&transaction.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_republish_decrease_returns_stock() {
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 15).await;
        let transaction = seed_transaction(&db).await;

        let first = db
            .publisher()
            .publish_report(
                &transaction.id,
                &[line(&coffee, 10)],
                &params("Shift"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &coffee).await, 5);

        // Correction: 10 → 8 returns 2 units.
        let resubmit = line(&coffee, 8).with_id(first.transaction_items[0].id.clone());
        db.publisher()
            .publish_report(&transaction.id, &[resubmit], &params("Shift"), &ctx(), "cashier-1")
            .await
            .unwrap();

        assert_eq!(stock_of(&db, &coffee).await, 7);
        let items = db.reports().get_items(&transaction.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].units_sold, 8);
    }

    #[tokio::test]
    async fn test_republish_increase_within_stock() {
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 15).await;
        let transaction = seed_transaction(&db).await;

        let first = db
            .publisher()
            .publish_report(
                &transaction.id,
                &[line(&coffee, 10)],
                &params("Shift"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &coffee).await, 5);

        // 10 → 14 consumes 4 of the 5 remaining.
        let resubmit = line(&coffee, 14).with_id(first.transaction_items[0].id.clone());
        db.publisher()
            .publish_report(&transaction.id, &[resubmit], &params("Shift"), &ctx(), "cashier-1")
            .await
            .unwrap();

        assert_eq!(stock_of(&db, &coffee).await, 1);
    }

    #[tokio::test]
    async fn test_republish_increase_beyond_stock_flagged() {
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 15).await;
        let transaction = seed_transaction(&db).await;

        let first = db
            .publisher()
            .publish_report(
                &transaction.id,
                &[line(&coffee, 10)],
                &params("Shift"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &coffee).await, 5);

        // 10 → 19 would consume 9 with only 5 available.
        let resubmit = line(&coffee, 19).with_id(first.transaction_items[0].id.clone());
        let err = db
            .publisher()
            .publish_report(&transaction.id, &[resubmit], &params("Shift"), &ctx(), "cashier-1")
            .await
            .unwrap_err();

        let PublishError::InventoryConstraint { offending_items } = err else {
            panic!("expected InventoryConstraint");
        };
        assert_eq!(
            offending_items[0],
            OffendingItem::Updated {
                product_id: coffee.id.clone(),
                product_name: coffee.name.clone(),
                inventory_count: 5,
                updated_provided_units_sold: 19,
                existing_units_sold: 10,
            }
        );

        // Rejected republish leaves the published state untouched.
        assert_eq!(stock_of(&db, &coffee).await, 5);
        let items = db.reports().get_items(&transaction.id).await.unwrap();
        assert_eq!(items[0].units_sold, 10);
    }

    #[tokio::test]
    async fn test_republish_with_added_line() {
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 10).await;
        let pastry = seed_product(&db, "Croissant", 6).await;
        let transaction = seed_transaction(&db).await;

        let first = db
            .publisher()
            .publish_report(
                &transaction.id,
                &[line(&coffee, 3)],
                &params("Shift"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap();

        // Correction adds a line the first publish missed.
        let resubmit = vec![
            line(&coffee, 3).with_id(first.transaction_items[0].id.clone()),
            line(&pastry, 2),
        ];
        let second = db
            .publisher()
            .publish_report(&transaction.id, &resubmit, &params("Shift"), &ctx(), "cashier-2")
            .await
            .unwrap();

        assert_eq!(second.transaction_items.len(), 2);
        assert_eq!(stock_of(&db, &coffee).await, 7); // unchanged line, no movement
        assert_eq!(stock_of(&db, &pastry).await, 4); // new line decremented

        let items = db.reports().get_items(&transaction.id).await.unwrap();
        assert_eq!(items.len(), 2);
        // The added line records the acting user of the second publish.
        let added = items.iter().find(|i| i.product_id == pastry.id).unwrap();
        assert_eq!(added.user_id, "cashier-2");
    }

    #[tokio::test]
    async fn test_stale_item_id_becomes_a_new_line() {
        // An id that matches no (id, product, transaction) triple is
        // treated as a reference miss: the line is created fresh.
        let db = setup().await;
        let coffee = seed_product(&db, "Flat White", 10).await;
        let other = seed_transaction(&db).await;
        let transaction = seed_transaction(&db).await;

        // Publish a line under a *different* transaction to obtain a
        // real item id that must not be claimable here.
        let foreign = db
            .publisher()
            .publish_report(
                &other.id,
                &[line(&coffee, 1)],
                &params("Other"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap();

        let stolen_id = foreign.transaction_items[0].id.clone();
        let outcome = db
            .publisher()
            .publish_report(
                &transaction.id,
                &[line(&coffee, 2).with_id(stolen_id.clone())],
                &params("Shift"),
                &ctx(),
                "cashier-1",
            )
            .await
            .unwrap();

        // Fresh row, fresh id; the foreign line is untouched.
        assert_ne!(outcome.transaction_items[0].id, stolen_id);
        assert_eq!(db.reports().get_items(&other.id).await.unwrap().len(), 1);
        assert_eq!(stock_of(&db, &coffee).await, 7); // 10 - 1 - 2
    }
}
