//! # Report Repository
//!
//! Database operations for transactions (POS reports) and their line
//! items.
//!
//! ## Transaction Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Transaction Lifecycle                               │
//! │                                                                         │
//! │  1. OPEN SALE                                                          │
//! │     └── create() → Transaction { status: Pending }                     │
//! │                                                                         │
//! │  2. PUBLISH REPORT (ReportPublisher, atomic)                           │
//! │     └── upsert line items + inventory deltas + mark_published()        │
//! │         → Transaction { status: Published }                            │
//! │                                                                         │
//! │  3. (OPTIONAL) REPUBLISH WITH CORRECTIONS                              │
//! │     └── published → published, stock adjusted by the deltas            │
//! │                                                                         │
//! │  pending-rollback is reserved for a non-atomic downstream failure      │
//! │  path owned by an external collaborator; nothing here sets it.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mercato_core::{
    PublishedReport, ReportParams, ReportTotals, Transaction, TransactionItem,
};

const TRANSACTION_COLUMNS: &str = "id, store_id, organization_id, user_id, status, report_title, \
     notes, gross_cents, margin_cents, created_at, updated_at, published_at";

const ITEM_COLUMNS: &str = "id, transaction_id, product_id, product_name, price_cents, \
     cost_cents, units_sold, store_id, organization_id, user_id, created_at, updated_at";

/// Repository for transaction/report database operations.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Inserts a transaction (opens a sale).
    pub async fn create(&self, transaction: &Transaction) -> DbResult<()> {
        debug!(id = %transaction.id, store_id = %transaction.store_id, "Creating transaction");

        sqlx::query(
            "INSERT INTO transactions ( \
                 id, store_id, organization_id, user_id, status, report_title, \
                 notes, gross_cents, margin_cents, created_at, updated_at, published_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(&transaction.id)
        .bind(transaction.store_id)
        .bind(transaction.organization_id)
        .bind(&transaction.user_id)
        .bind(transaction.status)
        .bind(&transaction.report_title)
        .bind(&transaction.notes)
        .bind(transaction.gross_cents)
        .bind(transaction.margin_cents)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .bind(transaction.published_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a transaction by ID, regardless of status.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let mut conn = self.pool.acquire().await?;
        fetch_transaction(&mut conn, id).await
    }

    /// Gets all line items for a transaction.
    pub async fn get_items(&self, transaction_id: &str) -> DbResult<Vec<TransactionItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_items(&mut conn, transaction_id).await
    }

    /// Gets the published snapshot of a transaction, with its items.
    ///
    /// Returns `None` when the transaction does not exist OR has never
    /// been published - a merely-pending transaction is not a published
    /// report.
    pub async fn get_published(&self, transaction_id: &str) -> DbResult<Option<PublishedReport>> {
        let mut conn = self.pool.acquire().await?;

        let Some(transaction) = fetch_published(&mut conn, transaction_id).await? else {
            return Ok(None);
        };
        let items = fetch_items(&mut conn, transaction_id).await?;

        Ok(Some(PublishedReport { transaction, items }))
    }
}

// =============================================================================
// Connection-Level Operations
// =============================================================================
// Shared by the pool methods above and the publish engine's transaction.

/// Fetches a transaction by id on an explicit connection.
pub(crate) async fn fetch_transaction(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<Transaction>> {
    let transaction = sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(transaction)
}

/// Fetches a transaction by id, filtered to `status = 'published'`.
///
/// Only a previously *published* transaction counts as "existing" for
/// change detection; a pending one never blocks re-evaluation.
pub(crate) async fn fetch_published(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<Transaction>> {
    let transaction = sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1 AND status = 'published'"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(transaction)
}

/// Fetches all line items of a transaction on an explicit connection.
pub(crate) async fn fetch_items(
    conn: &mut SqliteConnection,
    transaction_id: &str,
) -> DbResult<Vec<TransactionItem>> {
    let items = sqlx::query_as::<_, TransactionItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM transaction_items \
         WHERE transaction_id = ?1 ORDER BY created_at"
    ))
    .bind(transaction_id)
    .fetch_all(conn)
    .await?;

    Ok(items)
}

/// Composite line-item lookup: id AND product AND transaction.
///
/// The extra keys guard against a client echoing an item id that
/// belongs to a different transaction (or a different product line) -
/// such an id simply misses and the caller treats the line as new.
pub(crate) async fn fetch_item_scoped(
    conn: &mut SqliteConnection,
    id: &str,
    product_id: &str,
    transaction_id: &str,
) -> DbResult<Option<TransactionItem>> {
    let item = sqlx::query_as::<_, TransactionItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM transaction_items \
         WHERE id = ?1 AND product_id = ?2 AND transaction_id = ?3"
    ))
    .bind(id)
    .bind(product_id)
    .bind(transaction_id)
    .fetch_optional(conn)
    .await?;

    Ok(item)
}

/// Inserts a line item on an explicit connection.
pub(crate) async fn insert_item(
    conn: &mut SqliteConnection,
    item: &TransactionItem,
) -> DbResult<()> {
    debug!(transaction_id = %item.transaction_id, product_id = %item.product_id, "Inserting line item");

    sqlx::query(
        "INSERT INTO transaction_items ( \
             id, transaction_id, product_id, product_name, price_cents, \
             cost_cents, units_sold, store_id, organization_id, user_id, \
             created_at, updated_at \
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(&item.id)
    .bind(&item.transaction_id)
    .bind(&item.product_id)
    .bind(&item.product_name)
    .bind(item.price_cents)
    .bind(item.cost_cents)
    .bind(item.units_sold)
    .bind(item.store_id)
    .bind(item.organization_id)
    .bind(&item.user_id)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Updates a line item's reported fields on an explicit connection.
pub(crate) async fn update_item(
    conn: &mut SqliteConnection,
    item: &TransactionItem,
) -> DbResult<()> {
    debug!(id = %item.id, units_sold = %item.units_sold, "Updating line item");

    let result = sqlx::query(
        "UPDATE transaction_items SET \
             product_name = ?2, \
             price_cents = ?3, \
             cost_cents = ?4, \
             units_sold = ?5, \
             store_id = ?6, \
             organization_id = ?7, \
             updated_at = ?8 \
         WHERE id = ?1",
    )
    .bind(&item.id)
    .bind(&item.product_name)
    .bind(item.price_cents)
    .bind(item.cost_cents)
    .bind(item.units_sold)
    .bind(item.store_id)
    .bind(item.organization_id)
    .bind(item.updated_at)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("TransactionItem", &item.id));
    }

    Ok(())
}

/// Marks the parent transaction as published, stamping report fields
/// and totals. Scoped by store so a publish can never cross tenants.
pub(crate) async fn mark_published(
    conn: &mut SqliteConnection,
    transaction_id: &str,
    store_id: i64,
    params: &ReportParams,
    totals: &ReportTotals,
    published_at: DateTime<Utc>,
) -> DbResult<()> {
    let result = sqlx::query(
        "UPDATE transactions SET \
             status = 'published', \
             report_title = ?3, \
             notes = ?4, \
             gross_cents = ?5, \
             margin_cents = ?6, \
             updated_at = ?7, \
             published_at = ?7 \
         WHERE id = ?1 AND store_id = ?2",
    )
    .bind(transaction_id)
    .bind(store_id)
    .bind(&params.report_title)
    .bind(&params.notes)
    .bind(totals.gross.cents())
    .bind(totals.margin.cents())
    .bind(published_at)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Transaction", transaction_id));
    }

    Ok(())
}

/// Generates a new transaction ID.
pub fn generate_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new line item ID.
pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
