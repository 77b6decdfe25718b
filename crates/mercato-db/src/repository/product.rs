//! # Product Repository
//!
//! Database operations for products and their inventory counts.
//!
//! ## Inventory Updates Are Deltas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ WRONG: Absolute update (lost updates under concurrency)        │
//! │     UPDATE products SET inventory_count = 7 WHERE id = ?           │
//! │                                                                     │
//! │  ✅ CORRECT: Delta update (atomic in the database)                 │
//! │     UPDATE products SET inventory_count = inventory_count - 3      │
//! │                                                                     │
//! │  Two lines in one publish (or two concurrent publishes) touching   │
//! │  the same product compose correctly: -3 + -2 = -5, regardless of   │
//! │  statement order. Correctness never depends on a stale read.       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mercato_core::Product;

const PRODUCT_COLUMNS: &str = "id, store_id, organization_id, name, price_cents, cost_cents, \
     inventory_count, is_active, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                 id, store_id, organization_id, name, price_cents, cost_cents, \
                 inventory_count, is_active, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&product.id)
        .bind(product.store_id)
        .bind(product.organization_id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.inventory_count)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Adjusts a product's inventory count by a delta.
    ///
    /// Positive delta restocks; negative delta consumes. Used by the
    /// admin restock flow - the publish engine applies the same delta
    /// statement on its own transaction handle.
    pub async fn adjust_inventory(&self, id: &str, delta: i64) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        apply_inventory_delta(&mut conn, id, delta).await
    }

    /// Counts active products in a store (for diagnostics and seeding).
    pub async fn count(&self, store_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE store_id = ?1 AND is_active = 1",
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-Level Operations
// =============================================================================
// Shared by the pool methods above and the publish engine's transaction.

/// Fetches a product by id on an explicit connection.
pub(crate) async fn fetch_product(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(product)
}

/// Applies an inventory delta on an explicit connection.
///
/// Single atomic statement, never read-modify-write. Zero matched rows
/// means the product vanished and is reported as NotFound so a wrapping
/// transaction aborts instead of silently dropping stock movement.
pub(crate) async fn apply_inventory_delta(
    conn: &mut SqliteConnection,
    id: &str,
    delta: i64,
) -> DbResult<()> {
    debug!(id = %id, delta = %delta, "Adjusting inventory");

    let now = Utc::now();

    let result = sqlx::query(
        "UPDATE products \
         SET inventory_count = inventory_count + ?2, updated_at = ?3 \
         WHERE id = ?1",
    )
    .bind(id)
    .bind(delta)
    .bind(now)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", id));
    }

    Ok(())
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_product(inventory_count: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            store_id: 1,
            organization_id: 1,
            name: "House Blend 500g".to_string(),
            price_cents: 1250,
            cost_cents: Some(700),
            inventory_count,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = sample_product(12);

        db.products().insert(&product).await.unwrap();

        let loaded = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "House Blend 500g");
        assert_eq!(loaded.inventory_count, 12);
        assert_eq!(db.products().count(1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_adjust_inventory_is_a_delta() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = sample_product(10);
        db.products().insert(&product).await.unwrap();

        db.products().adjust_inventory(&product.id, -3).await.unwrap();
        db.products().adjust_inventory(&product.id, 5).await.unwrap();

        let loaded = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.inventory_count, 12);
    }

    #[tokio::test]
    async fn test_adjust_inventory_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .products()
            .adjust_inventory("no-such-product", -1)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
