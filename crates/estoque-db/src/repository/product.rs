//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Product form upsert (create or edit name, price, stock)
//! - Lookups and listing for the products view
//! - Stock deltas used by the sale transactions
//!
//! ## Stock Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  Sales never write an absolute stock level. They apply deltas:     │
//! │                                                                     │
//! │  restore:  UPDATE products SET stock = stock + 2 WHERE id = ?      │
//! │  take:     UPDATE products SET stock = stock - 2                   │
//! │            WHERE id = ? AND stock >= 2                             │
//! │                                                                     │
//! │  The guard on `take` makes the row refuse to go negative even if   │
//! │  the caller's earlier read is stale.                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use estoque_core::{Product, ProductInput};

const PRODUCT_COLUMNS: &str = "id, name, price_cents, stock, created_at, updated_at";

// =============================================================================
// Executor-generic queries
// =============================================================================
// Shared by ProductRepository (pool) and the sale transaction (connection).

pub(crate) async fn fetch_product<'e, E>(executor: E, id: &str) -> DbResult<Option<Product>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(product)
}

/// Adds `quantity` units back to stock.
pub(crate) async fn increment_stock<'e, E>(executor: E, id: &str, quantity: i64) -> DbResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(id = %id, quantity = %quantity, "Restoring stock");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock + ?2, updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", id));
    }

    Ok(())
}

/// Takes `quantity` units from stock if at least that many are available.
///
/// ## Returns
/// * `Ok(true)` - Stock decremented
/// * `Ok(false)` - Product missing or not enough stock; nothing changed
pub(crate) async fn decrement_stock<'e, E>(executor: E, id: &str, quantity: i64) -> DbResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(id = %id, quantity = %quantity, "Taking stock");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2, updated_at = ?3
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.upsert(&input).await?;
/// let all = repo.list().await?;
/// ```
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
        fetch_product(&self.pool, id).await
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {} FROM products ORDER BY name, id", PRODUCT_COLUMNS);
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - ID already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates name, price and stock of an existing product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price_cents = ?3,
                stock = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Creates a product (`input.id` is `None`) or edits an existing one.
    ///
    /// The name is stored trimmed. Editing a product never touches the price
    /// snapshots of sales already made.
    pub async fn upsert(&self, input: &ProductInput) -> DbResult<Product> {
        let now = Utc::now();
        let name = input.name.trim().to_string();

        match &input.id {
            None => {
                let product = Product {
                    id: generate_product_id(),
                    name,
                    price_cents: input.price_cents,
                    stock: input.stock,
                    created_at: now,
                    updated_at: now,
                };
                self.insert(&product).await
            }
            Some(id) => {
                let existing = self
                    .get_by_id(id)
                    .await?
                    .ok_or_else(|| DbError::not_found("Product", id))?;

                let product = Product {
                    name,
                    price_cents: input.price_cents,
                    stock: input.stock,
                    updated_at: now,
                    ..existing
                };
                self.update(&product).await?;
                Ok(product)
            }
        }
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
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
    use crate::{Database, DbConfig};

    fn input(id: Option<String>, name: &str, price_cents: i64, stock: i64) -> ProductInput {
        ProductInput {
            id,
            name: name.to_string(),
            price_cents,
            stock,
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let created = repo.upsert(&input(None, "  Caderno  ", 1590, 10)).await.unwrap();
        assert_eq!(created.name, "Caderno");
        assert_eq!(repo.count().await.unwrap(), 1);

        let updated = repo
            .upsert(&input(Some(created.id.clone()), "Caderno 96 folhas", 1790, 8))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);

        let stored = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Caderno 96 folhas");
        assert_eq!(stored.price_cents, 1790);
        assert_eq!(stored.stock, 8);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_unknown_id_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db
            .products()
            .upsert(&input(Some(generate_product_id()), "Lápis", 150, 3))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.upsert(&input(None, "Régua", 300, 1)).await.unwrap();
        repo.upsert(&input(None, "Borracha", 100, 1)).await.unwrap();
        repo.upsert(&input(None, "Lápis", 150, 1)).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Borracha", "Lápis", "Régua"]);
    }

    #[tokio::test]
    async fn test_guarded_decrement_never_goes_negative() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().upsert(&input(None, "Cola", 500, 3)).await.unwrap();

        assert!(decrement_stock(db.pool(), &product.id, 2).await.unwrap());
        assert!(!decrement_stock(db.pool(), &product.id, 2).await.unwrap());
        assert!(!decrement_stock(db.pool(), "missing", 1).await.unwrap());

        increment_stock(db.pool(), &product.id, 4).await.unwrap();
        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.stock, 5);

        assert!(matches!(
            increment_stock(db.pool(), "missing", 1).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_by_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: "Tesoura".to_string(),
            price_cents: 900,
            stock: -1,
            created_at: now,
            updated_at: now,
        };

        assert!(matches!(
            db.products().insert(&product).await,
            Err(DbError::QueryFailed(_))
        ));
    }
}
