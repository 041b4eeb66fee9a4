//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (one transaction, see `upsert`)                             │
//! │     └── insert_sale()      → Sale { occurred_at: now }                 │
//! │     └── insert_line_item() → SaleLineItem (price snapshot)             │
//! │     └── insert_line_item() → SaleLineItem                              │
//! │                                                                         │
//! │  2. REPLACE                                                            │
//! │     └── restore stock of every item, delete_sale(), then CREATE        │
//! │         (the replacement gets a new id)                                │
//! │                                                                         │
//! │  3. DELETE                                                             │
//! │     └── restore stock, delete_sale() (items go with ON DELETE CASCADE) │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes only happen inside a sale transaction, so the write helpers here
//! are executor-generic and crate-private. [`SaleRepository`] is read-only.

use std::collections::HashMap;

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use estoque_core::{Sale, SaleLineItem, SaleSummary};

const ITEM_COLUMNS: &str = "id, sale_id, product_id, quantity, unit_price_cents, position";

// =============================================================================
// Executor-generic queries
// =============================================================================

pub(crate) async fn fetch_sale<'e, E>(executor: E, id: &str) -> DbResult<Option<Sale>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sale = sqlx::query_as::<_, Sale>("SELECT id, occurred_at FROM sales WHERE id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(sale)
}

/// Items of one sale, in the order they were requested.
pub(crate) async fn fetch_items<'e, E>(executor: E, sale_id: &str) -> DbResult<Vec<SaleLineItem>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM sale_items WHERE sale_id = ?1 ORDER BY position",
        ITEM_COLUMNS
    );
    let items = sqlx::query_as::<_, SaleLineItem>(&sql)
        .bind(sale_id)
        .fetch_all(executor)
        .await?;

    Ok(items)
}

pub(crate) async fn insert_sale<'e, E>(executor: E, sale: &Sale) -> DbResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(id = %sale.id, "Inserting sale");

    sqlx::query("INSERT INTO sales (id, occurred_at) VALUES (?1, ?2)")
        .bind(&sale.id)
        .bind(sale.occurred_at)
        .execute(executor)
        .await?;

    Ok(())
}

/// Deletes a sale; its items are removed by the cascade.
///
/// Returns false if no such sale exists.
pub(crate) async fn delete_sale<'e, E>(executor: E, id: &str) -> DbResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(id = %id, "Deleting sale");

    let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn insert_line_item<'e, E>(executor: E, item: &SaleLineItem) -> DbResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(
        sale_id = %item.sale_id,
        product_id = %item.product_id,
        quantity = item.quantity,
        "Adding line item"
    );

    sqlx::query(
        r#"
        INSERT INTO sale_items (id, sale_id, product_id, quantity, unit_price_cents, position)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&item.id)
    .bind(&item.sale_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.position)
    .execute(executor)
    .await?;

    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Read access to sales for the list and detail views.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        fetch_sale(&self.pool, id).await
    }

    /// Gets all items of a sale, in request order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleLineItem>> {
        fetch_items(&self.pool, sale_id).await
    }

    /// Gets a sale together with its items and totals.
    pub async fn get_summary(&self, id: &str) -> DbResult<Option<SaleSummary>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.get_items(id).await?;

        Ok(Some(SaleSummary::new(sale, items)))
    }

    /// Lists every sale with its items, newest first.
    ///
    /// Two queries regardless of the number of sales; items are grouped in
    /// memory.
    pub async fn list_summaries(&self) -> DbResult<Vec<SaleSummary>> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT id, occurred_at FROM sales ORDER BY occurred_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let sql = format!(
            "SELECT {} FROM sale_items ORDER BY sale_id, position",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, SaleLineItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let mut by_sale: HashMap<String, Vec<SaleLineItem>> = HashMap::new();
        for item in items {
            by_sale.entry(item.sale_id.clone()).or_default().push(item);
        }

        let summaries: Vec<SaleSummary> = sales
            .into_iter()
            .map(|sale| {
                let items = by_sale.remove(&sale.id).unwrap_or_default();
                SaleSummary::new(sale, items)
            })
            .collect();

        debug!(count = summaries.len(), "Listed sales");
        Ok(summaries)
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts line items across all sales (for diagnostics).
    pub async fn count_items(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new sale item ID.
pub fn generate_sale_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::{Duration, Utc};
    use estoque_core::ProductInput;

    async fn seed_product(db: &Database, name: &str, price_cents: i64) -> String {
        db.products()
            .upsert(&ProductInput {
                id: None,
                name: name.to_string(),
                price_cents,
                stock: 100,
            })
            .await
            .unwrap()
            .id
    }

    fn item(sale_id: &str, product_id: &str, quantity: i64, price: i64, position: i64) -> SaleLineItem {
        SaleLineItem {
            id: generate_sale_item_id(),
            sale_id: sale_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents: price,
            position,
        }
    }

    #[tokio::test]
    async fn test_summary_keeps_request_order_and_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let pen = seed_product(&db, "Caneta", 250).await;
        let pad = seed_product(&db, "Bloco", 1200).await;

        let sale = Sale {
            id: generate_sale_id(),
            occurred_at: Utc::now(),
        };
        insert_sale(db.pool(), &sale).await.unwrap();
        insert_line_item(db.pool(), &item(&sale.id, &pad, 1, 1200, 0)).await.unwrap();
        insert_line_item(db.pool(), &item(&sale.id, &pen, 3, 250, 1)).await.unwrap();

        let summary = db.sales().get_summary(&sale.id).await.unwrap().unwrap();
        let products: Vec<&str> = summary.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(products, vec![pad.as_str(), pen.as_str()]);
        assert_eq!(summary.total_quantity, 4);
        assert_eq!(summary.total_cents, 1950);

        assert!(db.sales().get_summary("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let pen = seed_product(&db, "Caneta", 250).await;

        let sale = Sale {
            id: generate_sale_id(),
            occurred_at: Utc::now(),
        };
        insert_sale(db.pool(), &sale).await.unwrap();
        insert_line_item(db.pool(), &item(&sale.id, &pen, 2, 250, 0)).await.unwrap();
        assert_eq!(db.sales().count_items().await.unwrap(), 1);

        assert!(delete_sale(db.pool(), &sale.id).await.unwrap());
        assert!(!delete_sale(db.pool(), &sale.id).await.unwrap());

        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(db.sales().count_items().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_line_item_requires_existing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sale = Sale {
            id: generate_sale_id(),
            occurred_at: Utc::now(),
        };
        insert_sale(db.pool(), &sale).await.unwrap();

        let result = insert_line_item(db.pool(), &item(&sale.id, "ghost", 1, 100, 0)).await;
        assert!(matches!(
            result,
            Err(crate::DbError::ForeignKeyViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_summaries_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let pen = seed_product(&db, "Caneta", 250).await;
        let now = Utc::now();

        let older = Sale {
            id: generate_sale_id(),
            occurred_at: now - Duration::hours(2),
        };
        let newer = Sale {
            id: generate_sale_id(),
            occurred_at: now,
        };
        insert_sale(db.pool(), &older).await.unwrap();
        insert_sale(db.pool(), &newer).await.unwrap();
        insert_line_item(db.pool(), &item(&older.id, &pen, 1, 250, 0)).await.unwrap();

        let summaries = db.sales().list_summaries().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, newer.id);
        assert!(summaries[0].items.is_empty());
        assert_eq!(summaries[1].id, older.id);
        assert_eq!(summaries[1].items.len(), 1);
    }
}
