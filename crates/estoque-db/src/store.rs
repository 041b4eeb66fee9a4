//! # Sale Store
//!
//! The seam between the sale transactions and the database.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Store Seam                                      │
//! │                                                                         │
//! │  upsert_sale(&store, ...)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleStore::begin()  ──►  SaleTransaction                              │
//! │                           ├── find_sale_with_items / delete_sale       │
//! │                           ├── insert_sale / insert_line_item           │
//! │                           ├── find_product                             │
//! │                           ├── increment_stock / decrement_stock        │
//! │                           └── commit / rollback                        │
//! │                                                                         │
//! │  Database implements SaleStore with SqliteSaleTx, which wraps one      │
//! │  sqlx::Transaction. Dropping it without commit rolls back.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::Sqlite;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::{product, sale};
use estoque_core::{Product, Sale, SaleLineItem, SaleSummary};

/// Opens atomic transactions over the sale data.
#[async_trait]
pub trait SaleStore: Send + Sync {
    type Tx: SaleTransaction;

    /// Begins a new transaction.
    async fn begin(&self) -> DbResult<Self::Tx>;
}

/// Repository operations scoped to one open transaction.
///
/// Nothing is visible outside the transaction until [`commit`](Self::commit).
#[async_trait]
pub trait SaleTransaction: Send {
    /// Loads a sale together with its items.
    async fn find_sale_with_items(&mut self, id: &str) -> DbResult<Option<SaleSummary>>;

    /// Deletes a sale and its items. Returns false if it didn't exist.
    async fn delete_sale(&mut self, id: &str) -> DbResult<bool>;

    async fn insert_sale(&mut self, sale: &Sale) -> DbResult<()>;

    /// Reads a product as seen by this transaction.
    async fn find_product(&mut self, id: &str) -> DbResult<Option<Product>>;

    async fn insert_line_item(&mut self, item: &SaleLineItem) -> DbResult<()>;

    /// Adds units back to a product's stock.
    async fn increment_stock(&mut self, product_id: &str, quantity: i64) -> DbResult<()>;

    /// Takes units from a product's stock.
    ///
    /// Returns false, changing nothing, when fewer than `quantity` units are
    /// in stock.
    async fn decrement_stock(&mut self, product_id: &str, quantity: i64) -> DbResult<bool>;

    async fn commit(self) -> DbResult<()>;

    async fn rollback(self) -> DbResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

/// A sale transaction on the SQLite pool.
#[derive(Debug)]
pub struct SqliteSaleTx {
    tx: sqlx::Transaction<'static, Sqlite>,
}

#[async_trait]
impl SaleStore for Database {
    type Tx = SqliteSaleTx;

    async fn begin(&self) -> DbResult<SqliteSaleTx> {
        let tx = self.pool().begin().await.map_err(|e| match DbError::from(e) {
            DbError::PoolExhausted => DbError::PoolExhausted,
            other => DbError::TransactionFailed(other.to_string()),
        })?;

        debug!("Sale transaction started");
        Ok(SqliteSaleTx { tx })
    }
}

#[async_trait]
impl SaleTransaction for SqliteSaleTx {
    async fn find_sale_with_items(&mut self, id: &str) -> DbResult<Option<SaleSummary>> {
        let Some(found) = sale::fetch_sale(&mut *self.tx, id).await? else {
            return Ok(None);
        };
        let items = sale::fetch_items(&mut *self.tx, id).await?;

        Ok(Some(SaleSummary::new(found, items)))
    }

    async fn delete_sale(&mut self, id: &str) -> DbResult<bool> {
        sale::delete_sale(&mut *self.tx, id).await
    }

    async fn insert_sale(&mut self, new_sale: &Sale) -> DbResult<()> {
        sale::insert_sale(&mut *self.tx, new_sale).await
    }

    async fn find_product(&mut self, id: &str) -> DbResult<Option<Product>> {
        product::fetch_product(&mut *self.tx, id).await
    }

    async fn insert_line_item(&mut self, item: &SaleLineItem) -> DbResult<()> {
        sale::insert_line_item(&mut *self.tx, item).await
    }

    async fn increment_stock(&mut self, product_id: &str, quantity: i64) -> DbResult<()> {
        product::increment_stock(&mut *self.tx, product_id, quantity).await
    }

    async fn decrement_stock(&mut self, product_id: &str, quantity: i64) -> DbResult<bool> {
        product::decrement_stock(&mut *self.tx, product_id, quantity).await
    }

    async fn commit(self) -> DbResult<()> {
        self.tx.commit().await.map_err(|e| match DbError::from(e) {
            // Busy is already TransactionFailed; anything else at commit is too
            DbError::TransactionFailed(msg) => DbError::TransactionFailed(msg),
            other => DbError::TransactionFailed(other.to_string()),
        })?;

        debug!("Sale transaction committed");
        Ok(())
    }

    async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!("Sale transaction rolled back");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::sale::generate_sale_id;
    use crate::DbConfig;
    use chrono::Utc;
    use estoque_core::ProductInput;

    async fn setup() -> (Database, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .upsert(&ProductInput {
                id: None,
                name: "Grampeador".to_string(),
                price_cents: 2490,
                stock: 5,
            })
            .await
            .unwrap();
        (db, product)
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let (db, product) = setup().await;

        let mut tx = db.begin().await.unwrap();
        let sale = Sale {
            id: generate_sale_id(),
            occurred_at: Utc::now(),
        };
        tx.insert_sale(&sale).await.unwrap();
        assert!(tx.decrement_stock(&product.id, 5).await.unwrap());
        assert_eq!(tx.find_product(&product.id).await.unwrap().unwrap().stock, 0);
        tx.rollback().await.unwrap();

        assert_eq!(db.sales().count().await.unwrap(), 0);
        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.stock, 5);
    }

    #[tokio::test]
    async fn test_drop_without_commit_rolls_back() {
        let (db, product) = setup().await;

        {
            let mut tx = db.begin().await.unwrap();
            assert!(tx.decrement_stock(&product.id, 2).await.unwrap());
        }

        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.stock, 5);
    }

    #[tokio::test]
    async fn test_commit_persists_sale_with_items() {
        let (db, product) = setup().await;

        let mut tx = db.begin().await.unwrap();
        let sale = Sale {
            id: generate_sale_id(),
            occurred_at: Utc::now(),
        };
        tx.insert_sale(&sale).await.unwrap();
        tx.insert_line_item(&SaleLineItem {
            id: sale::generate_sale_item_id(),
            sale_id: sale.id.clone(),
            product_id: product.id.clone(),
            quantity: 2,
            unit_price_cents: product.price_cents,
            position: 0,
        })
        .await
        .unwrap();

        let staged = tx.find_sale_with_items(&sale.id).await.unwrap().unwrap();
        assert_eq!(staged.total_cents, 4980);
        tx.commit().await.unwrap();

        let summary = db.sales().get_summary(&sale.id).await.unwrap().unwrap();
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.quantity_of(&product.id), 2);
    }
}
