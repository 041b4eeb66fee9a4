//! Concurrent sale upserts against a file-backed database.
//!
//! In-memory databases use a single connection, so they can't race. These
//! tests open a real file with a multi-connection pool.

use std::path::PathBuf;
use std::time::Duration;

use estoque_core::{CoreError, LineItemRequest, ProductInput};
use estoque_db::{upsert_sale, Database, DbConfig, SaleError};
use uuid::Uuid;

struct TempDb {
    path: PathBuf,
    db: Database,
}

impl TempDb {
    async fn open() -> Self {
        let path = std::env::temp_dir().join(format!("estoque-test-{}.db", Uuid::new_v4()));
        let config = DbConfig::new(&path)
            .max_connections(4)
            .busy_timeout(Duration::from_secs(2));
        let db = Database::new(config).await.unwrap();
        TempDb { path, db }
    }

    async fn close(self) {
        self.db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

async fn product(db: &Database, name: &str, stock: i64) -> String {
    db.products()
        .upsert(&ProductInput {
            id: None,
            name: name.to_string(),
            price_cents: 1000,
            stock,
        })
        .await
        .unwrap()
        .id
}

fn is_expected_failure(err: &SaleError) -> bool {
    matches!(err.core_error(), Some(CoreError::InsufficientStock { .. })) || err.is_retryable()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_upserts_never_oversell() {
    let temp = TempDb::open().await;
    let product_id = product(&temp.db, "Mochila", 5).await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let db = temp.db.clone();
        let items = vec![LineItemRequest::new(&product_id, 4)];
        handles.push(tokio::spawn(async move {
            upsert_sale(&db, None, &items).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => assert!(is_expected_failure(&err), "unexpected error: {err}"),
        }
    }

    let stock = temp
        .db
        .products()
        .get_by_id(&product_id)
        .await
        .unwrap()
        .unwrap()
        .stock;

    assert!(successes <= 1);
    assert_eq!(stock, 5 - 4 * successes);
    assert_eq!(temp.db.sales().count().await.unwrap(), successes);

    temp.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_small_concurrent_sales_add_up() {
    let temp = TempDb::open().await;
    let product_id = product(&temp.db, "Estojo", 20).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let db = temp.db.clone();
        let items = vec![LineItemRequest::new(&product_id, 1)];
        handles.push(tokio::spawn(async move {
            upsert_sale(&db, None, &items).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => assert!(err.is_retryable(), "unexpected error: {err}"),
        }
    }

    let stock = temp
        .db
        .products()
        .get_by_id(&product_id)
        .await
        .unwrap()
        .unwrap()
        .stock;

    // Every committed sale took exactly one unit
    assert_eq!(stock, 20 - successes);
    assert_eq!(temp.db.sales().count().await.unwrap(), successes);

    temp.close().await;
}
