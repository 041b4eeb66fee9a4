//! # Sale Upsert
//!
//! Creates, replaces and deletes sales while keeping product stock
//! consistent with them.
//!
//! ## Upsert Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         upsert_sale                                     │
//! │                                                                         │
//! │  validate quantities (> 0)              ── fail: Rejected{line}        │
//! │       │                                                                 │
//! │  BEGIN                                                                 │
//! │       │                                                                 │
//! │  existing id given and found?                                          │
//! │       ├── yes: stock += qty for each old item, DELETE sale (cascade)   │
//! │       └── no:  nothing to replace                                      │
//! │       │                                                                 │
//! │  INSERT sale (new id, occurred_at = now)                               │
//! │       │                                                                 │
//! │  for each requested item, in order:                                    │
//! │       ├── product missing        ── ProductNotFound   ─┐               │
//! │       ├── quantity > stock       ── InsufficientStock ─┤               │
//! │       ├── INSERT item (price snapshot)                 │               │
//! │       └── stock -= qty (guarded) ── InsufficientStock ─┤               │
//! │       │                                                │               │
//! │  COMMIT                                         ROLLBACK everything    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock checks read the stock as the transaction sees it, so the same
//! product listed twice is checked against what the earlier line left.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{SaleError, SaleResult};
use crate::repository::sale::{generate_sale_id, generate_sale_item_id};
use crate::store::{SaleStore, SaleTransaction};
use estoque_core::validation::validate_line_items;
use estoque_core::{CoreError, LineItemRequest, Sale, SaleLineItem, SaleSummary};

/// Creates a sale, or replaces `existing_sale_id` with a new one.
///
/// Replacing restores the old sale's stock and deletes it before the new
/// sale is built, all in one transaction; the replacement gets a new id. An
/// `existing_sale_id` that doesn't exist is ignored and the call behaves as
/// a plain create. An empty `line_items` is allowed and yields a sale with
/// no items.
///
/// ## Returns
/// * `Ok(id)` - ID of the newly created sale
/// * `Err(SaleError::Rejected)` - Unknown product, insufficient stock or
///   non-positive quantity; nothing changed
/// * `Err(SaleError::Store)` - Database failure; nothing changed
///
/// ## Example
/// ```rust,ignore
/// let items = vec![LineItemRequest::new(&pen.id, 2)];
/// let sale_id = upsert_sale(&db, None, &items).await?;
///
/// // Later: change the quantity
/// let items = vec![LineItemRequest::new(&pen.id, 3)];
/// let sale_id = upsert_sale(&db, Some(&sale_id), &items).await?;
/// ```
pub async fn upsert_sale<S>(
    store: &S,
    existing_sale_id: Option<&str>,
    line_items: &[LineItemRequest],
) -> SaleResult<String>
where
    S: SaleStore,
{
    if let Err((line, err)) = validate_line_items(line_items) {
        warn!(line, error = %err, "Sale rejected before opening transaction");
        return Err(SaleError::at_line(line, err));
    }

    let mut tx = store.begin().await?;

    match stage_upsert(&mut tx, existing_sale_id, line_items).await {
        Ok(sale_id) => {
            tx.commit().await?;
            info!(
                sale_id = %sale_id,
                replaced = ?existing_sale_id,
                items = line_items.len(),
                "Sale saved"
            );
            Ok(sale_id)
        }
        Err(err) => {
            abort(tx).await;
            warn!(
                replaced = ?existing_sale_id,
                line = ?err.line(),
                error = %err,
                "Sale upsert rolled back"
            );
            Err(err)
        }
    }
}

/// Deletes a sale and returns its stock.
///
/// ## Returns
/// * `Ok(summary)` - The sale as it was before deletion
/// * `Err(SaleError::Rejected)` - `SaleNotFound`
pub async fn delete_sale<S>(store: &S, sale_id: &str) -> SaleResult<SaleSummary>
where
    S: SaleStore,
{
    let mut tx = store.begin().await?;

    match stage_delete(&mut tx, sale_id).await {
        Ok(Some(summary)) => {
            tx.commit().await?;
            info!(sale_id = %sale_id, items = summary.items.len(), "Sale deleted");
            Ok(summary)
        }
        Ok(None) => {
            abort(tx).await;
            Err(SaleError::rejected(CoreError::SaleNotFound(sale_id.to_string())))
        }
        Err(err) => {
            abort(tx).await;
            warn!(sale_id = %sale_id, error = %err, "Sale delete rolled back");
            Err(err)
        }
    }
}

// =============================================================================
// Transaction steps
// =============================================================================

async fn stage_upsert<T>(
    tx: &mut T,
    existing_sale_id: Option<&str>,
    line_items: &[LineItemRequest],
) -> SaleResult<String>
where
    T: SaleTransaction,
{
    if let Some(id) = existing_sale_id {
        stage_delete(tx, id).await?;
    }

    let sale = Sale {
        id: generate_sale_id(),
        occurred_at: Utc::now(),
    };
    tx.insert_sale(&sale).await?;

    for (line, request) in line_items.iter().enumerate() {
        let product = tx
            .find_product(&request.product_id)
            .await?
            .ok_or_else(|| {
                SaleError::at_line(line, CoreError::ProductNotFound(request.product_id.clone()))
            })?;

        let insufficient = || {
            SaleError::at_line(
                line,
                CoreError::InsufficientStock {
                    product_id: product.id.clone(),
                    available: product.stock,
                    requested: request.quantity,
                },
            )
        };

        if !product.has_stock_for(request.quantity) {
            return Err(insufficient());
        }

        tx.insert_line_item(&SaleLineItem {
            id: generate_sale_item_id(),
            sale_id: sale.id.clone(),
            product_id: product.id.clone(),
            quantity: request.quantity,
            unit_price_cents: product.price_cents,
            position: line as i64,
        })
        .await?;

        if !tx.decrement_stock(&product.id, request.quantity).await? {
            return Err(insufficient());
        }
    }

    Ok(sale.id)
}

/// Restores the stock of a sale's items and deletes it.
///
/// Returns `None` if the sale doesn't exist.
async fn stage_delete<T>(tx: &mut T, sale_id: &str) -> SaleResult<Option<SaleSummary>>
where
    T: SaleTransaction,
{
    let Some(summary) = tx.find_sale_with_items(sale_id).await? else {
        return Ok(None);
    };

    for item in &summary.items {
        tx.increment_stock(&item.product_id, item.quantity).await?;
    }
    tx.delete_sale(sale_id).await?;

    Ok(Some(summary))
}

async fn abort<T: SaleTransaction>(tx: T) {
    if let Err(e) = tx.rollback().await {
        // The connection drops the transaction anyway; nothing was committed
        warn!(error = %e, "Rollback failed");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
