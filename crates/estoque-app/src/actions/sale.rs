//! # Sale Actions
//!
//! Create, replace, delete and list sales.
//!
//! ## Upsert Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale form submits                                                      │
//! │  { id?: "…", products: [{ id: "p-1", quantity: 2 }, …] }               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  upsert_sale ── estoque_db::upsert_sale (one transaction)              │
//! │       │                                                                 │
//! │       ├── Ok(sale_id) ──► publish products, sales ──► { saleId }       │
//! │       │                                                                 │
//! │       └── Err ──────────► ApiError (nothing published)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApiError, MSG_SALE_NOT_FOUND};
use crate::state::{DbState, ViewInvalidator, ViewTag};
use estoque_core::{LineItemRequest, Money, SaleLineItem, SaleSummary};

/// Views refreshed after every sale write.
const SALE_VIEWS: [ViewTag; 2] = [ViewTag::Products, ViewTag::Sales];

// =============================================================================
// DTOs
// =============================================================================

/// Sale form payload.
///
/// `id` present replaces that sale; absent creates a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSaleRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub products: Vec<SaleProductInput>,
}

/// One line of the sale form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleProductInput {
    /// Product ID
    pub id: String,
    pub quantity: i64,
}

impl From<&SaleProductInput> for LineItemRequest {
    fn from(input: &SaleProductInput) -> Self {
        LineItemRequest::new(&input.id, input.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSaleResponse {
    /// ID of the sale as stored now. Differs from the request's `id` when
    /// a sale was replaced.
    pub sale_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDto {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
}

impl From<SaleLineItem> for SaleItemDto {
    fn from(item: SaleLineItem) -> Self {
        SaleItemDto {
            total_cents: item.line_total().cents(),
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
        }
    }
}

/// A sale as shown in the sales list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub occurred_at: DateTime<Utc>,
    pub items: Vec<SaleItemDto>,
    pub total_quantity: i64,
    pub total_cents: i64,
    /// e.g. "R$ 1.234,56"
    pub total_formatted: String,
}

impl From<SaleSummary> for SaleDto {
    fn from(summary: SaleSummary) -> Self {
        SaleDto {
            total_formatted: Money::from_cents(summary.total_cents).to_string(),
            id: summary.id,
            occurred_at: summary.occurred_at,
            items: summary.items.into_iter().map(SaleItemDto::from).collect(),
            total_quantity: summary.total_quantity,
            total_cents: summary.total_cents,
        }
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Creates a sale, or replaces `request.id` with a new one.
///
/// ## Returns
/// * `Ok(UpsertSaleResponse)` - Sale committed, `products` and `sales`
///   invalidated
/// * `Err(ApiError)` - `"Produto não encontrado"` / `"Produto fora de estoque"`
///   with `field` pointing at the line, a validation error, or a generic
///   database error. Nothing was changed.
pub async fn upsert_sale(
    db: &DbState,
    views: &ViewInvalidator,
    request: UpsertSaleRequest,
) -> Result<UpsertSaleResponse, ApiError> {
    debug!(
        id = ?request.id,
        items = request.products.len(),
        "upsert_sale action"
    );

    let items: Vec<LineItemRequest> = request.products.iter().map(LineItemRequest::from).collect();
    let sale_id = estoque_db::upsert_sale(db.inner(), request.id.as_deref(), &items).await?;

    views.publish_all(&SALE_VIEWS);
    info!(sale_id = %sale_id, "upsert_sale complete");

    Ok(UpsertSaleResponse { sale_id })
}

/// Deletes a sale and puts its units back in stock.
pub async fn delete_sale(
    db: &DbState,
    views: &ViewInvalidator,
    id: String,
) -> Result<SaleDto, ApiError> {
    debug!(id = %id, "delete_sale action");

    let removed = estoque_db::delete_sale(db.inner(), &id).await?;

    views.publish_all(&SALE_VIEWS);
    Ok(SaleDto::from(removed))
}

/// Lists all sales, newest first.
pub async fn list_sales(db: &DbState) -> Result<Vec<SaleDto>, ApiError> {
    let summaries = db.inner().sales().list_summaries().await?;
    Ok(summaries.into_iter().map(SaleDto::from).collect())
}

/// Gets one sale with its items.
pub async fn get_sale(db: &DbState, id: String) -> Result<SaleDto, ApiError> {
    debug!(id = %id, "get_sale action");

    db.inner()
        .sales()
        .get_summary(&id)
        .await?
        .map(SaleDto::from)
        .ok_or_else(|| ApiError::not_found(MSG_SALE_NOT_FOUND))
}

// =============================================================================
// Unit Tests
// =============================================================================
