//! # Product Actions
//!
//! The product form (create / edit) and product lookups.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{DbState, ViewInvalidator, ViewTag};
use estoque_core::validation::validate_product_input;
use estoque_core::{Product, ProductInput};

pub const MSG_PRODUCT_CREATED: &str = "Produto criado com sucesso!";
pub const MSG_PRODUCT_UPDATED: &str = "Produto atualizado com sucesso!";
pub const MSG_CREATE_FAILED: &str = "Erro ao criar produto";
pub const MSG_UPDATE_FAILED: &str = "Erro ao atualizar produto";

/// Product DTO for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    /// e.g. "R$ 12,90"
    pub price_formatted: String,
    pub stock: i64,
    pub in_stock: bool,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            price_formatted: p.price().to_string(),
            in_stock: p.stock > 0,
            id: p.id,
            name: p.name,
            price_cents: p.price_cents,
            stock: p.stock,
        }
    }
}

/// Product form payload. `id` present edits that product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProductRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
}

impl From<UpsertProductRequest> for ProductInput {
    fn from(request: UpsertProductRequest) -> Self {
        ProductInput {
            id: request.id,
            name: request.name,
            price_cents: request.price_cents,
            stock: request.stock,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProductResponse {
    pub product: ProductDto,
    /// Toast shown to the user.
    pub message: String,
}

/// Creates or edits a product.
///
/// Field validation errors keep their own message and `field`. Any other
/// failure carries `"Erro ao criar produto"` / `"Erro ao atualizar produto"`.
/// Publishes a `products` invalidation on success.
pub async fn upsert_product(
    db: &DbState,
    views: &ViewInvalidator,
    request: UpsertProductRequest,
) -> Result<UpsertProductResponse, ApiError> {
    let input = ProductInput::from(request);
    let is_update = input.id.is_some();

    debug!(id = ?input.id, name = %input.name, "upsert_product action");

    validate_product_input(&input)?;

    let product = db.inner().products().upsert(&input).await.map_err(|e| {
        warn!(id = ?input.id, error = %e, "upsert_product failed");
        let failed = if is_update {
            MSG_UPDATE_FAILED
        } else {
            MSG_CREATE_FAILED
        };
        ApiError::from(e).with_message(failed)
    })?;

    views.publish(ViewTag::Products);
    info!(id = %product.id, updated = is_update, "upsert_product complete");

    Ok(UpsertProductResponse {
        product: ProductDto::from(product),
        message: if is_update {
            MSG_PRODUCT_UPDATED
        } else {
            MSG_PRODUCT_CREATED
        }
        .to_string(),
    })
}

/// Lists all products ordered by name.
pub async fn list_products(db: &DbState) -> Result<Vec<ProductDto>, ApiError> {
    let products = db.inner().products().list().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Gets a single product by its UUID.
pub async fn get_product(db: &DbState, id: String) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "get_product action");

    db.inner()
        .products()
        .get_by_id(&id)
        .await?
        .map(ProductDto::from)
        .ok_or_else(|| ApiError::not_found(crate::error::MSG_PRODUCT_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use estoque_db::{Database, DbConfig};

    async fn setup() -> (DbState, ViewInvalidator) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (DbState::new(db), ViewInvalidator::default())
    }

    fn form(id: Option<String>, name: &str, price_cents: i64, stock: i64) -> UpsertProductRequest {
        UpsertProductRequest {
            id,
            name: name.to_string(),
            price_cents,
            stock,
        }
    }

    #[tokio::test]
    async fn test_create_then_update_messages() {
        let (db, views) = setup().await;
        let mut rx = views.subscribe();

        let created = upsert_product(&db, &views, form(None, "Caderno", 1590, 10))
            .await
            .unwrap();
        assert_eq!(created.message, MSG_PRODUCT_CREATED);
        assert_eq!(created.product.price_formatted, "R$ 15,90");
        assert_eq!(rx.recv().await.unwrap(), ViewTag::Products);

        let updated = upsert_product(
            &db,
            &views,
            form(Some(created.product.id.clone()), "Caderno", 1790, 0),
        )
        .await
        .unwrap();
        assert_eq!(updated.message, MSG_PRODUCT_UPDATED);
        assert!(!updated.product.in_stock);
        assert_eq!(rx.recv().await.unwrap(), ViewTag::Products);

        let listed = list_products(&db).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].price_cents, 1790);
    }

    #[tokio::test]
    async fn test_validation_errors_keep_field() {
        let (db, views) = setup().await;

        let err = upsert_product(&db, &views, form(None, "   ", 100, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("name"));

        let err = upsert_product(&db, &views, form(None, "Lápis", 100, -1))
            .await
            .unwrap_err();
        assert_eq!(err.field.as_deref(), Some("stock"));

        let err = upsert_product(&db, &views, form(None, "Ouro", 4_000_000_000_000_000_000, 3))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("price"));
        assert!(list_products(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_of_unknown_product_fails() {
        let (db, views) = setup().await;
        let mut rx = views.subscribe();

        let err = upsert_product(
            &db,
            &views,
            form(Some("550e8400-e29b-41d4-a716-446655440000".to_string()), "Lápis", 100, 1),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, MSG_UPDATE_FAILED);
        assert!(rx.try_recv().is_err());

        let err = get_product(&db, "550e8400-e29b-41d4-a716-446655440000".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
