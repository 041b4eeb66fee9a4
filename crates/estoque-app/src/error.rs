//! # API Error Type
//!
//! Unified error type returned by the actions.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Estoque                                │
//! │                                                                         │
//! │  Presentation layer              Rust Backend                          │
//! │  ──────────────────              ────────────                          │
//! │                                                                         │
//! │  upsertSale({ products })                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Action: Result<T, ApiError>                                     │  │
//! │  │         │                                                        │  │
//! │  │  SaleError::Rejected{line: 1, ProductNotFound}                   │  │
//! │  │         └──► { code: NOT_FOUND,                                  │  │
//! │  │                message: "Produto não encontrado",                │  │
//! │  │                field: "products[1].id" }                         │  │
//! │  │                                                                  │  │
//! │  │  SaleError::Store(DbError::QueryFailed(..))                      │  │
//! │  │         └──► logged with error!, then                            │  │
//! │  │              { code: DATABASE_ERROR, message: generic }          │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use estoque_core::{CoreError, ValidationError};
use estoque_db::{DbError, SaleError};

/// Shown when a requested product doesn't exist.
pub const MSG_PRODUCT_NOT_FOUND: &str = "Produto não encontrado";

/// Shown when a requested quantity exceeds the product's stock.
pub const MSG_OUT_OF_STOCK: &str = "Produto fora de estoque";

pub const MSG_SALE_NOT_FOUND: &str = "Venda não encontrada";

const MSG_DATABASE: &str = "Erro ao acessar o banco de dados";

/// API error returned from actions.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Produto fora de estoque",
///   "field": "products[0].quantity"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Input the error refers to, e.g. `products[2].quantity`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Requested more units than in stock
    InsufficientStock,

    /// Database operation failed
    DatabaseError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Points the error at one input.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Replaces the message, keeping code and field.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    fn database() -> Self {
        ApiError::new(ErrorCode::DatabaseError, MSG_DATABASE)
    }
}

/// Converts database errors to API errors.
///
/// Details are logged here and never reach the presentation layer.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::not_found(format!("{} não encontrado: {}", entity, id))
            }
            DbError::UniqueViolation { field } => {
                ApiError::new(ErrorCode::ValidationError, "Registro já existe").with_field(field)
            }
            DbError::ForeignKeyViolation { message } => {
                error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Referência inválida")
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                ApiError::database()
            }
            DbError::QueryFailed(e) => {
                error!("Database query failed: {}", e);
                ApiError::database()
            }
            other => {
                error!("Database error: {}", other);
                ApiError::database()
            }
        }
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        ApiError::new(ErrorCode::ValidationError, err.to_string()).with_field(field)
    }
}

/// Converts sale transaction errors to API errors.
///
/// Rejections carry the fixed user-facing messages and point at the
/// offending line item.
impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::Rejected { line, source } => match source {
                CoreError::ProductNotFound(_) => {
                    let api = ApiError::not_found(MSG_PRODUCT_NOT_FOUND);
                    match line {
                        Some(i) => api.with_field(format!("products[{}].id", i)),
                        None => api,
                    }
                }
                CoreError::InsufficientStock { .. } => {
                    let api = ApiError::new(ErrorCode::InsufficientStock, MSG_OUT_OF_STOCK);
                    match line {
                        Some(i) => api.with_field(format!("products[{}].quantity", i)),
                        None => api,
                    }
                }
                CoreError::SaleNotFound(_) => ApiError::not_found(MSG_SALE_NOT_FOUND),
                CoreError::Validation(e) => ApiError::from(e),
            },
            SaleError::Store(e) => ApiError::from(e),
        }
    }
}
