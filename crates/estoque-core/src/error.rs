//! # Domain Errors
//!
//! `ValidationError` (bad input, caught before any write) converts into
//! `CoreError` (a stock or reference rule broken mid-sale). The database
//! crate wraps both in `SaleError` with the offending line index, and the
//! app crate turns that into an `ApiError`.

use thiserror::Error;

/// Raised while a sale is being validated against current stock. Neither
/// variant is retryable: the caller has to change its input (or wait for a
/// restock) first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A line item references a product that does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds the product's current stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale form: 2 lines of product P (stock 10)
    ///      │
    ///      ▼
    /// line 0: qty 4 → ok, stock left 6
    /// line 1: qty 7 → InsufficientStock { available: 6, requested: 7 }
    ///      │
    ///      ▼
    /// whole sale rolled back, stock back to 10
    /// ```
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Deleting a sale id that does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

/// Rejected input. `field` uses the request's path, e.g.
/// `products[2].quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be in {min}..={max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Zero or negative.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    #[error("{field} is malformed: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
