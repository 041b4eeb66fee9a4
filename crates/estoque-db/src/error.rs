//! # Storage and Sale Errors
//!
//! Error types for database operations and sale transactions.
//!
//! ## Error Flow
//! ```text
//! sqlx::Error ──kind()/code()──► DbError ─────────► SaleError::Store
//!                                                          │
//! CoreError (stock or reference rule) ──► SaleError::Rejected { line }
//!                                                          │
//!                                                          ▼
//!                                           ApiError (estoque-app)
//! ```

use std::borrow::Cow;

use estoque_core::CoreError;
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

/// Failures of the storage layer, classified so callers can tell a missing
/// row from a broken constraint from a lost write-lock race.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// UNIQUE or PRIMARY KEY constraint. `field` is `table.column`.
    #[error("Unique constraint on {field}")]
    UniqueViolation { field: String },

    /// A line item pointing at a missing product, or a product still
    /// referenced by a sale being deleted.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other statement failure, CHECK constraints included.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// BEGIN, COMMIT or a write could not get SQLite's lock in time
    /// (SQLITE_BUSY / SQLITE_LOCKED).
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No pool connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DbError::TransactionFailed(_) | DbError::PoolExhausted | DbError::ConnectionFailed(_)
        )
    }

    fn from_database(err: &dyn DatabaseError) -> Self {
        let message = err.message().to_string();

        match err.kind() {
            ErrorKind::UniqueViolation => DbError::UniqueViolation {
                field: message
                    .strip_prefix("UNIQUE constraint failed: ")
                    .unwrap_or(&message)
                    .to_string(),
            },
            ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
            _ if is_lock_contention(err.code()) => DbError::TransactionFailed(message),
            _ => DbError::QueryFailed(message),
        }
    }
}

// Extended result codes carry the primary code in the low byte.
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;

fn is_lock_contention(code: Option<Cow<'_, str>>) -> bool {
    code.and_then(|c| c.parse::<i64>().ok())
        .map(|c| matches!(c & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
        .unwrap_or(false)
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::from_database(db_err.as_ref()),
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Sale Error
// =============================================================================

/// Failure of a sale upsert or delete.
///
/// Either way the transaction was rolled back and nothing changed.
#[derive(Debug, Error)]
pub enum SaleError {
    /// A domain rule rejected the request.
    ///
    /// `line` is the zero-based index of the offending line item, or `None`
    /// when the failure is not tied to an item (e.g. deleting an unknown
    /// sale).
    #[error("{source}")]
    Rejected {
        line: Option<usize>,
        #[source]
        source: CoreError,
    },

    /// The store failed (connectivity, constraint, serialization conflict).
    #[error(transparent)]
    Store(#[from] DbError),
}

impl SaleError {
    /// Creates a rejection tied to a line item.
    pub fn at_line(line: usize, source: impl Into<CoreError>) -> Self {
        SaleError::Rejected {
            line: Some(line),
            source: source.into(),
        }
    }

    /// Creates a rejection not tied to any line item.
    pub fn rejected(source: impl Into<CoreError>) -> Self {
        SaleError::Rejected {
            line: None,
            source: source.into(),
        }
    }

    /// The domain error, if this is a rejection.
    pub fn core_error(&self) -> Option<&CoreError> {
        match self {
            SaleError::Rejected { source, .. } => Some(source),
            SaleError::Store(_) => None,
        }
    }

    /// The offending line item index, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            SaleError::Rejected { line, .. } => *line,
            SaleError::Store(_) => None,
        }
    }

    /// Domain rejections need different input; store failures may pass on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            SaleError::Rejected { .. } => false,
            SaleError::Store(e) => e.is_retryable(),
        }
    }
}

/// Result type for sale transactions.
pub type SaleResult<T> = Result<T, SaleError>;
