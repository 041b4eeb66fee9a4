//! # estoque-db: Database Layer for Estoque
//!
//! SQLite storage for products and sales, and the transactions that keep
//! the two consistent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Estoque Data Flow                                │
//! │                                                                         │
//! │  Action (estoque-app: upsert_sale, upsert_product)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    estoque-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────────┐ │   │
//! │  │   │   upsert.rs   │   │   store.rs    │   │  repository/     │ │   │
//! │  │   │               │   │               │   │                  │ │   │
//! │  │   │ upsert_sale   │──►│ SaleStore     │──►│ product.rs       │ │   │
//! │  │   │ delete_sale   │   │ SqliteSaleTx  │   │ sale.rs          │ │   │
//! │  │   └───────────────┘   └───────────────┘   └──────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   pool.rs (Database, DbConfig)      migrations.rs (embedded)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (estoque.db)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and sale error types
//! - [`repository`] - Product and sale repositories
//! - [`store`] - Transaction seam used by the sale operations
//! - [`upsert`] - Sale create/replace/delete
//!
//! ## Usage
//!
//! ```rust,ignore
//! use estoque_db::{upsert_sale, Database, DbConfig};
//! use estoque_core::LineItemRequest;
//!
//! let db = Database::new(DbConfig::new("path/to/estoque.db")).await?;
//!
//! let items = vec![LineItemRequest::new(&product_id, 2)];
//! let sale_id = upsert_sale(&db, None, &items).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;
pub mod upsert;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, SaleError, SaleResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig, DbLocation};
pub use store::{SaleStore, SaleTransaction, SqliteSaleTx};
pub use upsert::{delete_sale, upsert_sale};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
