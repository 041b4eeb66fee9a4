//! # Repository Module
//!
//! Database repository implementations for Estoque.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories and Transactions                        │
//! │                                                                         │
//! │  Action (estoque-app)                                                  │
//! │       │                                                                 │
//! │       ├── db.products().upsert(&input)    ← pool, one statement        │
//! │       ├── db.sales().list_summaries()     ← pool, read only            │
//! │       │                                                                 │
//! │       └── upsert_sale(&db, ...)           ← one transaction            │
//! │                │                                                        │
//! │                ▼                                                        │
//! │           SqliteSaleTx ── executor-generic fns in product.rs/sale.rs   │
//! │                │          run on `&mut *tx`                             │
//! │                ▼                                                        │
//! │           SQLite Database                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product form upsert, lookups, listing
//! - [`SaleRepository`](sale::SaleRepository) - Sale read models

pub mod product;
pub mod sale;
