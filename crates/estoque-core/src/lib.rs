//! # estoque-core: Pure Business Logic for Estoque
//!
//! This crate holds the domain model of the inventory and point-of-sale
//! module as plain types and pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Estoque Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (forms, lists)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ actions                                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                estoque-app (upsert_sale, upsert_product)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ estoque-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │  Product  │  │   Money   │  │   rules   │                  │   │
//! │  │   │   Sale    │  │  (cents)  │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  estoque-db (Database Layer)                    │   │
//! │  │        SQLite, migrations, repositories, sale transaction       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleLineItem, LineItemRequest)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use estoque_core::money::Money;
//!
//! let unit_price = Money::from_cents(1099); // R$ 10,99
//! let line_total = unit_price.multiply_quantity(3);
//!
//! assert_eq!(line_total.cents(), 3297);
//! assert_eq!(line_total.to_string(), "R$ 32,97");
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Highest accepted unit price: R$ 10.000.000,00.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Highest accepted stock level, and so the largest line quantity.
///
/// With `MAX_PRICE_CENTS` a single line total stays below 10^15 centavos.
pub const MAX_STOCK: i64 = 1_000_000;
