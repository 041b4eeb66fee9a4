//! # Domain Types
//!
//! Core domain types used throughout Estoque.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │      Sale       │   │   SaleLineItem      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  sale_id (owner)    │   │
//! │  │  name           │◄──┼─────────────────┼───│  product_id (ref)   │   │
//! │  │  price_cents    │   │  occurred_at    │   │  quantity (> 0)     │   │
//! │  │  stock (>= 0)   │   │                 │──►│  unit_price_cents   │   │
//! │  └─────────────────┘   └─────────────────┘   │  (frozen snapshot)  │   │
//! │                                               └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A Sale owns its line items; deleting it deletes them. A line item only
//! references its product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product kept in stock and available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price in centavos.
    pub price_cents: i64,

    /// Units currently in stock. Never negative.
    pub stock: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units can be taken from current stock.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }
}

/// Form data for creating or editing a product.
///
/// `id: None` creates a new product; `Some(id)` overwrites the name, price
/// and stock level of an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub id: Option<String>,
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale. Its line items live in [`SaleLineItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// One product entry within a sale.
///
/// Uses the snapshot pattern: `unit_price_cents` is copied from the product
/// when the item is created and never follows later price changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLineItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Units sold (> 0).
    pub quantity: i64,
    /// Unit price in centavos at the time of sale (frozen).
    pub unit_price_cents: i64,
    /// Zero-based index of this item in the request that created it.
    pub position: i64,
}

impl SaleLineItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Snapshot price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// A requested line item: which product, how many units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

impl LineItemRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        LineItemRequest {
            product_id: product_id.into(),
            quantity,
        }
    }
}

// =============================================================================
// Sale Summary
// =============================================================================

/// Read model of a sale for list and detail views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleSummary {
    pub id: String,
    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,
    pub items: Vec<SaleLineItem>,
    /// Sum of all line quantities.
    pub total_quantity: i64,
    /// Sum of all line totals, in centavos.
    pub total_cents: i64,
}

impl SaleSummary {
    /// Builds the summary, computing the totals from the items.
    pub fn new(sale: Sale, items: Vec<SaleLineItem>) -> Self {
        let total_quantity = items.iter().fold(0i64, |n, i| n.saturating_add(i.quantity));
        let total: Money = items.iter().map(SaleLineItem::line_total).sum();

        SaleSummary {
            id: sale.id,
            occurred_at: sale.occurred_at,
            items,
            total_quantity,
            total_cents: total.cents(),
        }
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Quantity sold of one product across all lines of this sale.
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .filter(|i| i.product_id == product_id)
            .fold(0i64, |n, i| n.saturating_add(i.quantity))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
