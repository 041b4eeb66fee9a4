//! # Validation Module
//!
//! Input validation for product forms and sale requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation layer (form schema)                             │
//! │  ├── Basic format checks (empty, numeric)                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Action / transaction entry (Rust)                            │
//! │  └── THIS MODULE: shape rules (quantity > 0, price >= 0, ...)          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Sale transaction                                             │
//! │  └── Stock and reference rules against current data                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                          │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{LineItemRequest, ProductInput};
use crate::{MAX_PRICE_CENTS, MAX_PRODUCT_NAME_LEN, MAX_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
///
/// ```rust
/// use estoque_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Caneta azul").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a price in centavos. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    in_range("price", cents, 0, MAX_PRICE_CENTS)
}

/// Validates an absolute stock level. Zero is allowed.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    in_range("stock", stock, 0, MAX_STOCK)
}

fn in_range(field: &str, value: i64, min: i64, max: i64) -> ValidationResult<()> {
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }

    Ok(())
}

/// Validates a whole product form.
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    if let Some(id) = &input.id {
        validate_uuid("id", id)?;
    }
    validate_product_name(&input.name)?;
    validate_price_cents(input.price_cents)?;
    validate_stock(input.stock)?;
    Ok(())
}

// =============================================================================
// Sale Validators
// =============================================================================

/// Validates a line item quantity.
///
/// `field` names the offending input, e.g. `products[1].quantity`. No line
/// can ask for more than the largest stock a product may hold.
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    in_range(field, qty, 1, MAX_STOCK)
}

/// Validates the shape of every requested line item, in order.
///
/// Returns the index of the first failing item together with the error.
/// Product existence and stock are NOT checked here; they depend on current
/// data and are checked inside the sale transaction (an unknown or empty
/// product id surfaces there as `ProductNotFound`).
///
/// ```rust
/// use estoque_core::validation::validate_line_items;
/// use estoque_core::LineItemRequest;
///
/// let items = vec![
///     LineItemRequest::new("p-1", 2),
///     LineItemRequest::new("p-2", 0),
/// ];
/// let (index, err) = validate_line_items(&items).unwrap_err();
/// assert_eq!(index, 1);
/// assert_eq!(err.field(), "products[1].quantity");
/// ```
pub fn validate_line_items(items: &[LineItemRequest]) -> Result<(), (usize, ValidationError)> {
    for (index, item) in items.iter().enumerate() {
        validate_quantity(&format!("products[{}].quantity", index), item.quantity)
            .map_err(|e| (index, e))?;
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string.
///
/// ```rust
/// use estoque_core::validation::validate_uuid;
///
/// assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Caneta azul").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
        // Multi-byte names are measured in characters, not bytes
        assert!(validate_product_name(&"ã".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert_eq!(
            validate_price_cents(4_000_000_000_000_000_000),
            Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: MAX_PRICE_CENTS,
            })
        );

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(MAX_STOCK).is_ok());
        assert!(validate_stock(-3).is_err());
        assert!(validate_stock(MAX_STOCK + 1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("quantity", 1).is_ok());
        assert!(validate_quantity("quantity", 10_000).is_ok());

        assert!(validate_quantity("quantity", 0).is_err());
        assert!(validate_quantity("quantity", -1).is_err());

        assert!(validate_quantity("quantity", MAX_STOCK).is_ok());
        assert!(matches!(
            validate_quantity("quantity", i64::MAX),
            Err(ValidationError::OutOfRange { min: 1, max: MAX_STOCK, .. })
        ));
    }

    #[test]
    fn test_validate_line_items() {
        assert!(validate_line_items(&[]).is_ok());
        assert!(validate_line_items(&[LineItemRequest::new("p-1", 1)]).is_ok());

        let (index, err) =
            validate_line_items(&[LineItemRequest::new("p-1", 1), LineItemRequest::new("p-2", 0)])
                .unwrap_err();
        assert_eq!(index, 1);
        assert_eq!(err.field(), "products[1].quantity");

        let (index, err) = validate_line_items(&[LineItemRequest::new("p-1", -2)]).unwrap_err();
        assert_eq!(index, 0);
        assert!(matches!(err, ValidationError::MustBePositive { .. }));

        let (index, err) = validate_line_items(&[
            LineItemRequest::new("p-1", 1),
            LineItemRequest::new("p-2", MAX_STOCK + 1),
        ])
        .unwrap_err();
        assert_eq!(index, 1);
        assert_eq!(err.field(), "products[1].quantity");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_validate_product_input() {
        let mut input = ProductInput {
            id: None,
            name: "Caderno".to_string(),
            price_cents: 1590,
            stock: 10,
        };
        assert!(validate_product_input(&input).is_ok());

        input.id = Some("bogus".to_string());
        assert!(matches!(
            validate_product_input(&input),
            Err(ValidationError::InvalidFormat { .. })
        ));

        input.id = None;
        input.stock = -1;
        assert!(validate_product_input(&input).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "123").is_err());
    }
}
