//! # Actions
//!
//! Entry points called by the presentation layer. Each takes only the state
//! it needs and returns `Result<T, ApiError>` with camelCase DTOs.
//!
//! ## Available Actions
//!
//! | Module      | Actions                                                    |
//! |-------------|------------------------------------------------------------|
//! | [`product`] | `upsert_product`, `list_products`, `get_product`           |
//! | [`sale`]    | `upsert_sale`, `delete_sale`, `list_sales`, `get_sale`     |

pub mod product;
pub mod sale;
