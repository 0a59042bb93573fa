//! Domain validation errors.

use thiserror::Error;

/// Errors raised while constructing or validating domain entities.
///
/// These are `invalid_input` errors in the abstract error-kind taxonomy:
/// they are raised before storage is ever touched and surface synchronously
/// to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// `user_id` was not positive.
    #[error("invalid_user: user_id must be positive")]
    InvalidUser,

    /// An order was submitted with no items.
    #[error("invalid_items: order must contain at least one item")]
    InvalidItems,

    /// An item's `product_id` was not positive.
    #[error("invalid_product: product_id must be positive")]
    InvalidProduct,

    /// An item's `quantity` was less than 1.
    #[error("invalid_quantity: quantity must be at least 1")]
    InvalidQuantity,

    /// An item's `price` was negative.
    #[error("invalid_price: price must be non-negative")]
    InvalidPrice,

    /// A requested order id was not a positive integer.
    #[error("invalid_order_id: id must be positive")]
    InvalidOrderId,
}
