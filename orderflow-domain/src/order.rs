//! Order aggregate and its line items.

use crate::error::DomainError;
use crate::payment::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an order.
///
/// Mirrors the enumeration carried over the RPC boundary. This core only
/// ever produces `New` orders; the remaining variants are modelled so the
/// wire contract round-trips, even though their transitions are driven by
/// collaborators (inventory, fulfilment) out of scope here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Unspecified,
    New,
    PaymentPending,
    Paid,
    InventoryPending,
    Completed,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unspecified => "UNSPECIFIED",
            OrderStatus::New => "NEW",
            OrderStatus::PaymentPending => "PAYMENT_PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::InventoryPending => "INVENTORY_PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Canceled => "CANCELED",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "NEW" => OrderStatus::New,
            "PAYMENT_PENDING" => OrderStatus::PaymentPending,
            "PAID" => OrderStatus::Paid,
            "INVENTORY_PENDING" => OrderStatus::InventoryPending,
            "COMPLETED" => OrderStatus::Completed,
            "CANCELED" => OrderStatus::Canceled,
            _ => OrderStatus::Unspecified,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single line item on an order.
///
/// # Invariants
/// - `product_id` is positive
/// - `quantity` is at least 1
/// - `price` is non-negative (enforced by `Money`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i32,
    pub price: Money,
}

impl OrderItem {
    /// Construct and validate an item in one step.
    pub fn new(product_id: i64, quantity: i32, price_minor_units: i64) -> Result<Self, DomainError> {
        if product_id <= 0 {
            return Err(DomainError::InvalidProduct);
        }
        if quantity < 1 {
            return Err(DomainError::InvalidQuantity);
        }
        let price = Money::new(price_minor_units)?;
        Ok(Self {
            product_id,
            quantity,
            price,
        })
    }

    /// `price * quantity` for this item, saturating on overflow.
    pub fn subtotal(&self) -> Money {
        self.price.saturating_mul_qty(self.quantity as i64)
    }
}

/// An order together with its items, as persisted by the order core.
///
/// Immutable once created in this core: mutation by inventory or
/// fulfilment collaborators is out of scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Validate an order-creation request before any storage is touched.
    ///
    /// Checks user_id and non-empty items; item-level checks are already
    /// enforced by `OrderItem::new` at construction time.
    pub fn validate_request(user_id: i64, items: &[OrderItem]) -> Result<(), DomainError> {
        if user_id <= 0 {
            return Err(DomainError::InvalidUser);
        }
        if items.is_empty() {
            return Err(DomainError::InvalidItems);
        }
        Ok(())
    }

    /// Validate a requested order id before touching storage.
    pub fn validate_id(id: i64) -> Result<(), DomainError> {
        if id <= 0 {
            return Err(DomainError::InvalidOrderId);
        }
        Ok(())
    }

    /// `Σ item.price * item.quantity` over the given items.
    pub fn total_amount(items: &[OrderItem]) -> Money {
        items
            .iter()
            .fold(Money::zero(), |acc, item| acc + item.subtotal())
    }

    /// Assemble a fully-persisted order from its rows.
    pub fn new(
        id: i64,
        user_id: i64,
        status: &str,
        items: Vec<OrderItem>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let total_amount = Self::total_amount(&items);
        Self {
            id,
            user_id,
            status: OrderStatus::parse(status),
            items,
            total_amount,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_user_id() {
        let items = vec![OrderItem::new(1, 1, 100).unwrap()];
        assert_eq!(Order::validate_request(0, &items), Err(DomainError::InvalidUser));
    }

    #[test]
    fn rejects_empty_items() {
        assert_eq!(Order::validate_request(1, &[]), Err(DomainError::InvalidItems));
    }

    #[test]
    fn rejects_bad_item_fields() {
        assert_eq!(OrderItem::new(0, 1, 100), Err(DomainError::InvalidProduct));
        assert_eq!(OrderItem::new(1, 0, 100), Err(DomainError::InvalidQuantity));
        assert_eq!(OrderItem::new(1, 1, -1), Err(DomainError::InvalidPrice));
    }

    #[test]
    fn total_amount_is_sum_of_subtotals() {
        let items = vec![
            OrderItem::new(10, 2, 100).unwrap(),
            OrderItem::new(20, 3, 50).unwrap(),
        ];
        assert_eq!(Order::total_amount(&items).as_minor_units(), 200 + 150);
    }

    #[test]
    fn rejects_non_positive_order_id() {
        assert_eq!(Order::validate_id(0), Err(DomainError::InvalidOrderId));
        assert_eq!(Order::validate_id(-5), Err(DomainError::InvalidOrderId));
        assert!(Order::validate_id(1).is_ok());
    }
}
