//! Orderflow Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains entities, value objects, and domain validation rules for the
//! order-processing core. Storage, broker, and HTTP concerns live in
//! other crates; this one only knows how to construct and validate an
//! order.

#![warn(clippy::all)]

mod error;
mod order;
mod payment;

pub use error::DomainError;
pub use order::{Order, OrderItem, OrderStatus};
pub use payment::{Money, PaymentStatus};

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }
}
