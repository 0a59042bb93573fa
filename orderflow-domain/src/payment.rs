//! Monetary value object and payment status.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A monetary amount transported as an opaque scalar of integer minor
/// units (cents, for instance). Never negative.
///
/// # Invariants
/// - Must be >= 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a new `Money` with validation.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPrice` if `minor_units` is negative.
    pub fn new(minor_units: i64) -> Result<Self, DomainError> {
        if minor_units < 0 {
            return Err(DomainError::InvalidPrice);
        }
        Ok(Self(minor_units))
    }

    /// Zero amount.
    pub fn zero() -> Self {
        Self(0)
    }

    /// The underlying integer minor-units value.
    pub fn as_minor_units(&self) -> i64 {
        self.0
    }

    /// Multiply by a non-negative quantity, saturating on overflow.
    ///
    /// Used to derive an item's subtotal from its unit price.
    pub fn saturating_mul_qty(&self, qty: i64) -> Self {
        Self(self.0.saturating_mul(qty))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal (or pending) settlement status of a payment.
///
/// Once not `Pending`, a payment's status never regresses (see
/// `PaymentStatus::is_terminal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Settlement has not yet been decided.
    Pending,
    /// Settlement decided in the order's favor.
    Succeeded,
    /// Settlement decided against the order.
    Failed,
}

impl PaymentStatus {
    /// A terminal status never transitions further in this core.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }

    /// Parse the status from its wire/column representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "succeeded" => Some(PaymentStatus::Succeeded),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    /// The wire/column representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
        }
    }

    /// The deterministic settlement-outcome stub: even order ids succeed,
    /// odd order ids fail.
    ///
    /// This is a documented placeholder for a real authorizer (see
    /// design notes); any deterministic pure function of the order id is
    /// compatible with the rest of the pipeline.
    pub fn decide(order_id: i64) -> Self {
        if order_id % 2 == 0 {
            PaymentStatus::Succeeded
        } else {
            PaymentStatus::Failed
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_rejects_negative() {
        assert_eq!(Money::new(-1), Err(DomainError::InvalidPrice));
    }

    #[test]
    fn money_add_saturates() {
        let a = Money::new(i64::MAX).unwrap();
        let b = Money::new(10).unwrap();
        assert_eq!((a + b).as_minor_units(), i64::MAX);
    }

    #[test]
    fn decide_is_deterministic_on_parity() {
        assert_eq!(PaymentStatus::decide(2), PaymentStatus::Succeeded);
        assert_eq!(PaymentStatus::decide(3), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::decide(2), PaymentStatus::decide(2));
    }

    #[test]
    fn terminal_status_never_pending() {
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Succeeded.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
    }
}
