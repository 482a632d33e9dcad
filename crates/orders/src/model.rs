//! Order records and line items.

use chrono::{DateTime, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::status::OrderStatus;

/// Unique identifier for an order.
///
/// Wraps the raw integer to provide type safety and prevent mixing up
/// order IDs with product IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Creates an order ID from a raw integer.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<OrderId> for u64 {
    fn from(id: OrderId) -> Self {
        id.0
    }
}

/// A product reference with a requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl LineItem {
    /// Creates a line item for `quantity` units of a product.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A committed order record.
///
/// The total price is captured when the order is validated and never
/// recomputed, so later catalog price changes do not affect it. After
/// creation only the status may change; items, email, and total are
/// immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Line items exactly as submitted, in submission order.
    pub items: Vec<LineItem>,
    pub customer_email: String,
    /// Sum of unit price times quantity across items, rounded to cents.
    pub total_price: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
