//! Construction of committed order records.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::checkout::PricedOrder;
use crate::model::{Order, OrderId};
use crate::status::OrderStatus;

/// Assembles order records from validated checkout output.
///
/// Owns the process-wide order ID counter. IDs are handed out strictly
/// increasing and never reused, including after deletions, so an ID seen
/// once always refers to the same order. No validation happens here; only
/// priced output from the validator reaches `build`.
pub struct OrderBuilder {
    next_id: AtomicU64,
}

impl OrderBuilder {
    /// Creates a builder whose first order receives `first_id`.
    pub fn starting_at(first_id: OrderId) -> Self {
        Self {
            next_id: AtomicU64::new(first_id.as_u64()),
        }
    }

    /// Builds the committed record: next ID, `pending` status, current time.
    pub fn build(&self, priced: PricedOrder, customer_email: String) -> Order {
        let id = OrderId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        Order {
            id,
            items: priced.items,
            customer_email,
            total_price: priced.total_price,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self::starting_at(OrderId::new(1))
    }
}
