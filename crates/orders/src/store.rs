//! In-memory order store.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::{Order, OrderId};
use crate::status::OrderStatus;

/// In-memory order collection shared across request handlers.
///
/// Orders are kept in insertion order. IDs are assigned by the order
/// builder and never recur, so an insert cannot displace an existing
/// record. Contents last for the process lifetime only.
#[derive(Clone, Default)]
pub struct OrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl OrderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with `orders`.
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: Arc::new(RwLock::new(orders)),
        }
    }

    /// Appends a committed order.
    pub async fn insert(&self, order: Order) {
        self.orders.write().await.push(order);
    }

    /// Looks up an order by ID.
    pub async fn get(&self, id: OrderId) -> Option<Order> {
        self.orders.read().await.iter().find(|o| o.id == id).cloned()
    }

    /// Returns all orders in insertion order.
    pub async fn list(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    /// Sets an order's status. Any status is accepted from any current
    /// status. Returns the updated record, or `None` if the ID is unknown.
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Option<Order> {
        let mut orders = self.orders.write().await;
        let order = orders.iter_mut().find(|o| o.id == id)?;
        order.status = status;
        Some(order.clone())
    }

    /// Removes an order. Returns `false` if the ID is unknown. The ID is
    /// never assigned to another order afterwards.
    pub async fn delete(&self, id: OrderId) -> bool {
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        orders.len() < before
    }

    /// Returns the number of orders currently stored.
    pub async fn count(&self) -> usize {
        self.orders.read().await.len()
    }
}
