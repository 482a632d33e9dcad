//! Checkout validation and pricing.
//!
//! The one cross-service workflow in the system: every line item of a
//! proposed order is checked against the live catalog, in submission
//! order, stopping at the first violation. Stock is only inspected,
//! never reserved, so a concurrent order can still oversell; the catalog
//! remains the source of truth for what is actually on hand.

use common::ProductId;
use thiserror::Error;

use crate::catalog::{CatalogClient, CatalogError};
use crate::model::LineItem;

/// Reasons a proposed order is rejected.
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    /// The catalog answered: no such product.
    #[error("Product {product_id} not found")]
    ProductNotFound { product_id: ProductId },

    /// More units requested than the catalog has on hand.
    #[error(
        "Insufficient stock for product {product_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// A line item asked for fewer than one unit.
    #[error("Invalid quantity {quantity} for product {product_id}: must be at least 1")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    /// The request carried no line items.
    #[error("Order must contain at least one item")]
    EmptyOrder,

    /// The catalog gave no answer. Not the same as `ProductNotFound`:
    /// nothing is known about the product either way.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

/// A validated, priced set of line items ready to become an order.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    /// The items exactly as submitted.
    pub items: Vec<LineItem>,
    /// Sum of unit price times quantity, rounded to cents once at the end.
    pub total_price: f64,
}

/// Validates and prices proposed orders against the catalog.
pub struct OrderValidator<C> {
    catalog: C,
}

impl<C: CatalogClient> OrderValidator<C> {
    /// Creates a validator backed by the given catalog client.
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Runs the checkout checks and prices the order.
    ///
    /// Items are processed strictly in submission order with one catalog
    /// fetch each; the first failing item aborts the whole order, so the
    /// reported violation is always the earliest one.
    #[tracing::instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn validate(&self, items: Vec<LineItem>) -> Result<PricedOrder, CheckoutError> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let checkout_start = std::time::Instant::now();

        let result = self.price_items(items).await;

        metrics::histogram!("checkout_duration_seconds")
            .record(checkout_start.elapsed().as_secs_f64());
        match &result {
            Ok(priced) => {
                tracing::info!(total_price = priced.total_price, "checkout validated");
            }
            Err(err) => {
                metrics::counter!("checkout_rejected_total").increment(1);
                tracing::warn!(error = %err, "checkout rejected");
            }
        }

        result
    }

    async fn price_items(&self, items: Vec<LineItem>) -> Result<PricedOrder, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyOrder);
        }

        let mut total = 0.0_f64;
        for item in &items {
            if item.quantity < 1 {
                return Err(CheckoutError::InvalidQuantity {
                    product_id: item.product_id,
                    quantity: item.quantity,
                });
            }

            let product = match self.catalog.fetch_product(item.product_id).await {
                Ok(product) => product,
                Err(CatalogError::NotFound(product_id)) => {
                    return Err(CheckoutError::ProductNotFound { product_id });
                }
                Err(CatalogError::Unavailable(reason)) => {
                    return Err(CheckoutError::CatalogUnavailable(reason));
                }
            };

            if product.stock < item.quantity {
                return Err(CheckoutError::InsufficientStock {
                    product_id: item.product_id,
                    available: product.stock,
                    requested: item.quantity,
                });
            }

            total += product.price * f64::from(item.quantity);
        }

        Ok(PricedOrder {
            items,
            total_price: round_to_cents(total),
        })
    }
}

/// Rounds half away from zero to two decimal places. Applied exactly once,
/// after the whole sum; individual line subtotals are never rounded.
fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
