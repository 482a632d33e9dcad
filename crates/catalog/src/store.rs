//! In-memory product store.

use std::sync::Arc;

use common::{Product, ProductId};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Product>,
    last_id: u64,
}

/// In-memory product collection shared across request handlers.
///
/// Products are kept in insertion order. IDs are assigned from a counter
/// living inside the same lock as the records, so two concurrent creates
/// can never receive the same ID. The counter only moves forward; deleting
/// a product does not free its ID for reuse.
#[derive(Clone, Default)]
pub struct ProductStore {
    state: Arc<RwLock<CatalogState>>,
}

impl ProductStore {
    /// Creates an empty store. The first product gets ID 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with `products`. The ID counter continues
    /// above the highest preloaded ID.
    pub fn with_products(products: Vec<Product>) -> Self {
        let last_id = products.iter().map(|p| p.id.as_u64()).max().unwrap_or(0);
        Self {
            state: Arc::new(RwLock::new(CatalogState { products, last_id })),
        }
    }

    /// Adds a product, assigning it the next ID.
    pub async fn create(&self, name: String, price: f64, stock: u32) -> Product {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let product = Product {
            id: ProductId::new(state.last_id),
            name,
            price,
            stock,
        };
        state.products.push(product.clone());
        product
    }

    /// Looks up a product by ID.
    pub async fn get(&self, id: ProductId) -> Option<Product> {
        let state = self.state.read().await;
        state.products.iter().find(|p| p.id == id).cloned()
    }

    /// Returns all products in insertion order.
    pub async fn list(&self) -> Vec<Product> {
        self.state.read().await.products.clone()
    }

    /// Replaces the name, price, and stock of a product, keeping its ID.
    /// Returns the updated record, or `None` if the ID is unknown.
    pub async fn update(
        &self,
        id: ProductId,
        name: String,
        price: f64,
        stock: u32,
    ) -> Option<Product> {
        let mut state = self.state.write().await;
        let product = state.products.iter_mut().find(|p| p.id == id)?;
        product.name = name;
        product.price = price;
        product.stock = stock;
        Some(product.clone())
    }

    /// Removes a product. Returns `false` if the ID is unknown. The ID is
    /// never handed out again afterwards.
    pub async fn delete(&self, id: ProductId) -> bool {
        let mut state = self.state.write().await;
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        state.products.len() < before
    }

    /// Returns the number of products currently stored.
    pub async fn count(&self) -> usize {
        self.state.read().await.products.len()
    }
}
