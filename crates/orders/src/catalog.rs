//! Catalog client trait and implementations.
//!
//! The order service never caches product data; every checkout consults
//! the catalog for each line item so decisions are made against the
//! freshest price and stock available.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::{Product, ProductId};
use thiserror::Error;

/// Default per-call timeout for catalog calls.
const CATALOG_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from catalog lookups.
///
/// `NotFound` is an answer from the catalog (the product does not exist);
/// `Unavailable` means no answer could be obtained at all. Callers must
/// keep the two apart because they map to different HTTP statuses.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The catalog responded and knows no such product.
    #[error("Product {0} not found in catalog")]
    NotFound(ProductId),

    /// The catalog could not be reached, timed out, or returned garbage.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Trait for reading product data from the catalog.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches the current price and stock snapshot for one product.
    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError>;
}

/// Catalog client speaking HTTP to a running catalog service.
///
/// Each call carries a bounded timeout (5 seconds unless overridden) and
/// is never retried; a slow or dead catalog surfaces as `Unavailable`
/// within that bound instead of hanging the checkout.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpCatalogClient {
    /// Creates a client for the catalog at `base_url`
    /// (e.g. `"http://localhost:8000"`) with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, CATALOG_TIMEOUT)
    }

    /// Creates a client with a custom per-call timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let url = format!("{}/products/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id));
        }
        if !response.status().is_success() {
            return Err(CatalogError::Unavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Product>()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("invalid product body: {e}")))
    }
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    unreachable: HashSet<ProductId>,
    down: bool,
    fetches: u64,
}

/// In-memory catalog client for testing.
///
/// Serves a fixed set of products. The whole catalog, or individual
/// products, can be made unavailable to exercise failure paths, and the
/// number of fetches is counted so tests can assert fail-fast behavior.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalog {
    /// Creates an empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog serving the given products.
    pub fn with_products(products: Vec<Product>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    /// Adds or replaces a product.
    pub fn insert(&self, product: Product) {
        self.state
            .write()
            .unwrap()
            .products
            .insert(product.id, product);
    }

    /// Simulates a total catalog outage while set.
    pub fn set_down(&self, down: bool) {
        self.state.write().unwrap().down = down;
    }

    /// Makes fetches for one product fail as unavailable rather than
    /// missing.
    pub fn set_unreachable(&self, id: ProductId) {
        self.state.write().unwrap().unreachable.insert(id);
    }

    /// Returns how many fetches have been attempted.
    pub fn fetch_count(&self) -> u64 {
        self.state.read().unwrap().fetches
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let mut state = self.state.write().unwrap();
        state.fetches += 1;

        if state.down {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }
        if state.unreachable.contains(&id) {
            return Err(CatalogError::Unavailable(format!(
                "timed out fetching product {id}"
            )));
        }

        state
            .products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }
}
