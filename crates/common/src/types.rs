use serde::{Deserialize, Serialize};

/// Unique identifier for a product in the catalog.
///
/// Wraps the raw integer to provide type safety and prevent mixing up
/// product IDs with other numeric identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Creates a product ID from a raw integer.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for u64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// A product record as served by the catalog.
///
/// The catalog assigns the ID; price and stock are point-in-time values
/// that readers must treat as snapshots, not reservations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price; never negative.
    pub price: f64,
    /// Units currently on hand.
    pub stock: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_preserves_value() {
        let id = ProductId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(u64::from(id), 42);
    }

    #[test]
    fn product_id_display_is_bare_integer() {
        assert_eq!(ProductId::new(7).to_string(), "7");
    }

    #[test]
    fn product_id_serializes_transparently() {
        let id = ProductId::new(3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "3");

        let deserialized: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn product_serialization_roundtrip() {
        let product = Product {
            id: ProductId::new(1),
            name: "Laptop".to_string(),
            price: 999.99,
            stock: 50,
        };

        let json = serde_json::to_string(&product).unwrap();
        let deserialized: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, deserialized);
    }

    #[test]
    fn product_wire_shape_is_flat() {
        let product = Product {
            id: ProductId::new(2),
            name: "Mouse".to_string(),
            price: 29.99,
            stock: 200,
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], 2);
        assert_eq!(value["name"], "Mouse");
        assert_eq!(value["price"], 29.99);
        assert_eq!(value["stock"], 200);
    }
}
