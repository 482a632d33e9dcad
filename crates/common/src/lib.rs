//! Types shared between the catalog service and the order service.
//!
//! The catalog owns product data; the order service reads it over HTTP.
//! Both sides agree on the wire shape through this crate.

pub mod types;

pub use types::{Product, ProductId};
