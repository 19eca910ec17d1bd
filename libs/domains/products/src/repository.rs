use async_trait::async_trait;
use query_features::FindQuery;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, UpdateProduct};

/// Repository trait for Product persistence
///
/// Read operations return products with `category` populated as
/// `{ "name": ... }` (or `null` for a dangling reference), so they are
/// plain JSON rather than [`Product`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Get a product by ID with its category populated
    async fn get_populated(&self, id: Uuid) -> ProductResult<Option<serde_json::Value>>;

    /// One page of products with categories populated
    async fn list_populated(&self, query: FindQuery) -> ProductResult<Vec<serde_json::Value>>;

    /// Total number of products
    async fn count(&self) -> ProductResult<u64>;

    /// Update a product, returning it after the update
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Delete a product, returning whether it existed
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}
