use async_trait::async_trait;
use query_features::FindQuery;
use uuid::Uuid;

use crate::error::CategoryResult;
use crate::models::{Category, CreateCategory, UpdateCategory};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category>;

    /// Get a category by ID
    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>>;

    /// One page of categories as JSON (the query may project fields away)
    async fn list(&self, query: FindQuery) -> CategoryResult<Vec<serde_json::Value>>;

    /// Total number of categories
    async fn count(&self) -> CategoryResult<u64>;

    /// Update a category, returning it after the update
    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Option<Category>>;

    /// Delete a category, returning whether it existed
    async fn delete(&self, id: Uuid) -> CategoryResult<bool>;
}
