use async_trait::async_trait;
use mongodb::bson::Document;
use query_features::FindQuery;
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::CrudResult;

/// Data access for any [`Entity`].
///
/// `find_many` returns JSON documents rather than entities because a field
/// projection may leave required fields out.
#[async_trait]
pub trait CrudRepository<E: Entity>: Send + Sync {
    /// Insert a new entity
    async fn create(&self, entity: E) -> CrudResult<E>;

    async fn find_by_id(&self, id: Uuid) -> CrudResult<Option<E>>;

    /// Apply `set` and return the entity after the update, `None` if absent
    async fn find_and_update(&self, id: Uuid, set: Document) -> CrudResult<Option<E>>;

    /// Remove and return the entity, `None` if absent
    async fn find_and_delete(&self, id: Uuid) -> CrudResult<Option<E>>;

    /// Total documents in the collection, ignoring any filter
    async fn count(&self) -> CrudResult<u64>;

    async fn find_many(&self, query: FindQuery) -> CrudResult<Vec<serde_json::Value>>;
}
