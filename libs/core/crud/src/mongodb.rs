//! MongoDB implementation of CrudRepository

use async_trait::async_trait;
use chrono::Utc;
use database::mongodb::serde_helpers::datetime_as_rfc3339;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Bson, Document, doc},
    options::ReturnDocument,
};
use query_features::FindQuery;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::CrudResult;
use crate::repository::CrudRepository;

/// Generic repository over the collection named by [`Entity::COLLECTION`].
pub struct MongoRepository<E: Entity> {
    collection: Collection<E>,
}

impl<E: Entity> MongoRepository<E> {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<E>(E::COLLECTION),
        }
    }

    /// Create the indexes declared by [`Entity::indexes`]
    pub async fn init_indexes(&self) -> CrudResult<()> {
        let indexes = E::indexes();
        if indexes.is_empty() {
            return Ok(());
        }

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = E::COLLECTION, "Indexes created successfully");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<E> {
        &self.collection
    }
}

fn by_id(id: Uuid) -> Document {
    doc! { "_id": id.to_string() }
}

/// Relaxed extended JSON for raw documents, e.g. projected list results.
pub fn documents_to_json(documents: Vec<Document>) -> Vec<serde_json::Value> {
    documents
        .into_iter()
        .map(|document| Bson::Document(document).into_relaxed_extjson())
        .collect()
}

#[async_trait]
impl<E: Entity> CrudRepository<E> for MongoRepository<E> {
    #[instrument(skip(self, entity), fields(collection = E::COLLECTION))]
    async fn create(&self, entity: E) -> CrudResult<E> {
        self.collection.insert_one(&entity).await?;

        tracing::info!(id = %entity.id(), "{} created successfully", E::DISPLAY_NAME);
        Ok(entity)
    }

    #[instrument(skip(self), fields(collection = E::COLLECTION))]
    async fn find_by_id(&self, id: Uuid) -> CrudResult<Option<E>> {
        let entity = self.collection.find_one(by_id(id)).await?;
        Ok(entity)
    }

    #[instrument(skip(self, set), fields(collection = E::COLLECTION))]
    async fn find_and_update(&self, id: Uuid, mut set: Document) -> CrudResult<Option<E>> {
        set.insert("updatedAt", datetime_as_rfc3339::format(&Utc::now()));

        let updated = self
            .collection
            .find_one_and_update(by_id(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(%id, "{} updated successfully", E::DISPLAY_NAME);
        }
        Ok(updated)
    }

    #[instrument(skip(self), fields(collection = E::COLLECTION))]
    async fn find_and_delete(&self, id: Uuid) -> CrudResult<Option<E>> {
        let deleted = self.collection.find_one_and_delete(by_id(id)).await?;

        if deleted.is_some() {
            tracing::info!(%id, "{} deleted successfully", E::DISPLAY_NAME);
        }
        Ok(deleted)
    }

    #[instrument(skip(self), fields(collection = E::COLLECTION))]
    async fn count(&self) -> CrudResult<u64> {
        let count = self.collection.estimated_document_count().await?;
        Ok(count)
    }

    #[instrument(skip(self, query), fields(collection = E::COLLECTION))]
    async fn find_many(&self, query: FindQuery) -> CrudResult<Vec<serde_json::Value>> {
        let options = query.options();
        let cursor = self
            .collection
            .clone_with_type::<Document>()
            .find(query.filter)
            .with_options(options)
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        Ok(documents_to_json(documents))
    }
}
