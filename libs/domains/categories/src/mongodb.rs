//! MongoDB implementation of CategoryRepository

use async_trait::async_trait;
use chrono::Utc;
use crud::{documents_to_json, slugify};
use database::mongodb::is_duplicate_key;
use database::mongodb::serde_helpers::datetime_as_rfc3339;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use query_features::FindQuery;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{CATEGORY_COLLECTION, Category, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;

/// MongoDB implementation of the CategoryRepository
pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Category>(CATEGORY_COLLECTION);
        Self { collection }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> CategoryResult<()> {
        let indexes = vec![
            // Unique name index
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_name_unique".to_string())
                        .build(),
                )
                .build(),
            // Default listing order
            IndexModel::builder()
                .keys(doc! { "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Category indexes created successfully");
        Ok(())
    }

    /// `$set` body for an update; `slug` follows `name`
    fn update_document(input: &UpdateCategory) -> Document {
        let mut set = doc! { "updatedAt": datetime_as_rfc3339::format(&Utc::now()) };

        if let Some(ref name) = input.name {
            set.insert("name", name.as_str());
            set.insert("slug", slugify(name));
        }

        set
    }
}

fn by_id(id: Uuid) -> Document {
    doc! { "_id": id.to_string() }
}

fn duplicate_or(name: Option<&str>, err: mongodb::error::Error) -> CategoryError {
    match name {
        Some(name) if is_duplicate_key(&err) => CategoryError::DuplicateName(name.to_string()),
        _ => CategoryError::Database(err),
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self, input), fields(category_name = %input.name))]
    async fn create(&self, input: CreateCategory) -> CategoryResult<Category> {
        let category = Category::new(input);

        self.collection
            .insert_one(&category)
            .await
            .map_err(|e| duplicate_or(Some(category.name.as_str()), e))?;

        tracing::info!(category_id = %category.id, "Category created successfully");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>> {
        let category = self.collection.find_one(by_id(id)).await?;
        Ok(category)
    }

    #[instrument(skip(self, query))]
    async fn list(&self, query: FindQuery) -> CategoryResult<Vec<serde_json::Value>> {
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

    #[instrument(skip(self))]
    async fn count(&self) -> CategoryResult<u64> {
        let count = self.collection.estimated_document_count().await?;
        Ok(count)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Option<Category>> {
        let set = Self::update_document(&input);

        let updated = self
            .collection
            .find_one_and_update(by_id(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| duplicate_or(input.name.as_deref(), e))?;

        if updated.is_some() {
            tracing::info!(category_id = %id, "Category updated successfully");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CategoryResult<bool> {
        let result = self.collection.delete_one(by_id(id)).await?;

        if result.deleted_count == 0 {
            return Ok(false);
        }

        tracing::info!(category_id = %id, "Category deleted successfully");
        Ok(true)
    }
}
