//! MongoDB implementation of ProductRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use crud::{documents_to_json, slugify};
use database::mongodb::is_duplicate_key;
use database::mongodb::serde_helpers::datetime_as_rfc3339;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use query_features::FindQuery;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, PRODUCT_COLLECTION, Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Collection holding the categories products point at
pub const CATEGORY_COLLECTION: &str = "categories";

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<Product>,
    categories: Collection<Document>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Product>(PRODUCT_COLLECTION),
            categories: db.collection::<Document>(CATEGORY_COLLECTION),
        }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            // Unique slug index
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_slug_unique".to_string())
                        .build(),
                )
                .build(),
            // Category lookups and scoped listings
            IndexModel::builder()
                .keys(doc! { "category": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
            // Price range queries
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(IndexOptions::builder().name("idx_price".to_string()).build())
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
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// `$set` body for an update; `slug` follows `title`
    fn update_document(input: &UpdateProduct) -> Document {
        let mut set = doc! { "updatedAt": datetime_as_rfc3339::format(&Utc::now()) };

        if let Some(ref title) = input.title {
            set.insert("title", title.as_str());
            set.insert("slug", slugify(title));
        }
        if let Some(ref description) = input.description {
            set.insert("description", description.as_str());
        }
        if let Some(quantity) = input.quantity {
            set.insert("quantity", quantity);
        }
        if let Some(sold) = input.sold {
            set.insert("sold", sold);
        }
        if let Some(price) = input.price {
            set.insert("price", price);
        }
        if let Some(price_after_discount) = input.price_after_discount {
            set.insert("priceAfterDiscount", price_after_discount);
        }
        if let Some(ref colors) = input.colors {
            set.insert("colors", colors.clone());
        }
        if let Some(ref image_cover) = input.image_cover {
            set.insert("imageCover", image_cover.as_str());
        }
        if let Some(ref images) = input.images {
            set.insert("images", images.clone());
        }
        if let Some(category) = input.category {
            set.insert("category", category.to_string());
        }
        if let Some(ref sub_categories) = input.sub_categories {
            let ids: Vec<String> = sub_categories.iter().map(Uuid::to_string).collect();
            set.insert("subCategories", ids);
        }
        if let Some(brand) = input.brand {
            set.insert("brand", brand.to_string());
        }
        if let Some(ratings_average) = input.ratings_average {
            set.insert("ratingsAverage", ratings_average);
        }
        if let Some(ratings_quantity) = input.ratings_quantity {
            set.insert("ratingsQuantity", ratings_quantity);
        }

        set
    }

    /// Replace each document's `category` id with `{ name }`, or `null`
    /// when no such category exists.
    async fn populate_category(&self, documents: Vec<Document>) -> ProductResult<Vec<Document>> {
        let mut ids: Vec<String> = documents
            .iter()
            .filter_map(|document| document.get_str("category").ok())
            .map(str::to_string)
            .collect();
        ids.sort();
        ids.dedup();

        if ids.is_empty() {
            return Ok(documents);
        }

        let categories: Vec<Document> = self
            .categories
            .find(doc! { "_id": { "$in": ids } })
            .projection(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;

        let names: HashMap<String, String> = categories
            .iter()
            .filter_map(|category| {
                let id = category.get_str("_id").ok()?;
                let name = category.get_str("name").ok()?;
                Some((id.to_string(), name.to_string()))
            })
            .collect();

        Ok(documents
            .into_iter()
            .map(|mut document| {
                let populated = document.get_str("category").ok().map(|id| {
                    names
                        .get(id)
                        .map(|name| Bson::Document(doc! { "name": name.as_str() }))
                        .unwrap_or(Bson::Null)
                });
                if let Some(populated) = populated {
                    document.insert("category", populated);
                }
                document
            })
            .collect())
    }
}

fn by_id(id: Uuid) -> Document {
    doc! { "_id": id.to_string() }
}

fn duplicate_or(slug: Option<String>, err: mongodb::error::Error) -> ProductError {
    match slug {
        Some(slug) if is_duplicate_key(&err) => ProductError::DuplicateSlug(slug),
        _ => ProductError::Database(err),
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_title = %input.title))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);

        self.collection
            .insert_one(&product)
            .await
            .map_err(|e| duplicate_or(Some(product.slug.clone()), e))?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_populated(&self, id: Uuid) -> ProductResult<Option<serde_json::Value>> {
        let Some(document) = self
            .collection
            .clone_with_type::<Document>()
            .find_one(by_id(id))
            .await?
        else {
            return Ok(None);
        };

        let populated = self.populate_category(vec![document]).await?;
        Ok(documents_to_json(populated).into_iter().next())
    }

    #[instrument(skip(self, query))]
    async fn list_populated(&self, query: FindQuery) -> ProductResult<Vec<serde_json::Value>> {
        let options = query.options();
        let documents: Vec<Document> = self
            .collection
            .clone_with_type::<Document>()
            .find(query.filter)
            .with_options(options)
            .await?
            .try_collect()
            .await?;

        let populated = self.populate_category(documents).await?;
        Ok(documents_to_json(populated))
    }

    #[instrument(skip(self))]
    async fn count(&self) -> ProductResult<u64> {
        let count = self.collection.estimated_document_count().await?;
        Ok(count)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let set = Self::update_document(&input);
        let slug = input.title.as_deref().map(slugify);

        let updated = self
            .collection
            .find_one_and_update(by_id(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| duplicate_or(slug, e))?;

        if updated.is_some() {
            tracing::info!(product_id = %id, "Product updated successfully");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(by_id(id)).await?;

        if result.deleted_count == 0 {
            return Ok(false);
        }

        tracing::info!(product_id = %id, "Product deleted successfully");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_document_recomputes_slug_with_title() {
        let set = MongoProductRepository::update_document(&UpdateProduct {
            title: Some("USB-C Charger 65W".to_string()),
            price: Some(29.99),
            ..Default::default()
        });

        assert_eq!(set.get_str("slug").unwrap(), "usb-c-charger-65w");
        assert_eq!(set.get_f64("price").unwrap(), 29.99);
        assert!(!set.contains_key("description"));
    }

    #[test]
    fn test_update_document_without_title_keeps_slug() {
        let set = MongoProductRepository::update_document(&UpdateProduct {
            quantity: Some(3),
            ..Default::default()
        });

        assert!(!set.contains_key("slug"));
        assert_eq!(set.get_i64("quantity").unwrap(), 3);
        assert!(set.contains_key("updatedAt"));
    }

    #[test]
    fn test_update_document_stores_references_as_strings() {
        let category = Uuid::now_v7();
        let sub_category = Uuid::now_v7();
        let set = MongoProductRepository::update_document(&UpdateProduct {
            category: Some(category),
            sub_categories: Some(vec![sub_category]),
            ..Default::default()
        });

        assert_eq!(set.get_str("category").unwrap(), category.to_string());
        let subs = set.get_array("subCategories").unwrap();
        assert_eq!(subs[0].as_str().unwrap(), sub_category.to_string());
    }
}
