use mongodb::IndexModel;
use mongodb::bson::{Document, to_document};
use query_features::QuerySchema;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;
use validator::Validate;

use crate::error::CrudResult;
use crate::slug::slugify;

/// A document type the generic repository and handler factory can serve.
///
/// Implementors describe where they live, how they are built from a create
/// payload, and which fields list queries may filter, search and sort on.
///
/// # Example
/// ```ignore
/// impl Entity for SubCategory {
///     const COLLECTION: &'static str = "subcategories";
///     const DISPLAY_NAME: &'static str = "SubCategory";
///     const SLUG_SOURCE: Option<&'static str> = Some("name");
///     const QUERY_SCHEMA: QuerySchema = SUB_CATEGORY_QUERY;
///
///     type Create = CreateSubCategory;
///     type Update = UpdateSubCategory;
///
///     fn id(&self) -> Uuid { self.id }
///     fn new(input: CreateSubCategory) -> Self { /* ... */ }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// MongoDB collection name
    const COLLECTION: &'static str;

    /// Name used in messages, e.g. `"SubCategory (<id>) is not found"`
    const DISPLAY_NAME: &'static str;

    /// Stored field the slug is derived from, if any
    const SLUG_SOURCE: Option<&'static str> = None;

    const QUERY_SCHEMA: QuerySchema;

    type Create: Validate + DeserializeOwned + Send + 'static;

    /// Partial update payload; absent fields must be skipped when serialized
    type Update: Validate + DeserializeOwned + Serialize + Send + 'static;

    fn id(&self) -> Uuid;

    /// Builds a fresh entity (new id, timestamps, derived fields).
    fn new(input: Self::Create) -> Self;

    /// Fields to `$set` for `input`.
    ///
    /// The default serializes the payload and recomputes `slug` when
    /// [`SLUG_SOURCE`](Self::SLUG_SOURCE) is part of it.
    fn prepare_update(input: &Self::Update) -> CrudResult<Document> {
        let mut set = to_document(input)?;

        if let Some(source) = Self::SLUG_SOURCE {
            if let Ok(value) = set.get_str(source) {
                let slug = slugify(value);
                set.insert("slug", slug);
            }
        }

        Ok(set)
    }

    /// Indexes created at startup.
    fn indexes() -> Vec<IndexModel> {
        Vec::new()
    }
}
