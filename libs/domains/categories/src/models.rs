use chrono::{DateTime, Utc};
use crud::slugify;
use database::mongodb::serde_helpers::{datetime_as_rfc3339, uuid_as_string};
use query_features::{FieldKind, QuerySchema, SortDirection};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const CATEGORY_COLLECTION: &str = "categories";

/// Filterable, searchable and sortable fields of a category listing
pub const CATEGORY_QUERY: QuerySchema = QuerySchema {
    fields: &[
        ("_id", FieldKind::Uuid),
        ("name", FieldKind::String),
        ("slug", FieldKind::String),
        ("createdAt", FieldKind::DateTime),
        ("updatedAt", FieldKind::DateTime),
    ],
    search_fields: &["name"],
    default_sort: &[("createdAt", SortDirection::Descending)],
};

/// Category entity - represents a category stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", with = "uuid_as_string")]
    pub id: Uuid,
    /// Unique category name
    #[schema(example = "Electronics")]
    pub name: String,
    /// URL-safe form of the name
    #[schema(example = "electronics")]
    pub slug: String,
    #[serde(with = "datetime_as_rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "datetime_as_rfc3339")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            slug: slugify(&input.name),
            name: input.name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for creating a new category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 3, max = 32, message = "Category name must be 3-32 characters"))]
    #[schema(example = "Electronics")]
    pub name: String,
}

/// DTO for updating a category
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 32, message = "Category name must be 3-32 characters"))]
    pub name: Option<String>,
}

/// `GET /category` response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryListResponse {
    /// Number of categories in `data`
    pub results: usize,
    /// Page that was returned
    pub page: u64,
    #[schema(value_type = Vec<Category>)]
    pub data: Vec<serde_json::Value>,
}
