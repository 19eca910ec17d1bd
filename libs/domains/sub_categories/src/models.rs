use chrono::{DateTime, Utc};
use crud::{Entity, slugify};
use database::mongodb::serde_helpers::{datetime_as_rfc3339, option_uuid_as_string, uuid_as_string};
use mongodb::{IndexModel, bson::doc, options::IndexOptions};
use query_features::{FieldKind, QuerySchema, SortDirection};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const SUB_CATEGORY_COLLECTION: &str = "subcategories";

/// Filterable, searchable and sortable fields of a sub-category listing
pub const SUB_CATEGORY_QUERY: QuerySchema = QuerySchema {
    fields: &[
        ("_id", FieldKind::Uuid),
        ("name", FieldKind::String),
        ("slug", FieldKind::String),
        ("category", FieldKind::Uuid),
        ("createdAt", FieldKind::DateTime),
        ("updatedAt", FieldKind::DateTime),
    ],
    search_fields: &["name"],
    default_sort: &[("createdAt", SortDirection::Descending)],
};

/// SubCategory entity, always attached to a parent category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    #[serde(rename = "_id", with = "uuid_as_string")]
    pub id: Uuid,
    #[schema(example = "Smart Phones")]
    pub name: String,
    #[schema(example = "smart-phones")]
    pub slug: String,
    /// Parent category id
    #[serde(with = "uuid_as_string")]
    pub category: Uuid,
    #[serde(with = "datetime_as_rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "datetime_as_rfc3339")]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a sub-category
///
/// `category` may be omitted when the request is made under
/// `/category/{id}/subCategory`; the path id is used instead.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateSubCategory {
    #[validate(length(min = 2, max = 32, message = "SubCategory name must be 2-32 characters"))]
    #[schema(example = "Smart Phones")]
    pub name: String,
    #[validate(required(message = "SubCategory must belong to a category"))]
    #[serde(default, with = "option_uuid_as_string")]
    pub category: Option<Uuid>,
}

/// DTO for updating a sub-category
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateSubCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 32, message = "SubCategory name must be 2-32 characters"))]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "option_uuid_as_string"
    )]
    pub category: Option<Uuid>,
}

impl Entity for SubCategory {
    const COLLECTION: &'static str = SUB_CATEGORY_COLLECTION;
    const DISPLAY_NAME: &'static str = "SubCategory";
    const SLUG_SOURCE: Option<&'static str> = Some("name");
    const QUERY_SCHEMA: QuerySchema = SUB_CATEGORY_QUERY;

    type Create = CreateSubCategory;
    type Update = UpdateSubCategory;

    fn id(&self) -> Uuid {
        self.id
    }

    fn new(input: CreateSubCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            slug: slugify(&input.name),
            name: input.name,
            category: input.category.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn indexes() -> Vec<IndexModel> {
        vec![
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_name_unique".to_string())
                        .build(),
                )
                .build(),
            // Listings scoped to a parent category
            IndexModel::builder()
                .keys(doc! { "category": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(name: &str) -> CreateSubCategory {
        CreateSubCategory {
            name: name.to_string(),
            category: Some(Uuid::now_v7()),
        }
    }

    #[test]
    fn test_new_sub_category_derives_slug() {
        let input = create_input("Smart Phones");
        let parent = input.category;
        let sub_category = SubCategory::new(input);

        assert_eq!(sub_category.slug, "smart-phones");
        assert_eq!(Some(sub_category.category), parent);
        assert_eq!(sub_category.created_at, sub_category.updated_at);
    }

    #[test]
    fn test_category_is_required() {
        let input = CreateSubCategory {
            name: "Tablets".to_string(),
            category: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("category"));
    }

    #[test]
    fn test_name_length_validation() {
        assert!(create_input("X").validate().is_err());
        assert!(create_input("TV").validate().is_ok());
        assert!(create_input(&"x".repeat(33)).validate().is_err());
    }

    #[test]
    fn test_references_serialize_as_strings() {
        let sub_category = SubCategory::new(create_input("Laptops"));
        let json = serde_json::to_value(&sub_category).unwrap();

        assert_eq!(json["_id"], sub_category.id.to_string());
        assert_eq!(json["category"], sub_category.category.to_string());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_prepare_update_recomputes_slug() {
        let parent = Uuid::now_v7();
        let set = SubCategory::prepare_update(&UpdateSubCategory {
            name: Some("Gaming Laptops".to_string()),
            category: Some(parent),
        })
        .unwrap();

        assert_eq!(set.get_str("slug").unwrap(), "gaming-laptops");
        assert_eq!(set.get_str("category").unwrap(), parent.to_string());
    }

    #[test]
    fn test_prepare_update_skips_absent_fields() {
        let set = SubCategory::prepare_update(&UpdateSubCategory::default()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_create_payload_without_category_deserializes() {
        let input: CreateSubCategory = serde_json::from_str(r#"{"name":"Tablets"}"#).unwrap();
        assert!(input.category.is_none());
    }
}
