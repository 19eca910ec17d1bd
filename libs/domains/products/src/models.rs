use chrono::{DateTime, Utc};
use crud::slugify;
use database::mongodb::serde_helpers::{
    datetime_as_rfc3339, option_uuid_as_string, uuid_as_string, uuid_vec_as_string,
};
use query_features::{FieldKind, QuerySchema, SortDirection};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const PRODUCT_COLLECTION: &str = "products";

/// Filterable, searchable and sortable fields of a product listing
pub const PRODUCT_QUERY: QuerySchema = QuerySchema {
    fields: &[
        ("_id", FieldKind::Uuid),
        ("title", FieldKind::String),
        ("slug", FieldKind::String),
        ("quantity", FieldKind::Integer),
        ("sold", FieldKind::Integer),
        ("price", FieldKind::Float),
        ("priceAfterDiscount", FieldKind::Float),
        ("colors", FieldKind::String),
        ("category", FieldKind::Uuid),
        ("subCategories", FieldKind::Uuid),
        ("brand", FieldKind::Uuid),
        ("ratingsAverage", FieldKind::Float),
        ("ratingsQuantity", FieldKind::Integer),
        ("createdAt", FieldKind::DateTime),
        ("updatedAt", FieldKind::DateTime),
    ],
    search_fields: &["title", "description"],
    default_sort: &[("createdAt", SortDirection::Descending)],
};

/// Product entity - represents a product stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", with = "uuid_as_string")]
    pub id: Uuid,
    #[schema(example = "Wireless Noise Cancelling Headphones")]
    pub title: String,
    /// URL-safe form of the title
    #[schema(example = "wireless-noise-cancelling-headphones")]
    pub slug: String,
    pub description: String,
    /// Units in stock
    pub quantity: i64,
    /// Units sold
    #[serde(default)]
    pub sold: i64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_after_discount: Option<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    /// Cover image URL
    pub image_cover: String,
    /// Additional image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Owning category ID
    #[serde(with = "uuid_as_string")]
    pub category: Uuid,
    #[serde(default, with = "uuid_vec_as_string")]
    pub sub_categories: Vec<Uuid>,
    #[serde(
        default,
        with = "option_uuid_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub brand: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_average: Option<f64>,
    #[serde(default)]
    pub ratings_quantity: i64,
    #[serde(with = "datetime_as_rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "datetime_as_rfc3339")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product from CreateProduct DTO
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            slug: slugify(&input.title),
            title: input.title,
            description: input.description,
            quantity: input.quantity,
            sold: input.sold,
            price: input.price,
            price_after_discount: input.price_after_discount,
            colors: input.colors,
            image_cover: input.image_cover,
            images: input.images,
            category: input.category,
            sub_categories: input.sub_categories,
            brand: input.brand,
            ratings_average: input.ratings_average,
            ratings_quantity: input.ratings_quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 3, max = 100, message = "Product title must be 3-100 characters"))]
    pub title: String,
    #[validate(length(min = 20, message = "Product description must be at least 20 characters"))]
    pub description: String,
    #[validate(range(min = 0))]
    pub quantity: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub sold: i64,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    pub price_after_discount: Option<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[validate(length(min = 1, message = "Product image cover is required"))]
    pub image_cover: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: Uuid,
    #[serde(default)]
    pub sub_categories: Vec<Uuid>,
    pub brand: Option<Uuid>,
    #[validate(range(min = 1.0, max = 5.0))]
    pub ratings_average: Option<f64>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub ratings_quantity: i64,
}

/// DTO for updating an existing product; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 3, max = 100, message = "Product title must be 3-100 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 20, message = "Product description must be at least 20 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i64>,
    #[validate(range(min = 0))]
    pub sold: Option<i64>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub price_after_discount: Option<f64>,
    pub colors: Option<Vec<String>>,
    #[validate(length(min = 1, message = "Product image cover is required"))]
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<Uuid>,
    pub sub_categories: Option<Vec<Uuid>>,
    pub brand: Option<Uuid>,
    #[validate(range(min = 1.0, max = 5.0))]
    pub ratings_average: Option<f64>,
    #[validate(range(min = 0))]
    pub ratings_quantity: Option<i64>,
}

/// Category reference as it appears on a populated product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PopulatedCategory {
    #[schema(example = "Electronics")]
    pub name: String,
}

/// `GET /product` response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    /// Number of products in `data`
    pub results: usize,
    /// Page that was returned
    pub page: u64,
    /// Products with `category` replaced by `{ name }`, or `null` when the
    /// category no longer exists
    #[schema(value_type = Vec<Product>)]
    pub data: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input() -> CreateProduct {
        serde_json::from_value(serde_json::json!({
            "title": "Men's  Running Shoes",
            "description": "Lightweight running shoes with breathable mesh",
            "quantity": 10,
            "price": 59.5,
            "imageCover": "shoes-cover.jpeg",
            "category": Uuid::now_v7(),
        }))
        .unwrap()
    }

    #[test]
    fn test_new_product_derives_slug_and_defaults() {
        let product = Product::new(create_input());
        assert_eq!(product.slug, "men-s-running-shoes");
        assert_eq!(product.sold, 0);
        assert_eq!(product.ratings_quantity, 0);
        assert!(product.sub_categories.is_empty());
    }

    #[test]
    fn test_product_json_is_camel_case() {
        let product = Product::new(create_input());
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["_id"], product.id.to_string());
        assert_eq!(json["imageCover"], "shoes-cover.jpeg");
        assert_eq!(json["category"], product.category.to_string());
        assert!(json.get("priceAfterDiscount").is_none());
        assert!(json.get("brand").is_none());
    }

    #[test]
    fn test_create_validation() {
        assert!(create_input().validate().is_ok());

        let mut input = create_input();
        input.description = "too short".to_string();
        assert!(input.validate().is_err());

        let mut input = create_input();
        input.price = -1.0;
        assert!(input.validate().is_err());

        let mut input = create_input();
        input.ratings_average = Some(5.5);
        assert!(input.validate().is_err());
    }
}
