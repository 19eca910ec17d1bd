//! Integration tests for Products domain
//!
//! These tests use real MongoDB via testcontainers to ensure:
//! - Range filters on numeric fields are evaluated by MongoDB
//! - Category population returns `{ name }` or `null` for dangling ids
//! - The unique slug index is enforced
//!
//! Run with `cargo test -p domain_products -- --ignored` (requires Docker).

use domain_products::*;
use ::mongodb::bson::{Document, doc};
use query_features::QueryParams;
use test_utils::{TestMongo, assertions::*};
use uuid::Uuid;

fn product(title: &str, price: f64, category: Uuid) -> CreateProduct {
    CreateProduct {
        title: title.to_string(),
        description: format!("{} with a long enough description", title),
        quantity: 10,
        sold: 0,
        price,
        price_after_discount: None,
        colors: vec!["black".to_string()],
        image_cover: "cover.jpeg".to_string(),
        images: vec![],
        category,
        sub_categories: vec![],
        brand: None,
        ratings_average: None,
        ratings_quantity: 0,
    }
}

async fn insert_category(mongo: &TestMongo, name: &str) -> Uuid {
    let id = Uuid::now_v7();
    mongo
        .database()
        .collection::<Document>("categories")
        .insert_one(doc! { "_id": id.to_string(), "name": name, "slug": crud::slugify(name) })
        .await
        .unwrap();
    id
}

async fn service(mongo: &TestMongo) -> ProductService<MongoProductRepository> {
    let repo = MongoProductRepository::new(&mongo.database());
    repo.init_indexes().await.unwrap();
    ProductService::new(repo)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_price_range_filter() {
    let mongo = TestMongo::new().await;
    let service = service(&mongo).await;
    let category = insert_category(&mongo, "Electronics").await;

    for (title, price) in [("Cheap Cable", 5.0), ("Mid Mouse", 25.0), ("Pricey Monitor", 300.0)] {
        service.create_product(product(title, price, category)).await.unwrap();
    }

    let page = service
        .list_products(&QueryParams::from_pairs([
            ("price[gte]", "10"),
            ("price[lte]", "50"),
            ("limit", "10"),
        ]))
        .await
        .unwrap();

    assert_eq!(page.results, 1);
    assert_eq!(page.data[0]["title"], "Mid Mouse");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_get_populates_category_name() {
    let mongo = TestMongo::new().await;
    let service = service(&mongo).await;
    let category = insert_category(&mongo, "Books").await;

    let created = service
        .create_product(product("Rust Handbook", 39.0, category))
        .await
        .unwrap();

    let fetched = service.get_product(created.id).await.unwrap();
    assert_eq!(fetched["category"], serde_json::json!({ "name": "Books" }));
    assert_eq!(fetched["_id"], created.id.to_string());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_dangling_category_populates_null() {
    let mongo = TestMongo::new().await;
    let service = service(&mongo).await;

    let created = service
        .create_product(product("Orphan Lamp", 12.0, Uuid::now_v7()))
        .await
        .unwrap();

    let fetched = service.get_product(created.id).await.unwrap();
    assert!(fetched["category"].is_null());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_slug_is_conflict() {
    let mongo = TestMongo::new().await;
    let service = service(&mongo).await;
    let category = insert_category(&mongo, "Garden").await;

    service
        .create_product(product("Garden Hose", 20.0, category))
        .await
        .unwrap();
    let err = service
        .create_product(product("garden hose", 22.0, category))
        .await
        .unwrap_err();

    assert!(matches!(err, ProductError::DuplicateSlug(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_renames_and_delete_removes() {
    let mongo = TestMongo::new().await;
    let service = service(&mongo).await;
    let category = insert_category(&mongo, "Kitchen").await;

    let created = service
        .create_product(product("Steel Pan", 45.0, category))
        .await
        .unwrap();

    let updated = service
        .update_product(
            created.id,
            UpdateProduct {
                title: Some("Cast Iron Pan".to_string()),
                price: Some(55.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_uuid_eq(updated.id, created.id, "updated product id");
    assert_eq!(updated.slug, "cast-iron-pan");
    assert_eq!(updated.price, 55.0);

    service.delete_product(created.id).await.unwrap();
    assert!(matches!(
        service.get_product(created.id).await,
        Err(ProductError::NotFound(_))
    ));
}
