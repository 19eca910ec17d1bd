//! Products Domain
//!
//! Catalog products stored in the `products` collection. Every read joins
//! the product's `category` id against `categories` and returns
//! `{ "name": ... }` in its place, or `null` when the category is gone.
//!
//! Listing goes through [`query_features`]: price and quantity ranges,
//! keyword search over title and description, projection and sort.
//! Creating or retitling a product derives its unique `slug` from the
//! title.
//!
//! Requests flow `handlers` → [`ProductService`] → [`ProductRepository`],
//! with [`MongoProductRepository`] resolving category names in one batched read.
//!
//! ```rust,no_run
//! use axum::Router;
//! use domain_products::{MongoProductRepository, ProductService, handlers};
//!
//! # async fn example(db: mongodb::Database) -> domain_products::ProductResult<()> {
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let app: Router = Router::new().nest("/product", handlers::router(ProductService::new(repository)));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateProduct, PRODUCT_COLLECTION, PRODUCT_QUERY, PopulatedCategory, Product,
    ProductListResponse, UpdateProduct,
};
pub use self::mongodb::MongoProductRepository;
pub use repository::ProductRepository;
pub use service::ProductService;
