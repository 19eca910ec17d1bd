//! SubCategories Domain
//!
//! Sub-categories are served by the generic CRUD factory in [`crud`]:
//! the entity describes its collection, slug source, indexes and query
//! schema, and [`crud::MongoRepository`] does the rest.
//!
//! Besides `/subCategory`, [`handlers::nested_router`] exposes list and
//! create under `/category/{id}/subCategory`, scoped to that category.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use axum::Router;
//! use crud::MongoRepository;
//! use domain_sub_categories::{SubCategory, handlers};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = Arc::new(MongoRepository::<SubCategory>::new(&db));
//! repository.init_indexes().await?;
//!
//! let app: Router = Router::new()
//!     .nest("/subCategory", handlers::router(repository.clone()))
//!     .nest("/category/{id}/subCategory", handlers::nested_router(repository));
//! # Ok(())
//! # }
//! ```

pub mod handlers;
pub mod models;

pub use handlers::{ApiDoc, NestedApiDoc};
pub use models::{
    CreateSubCategory, SUB_CATEGORY_COLLECTION, SUB_CATEGORY_QUERY, SubCategory, UpdateSubCategory,
};
