//! Generic CRUD building blocks for catalog entities.
//!
//! ```text
//! ┌──────────────────────────┐
//! │ handlers::{create_one,   │  ← axum handlers, generic over E and R
//! │   get_one, update_one,   │
//! │   delete_one, get_all}   │
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │  CrudRepository<E>       │  ← trait; MongoRepository<E> implements it
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │  Entity                  │  ← collection, DTOs, slug source, query schema
//! └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crud::{MongoRepository, router};
//!
//! let repository = Arc::new(MongoRepository::<SubCategory>::new(&db));
//! let routes = axum::Router::new().nest("/subCategory", router::<SubCategory, _>(repository));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod mongodb;
pub mod repository;
pub mod responses;
pub mod slug;

pub use entity::Entity;
pub use error::{CrudError, CrudResult};
pub use handlers::{create_one, delete_one, find_page, get_all, get_one, router, update_one};
pub use self::mongodb::{MongoRepository, documents_to_json};
pub use repository::CrudRepository;
pub use responses::{DataResponse, PaginatedResponse};
pub use slug::slugify;
