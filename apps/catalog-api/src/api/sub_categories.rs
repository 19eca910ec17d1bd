//! SubCategories API routes
//!
//! One repository backs both `/subCategory` and the listing nested under
//! `/category/{id}/subCategory`.

use std::sync::Arc;

use axum::Router;
use crud::MongoRepository;
use domain_sub_categories::{SubCategory, handlers};

use crate::state::AppState;

type SubCategoryRepository = MongoRepository<SubCategory>;

fn repository(state: &AppState) -> Arc<SubCategoryRepository> {
    Arc::new(SubCategoryRepository::new(&state.db))
}

/// Create `/subCategory` router
pub fn router(state: &AppState) -> Router {
    handlers::router(repository(state))
}

/// Create `/category/{id}/subCategory` router
pub fn nested_router(state: &AppState) -> Router {
    handlers::nested_router(repository(state))
}

/// Initialize sub-category indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    repository(state).init_indexes().await?;
    Ok(())
}
