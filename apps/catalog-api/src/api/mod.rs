//! API routes module
//!
//! Routes are nested under `/api/v1` by `axum_helpers::create_router`.

pub mod categories;
pub mod health;
pub mod products;
pub mod sub_categories;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/category", categories::router(state))
        .nest("/category/{id}/subCategory", sub_categories::nested_router(state))
        .nest("/subCategory", sub_categories::router(state))
        .nest("/product", products::router(state))
}

/// Initialize database indexes for every collection
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    categories::init_indexes(state).await?;
    sub_categories::init_indexes(state).await?;
    products::init_indexes(state).await
}
