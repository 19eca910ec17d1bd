//! HTTP handlers for SubCategories API
//!
//! `/subCategory` is served entirely by the generic handler factory.
//! [`nested_router`] adds list and create under
//! `/category/{id}/subCategory`, scoped to that parent category.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    AppError, RawQuery, UuidPath,
    errors::responses::{
        BadRequestQueryResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use crud::{CrudRepository, DataResponse, Entity, PaginatedResponse};
use mongodb::bson::doc;
use tracing::instrument;
use utoipa::OpenApi;
use validator::Validate;

use crate::models::{CreateSubCategory, SubCategory, UpdateSubCategory};

/// OpenAPI documentation for the `/subCategory` routes
#[derive(OpenApi)]
#[openapi(
    paths(
        docs::list_sub_categories,
        docs::create_sub_category,
        docs::get_sub_category,
        docs::update_sub_category,
        docs::delete_sub_category,
    ),
    components(
        schemas(SubCategory, CreateSubCategory, UpdateSubCategory, PaginatedResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestQueryResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "SubCategories", description = "Sub-category management endpoints")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the `/category/{id}/subCategory` routes
#[derive(OpenApi)]
#[openapi(paths(list_in_category, create_in_category))]
pub struct NestedApiDoc;

/// `/subCategory` routes: list, create, get, update and delete
pub fn router<R>(repository: Arc<R>) -> Router
where
    R: CrudRepository<SubCategory> + 'static,
{
    crud::router::<SubCategory, R>(repository)
}

/// `/category/{id}/subCategory` routes: list and create within one category
pub fn nested_router<R>(repository: Arc<R>) -> Router
where
    R: CrudRepository<SubCategory> + 'static,
{
    Router::new()
        .route("/", get(list_in_category::<R>).post(create_in_category::<R>))
        .with_state(repository)
}

/// List the sub-categories of one category
///
/// Query filters cannot widen the listing beyond the path's category.
#[utoipa::path(
    get,
    path = "",
    tag = "SubCategories",
    params(
        ("id" = Uuid, Path, description = "Parent category ID")
    ),
    responses(
        (status = 200, description = "Page of sub-categories", body = PaginatedResponse),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(repository, params))]
async fn list_in_category<R>(
    State(repository): State<Arc<R>>,
    UuidPath(category_id): UuidPath,
    RawQuery(params): RawQuery,
) -> Result<Json<PaginatedResponse>, AppError>
where
    R: CrudRepository<SubCategory> + 'static,
{
    let page = crud::find_page::<SubCategory, R>(
        repository.as_ref(),
        &params,
        doc! { "category": category_id.to_string() },
    )
    .await?;

    Ok(Json(page))
}

/// Create a sub-category in a category
///
/// A body without `category` takes the path's category id.
#[utoipa::path(
    post,
    path = "",
    tag = "SubCategories",
    params(
        ("id" = Uuid, Path, description = "Parent category ID")
    ),
    request_body = CreateSubCategory,
    responses(
        (status = 201, description = "SubCategory created successfully", body = DataResponse<SubCategory>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(repository, payload))]
async fn create_in_category<R>(
    State(repository): State<Arc<R>>,
    UuidPath(category_id): UuidPath,
    payload: Result<Json<CreateSubCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<SubCategory>>), AppError>
where
    R: CrudRepository<SubCategory> + 'static,
{
    let Json(mut input) = payload?;
    input.category.get_or_insert(category_id);
    input.validate()?;

    let sub_category = repository.create(SubCategory::new(input)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(sub_category))))
}

/// Path descriptions for the factory routes, which have no handler of
/// their own in this crate.
#[allow(dead_code)]
mod docs {
    use super::*;

    /// List sub-categories
    ///
    /// Supports `page`, `limit`, `sort`, `fields`, `keyword` (name) and
    /// field filters such as `category=<id>`.
    #[utoipa::path(
        get,
        path = "",
        tag = "SubCategories",
        responses(
            (status = 200, description = "Page of sub-categories", body = PaginatedResponse),
            (status = 400, response = BadRequestQueryResponse),
            (status = 500, response = InternalServerErrorResponse)
        )
    )]
    pub fn list_sub_categories() {}

    /// Create a new sub-category
    #[utoipa::path(
        post,
        path = "",
        tag = "SubCategories",
        request_body = CreateSubCategory,
        responses(
            (status = 201, description = "SubCategory created successfully", body = DataResponse<SubCategory>),
            (status = 400, response = BadRequestValidationResponse),
            (status = 409, response = ConflictResponse),
            (status = 500, response = InternalServerErrorResponse)
        )
    )]
    pub fn create_sub_category() {}

    /// Get a sub-category by ID
    #[utoipa::path(
        get,
        path = "/{id}",
        tag = "SubCategories",
        params(
            ("id" = Uuid, Path, description = "SubCategory ID")
        ),
        responses(
            (status = 200, description = "SubCategory found", body = DataResponse<SubCategory>),
            (status = 400, response = BadRequestUuidResponse),
            (status = 404, response = NotFoundResponse),
            (status = 500, response = InternalServerErrorResponse)
        )
    )]
    pub fn get_sub_category() {}

    /// Update a sub-category
    #[utoipa::path(
        put,
        path = "/{id}",
        tag = "SubCategories",
        params(
            ("id" = Uuid, Path, description = "SubCategory ID")
        ),
        request_body = UpdateSubCategory,
        responses(
            (status = 200, description = "SubCategory updated successfully", body = DataResponse<SubCategory>),
            (status = 400, response = BadRequestValidationResponse),
            (status = 404, response = NotFoundResponse),
            (status = 409, response = ConflictResponse),
            (status = 500, response = InternalServerErrorResponse)
        )
    )]
    pub fn update_sub_category() {}

    /// Delete a sub-category
    #[utoipa::path(
        delete,
        path = "/{id}",
        tag = "SubCategories",
        params(
            ("id" = Uuid, Path, description = "SubCategory ID")
        ),
        responses(
            (status = 204, description = "SubCategory deleted successfully"),
            (status = 400, response = BadRequestUuidResponse),
            (status = 404, response = NotFoundResponse),
            (status = 500, response = InternalServerErrorResponse)
        )
    )]
    pub fn delete_sub_category() {}
}
