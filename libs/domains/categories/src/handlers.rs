//! HTTP handlers for Categories API

use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use axum_helpers::{
    RawQuery, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestQueryResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use crud::DataResponse;
use utoipa::OpenApi;

use crate::error::CategoryResult;
use crate::models::{Category, CategoryListResponse, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

/// OpenAPI documentation for Categories API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        update_category,
        delete_category,
    ),
    components(
        schemas(Category, CreateCategory, UpdateCategory, CategoryListResponse),
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
        (name = "Categories", description = "Category management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the categories router with all HTTP endpoints
pub fn router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .with_state(shared_service)
}

/// List categories
///
/// Supports `page`, `limit`, `sort`, `fields`, `keyword` and field filters
/// such as `createdAt[gte]=2024-01-01`.
#[utoipa::path(
    get,
    path = "",
    tag = "Categories",
    responses(
        (status = 200, description = "Page of categories", body = CategoryListResponse),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    RawQuery(params): RawQuery,
) -> CategoryResult<Json<CategoryListResponse>> {
    let categories = service.list_categories(&params).await?;
    Ok(Json(categories))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "",
    tag = "Categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created successfully", body = DataResponse<Category>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CategoryResult<impl IntoResponse> {
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(category))))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = DataResponse<Category>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    UuidPath(id): UuidPath,
) -> CategoryResult<Json<DataResponse<Category>>> {
    let category = service.get_category(id).await?;
    Ok(Json(DataResponse::new(category)))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated successfully", body = DataResponse<Category>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CategoryResult<Json<DataResponse<Category>>> {
    let category = service.update_category(id, input).await?;
    Ok(Json(DataResponse::new(category)))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    UuidPath(id): UuidPath,
) -> CategoryResult<StatusCode> {
    service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCategoryRepository;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    fn app(mock_repo: MockCategoryRepository) -> Router {
        router(CategoryService::new(mock_repo))
    }

    #[tokio::test]
    async fn test_get_missing_category_writes_exactly_one_404() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_get_by_id().times(1).returning(|_| Ok(None));

        let id = Uuid::now_v7();
        let (status, bytes) = send(
            app(mock_repo),
            Request::get(format!("/{}", id)).body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        // A single JSON document, not a 404 body followed by a 200 body
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["msg"], format!("Category ({}) is not found", id));
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_category_are_404() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_update().returning(|_, _| Ok(None));
        mock_repo.expect_delete().returning(|_| Ok(false));
        let app = app(mock_repo);
        let uri = format!("/{}", Uuid::now_v7());

        let (status, _) = send(
            app.clone(),
            Request::put(&uri)
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"Garden"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, bytes) = send(app, Request::delete(&uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_returns_201_with_slug() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo
            .expect_create()
            .returning(|input| Ok(Category::new(input)));

        let (status, bytes) = send(
            app(mock_repo),
            Request::post("/")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"Smart Watches"}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["slug"], "smart-watches");
    }

    #[tokio::test]
    async fn test_delete_returns_204_without_body() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(true));

        let uri = format!("/{}", Uuid::now_v7());
        let (status, bytes) = send(app(mock_repo), Request::delete(&uri).body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_list_response_shape() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_count().returning(|| Ok(3));
        mock_repo.expect_list().returning(|_| {
            Ok(vec![
                serde_json::json!({ "name": "Books" }),
                serde_json::json!({ "name": "Games" }),
            ])
        });

        let (status, bytes) = send(
            app(mock_repo),
            Request::get("/?limit=2&fields=name").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["results"], 2);
        assert_eq!(body["page"], 1);
        assert_eq!(body["data"][1]["name"], "Games");
    }

    #[tokio::test]
    async fn test_list_with_mixed_projection_is_400() {
        let mut mock_repo = MockCategoryRepository::new();
        mock_repo.expect_count().never();
        mock_repo.expect_list().never();

        let (status, _) = send(
            app(mock_repo),
            Request::get("/?fields=name,-slug").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
