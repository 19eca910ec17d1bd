//! HTTP handlers for Products API

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

use crate::error::ProductResult;
use crate::models::{CreateProduct, PopulatedCategory, Product, ProductListResponse, UpdateProduct};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, PopulatedCategory, ProductListResponse),
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
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products
///
/// Supports `page`, `limit`, `sort`, `fields`, `keyword` (title and
/// description) and field filters such as `price[gte]=10&price[lte]=50`.
/// Each product's `category` is populated as `{ name }`.
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "Page of products", body = ProductListResponse),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    RawQuery(params): RawQuery,
) -> ProductResult<Json<ProductListResponse>> {
    let products = service.list_products(&params).await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = DataResponse<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(product))))
}

/// Get a product by ID, with its category populated
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = DataResponse<Product>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<DataResponse<serde_json::Value>>> {
    let product = service.get_product(id).await?;
    Ok(Json(DataResponse::new(product)))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = DataResponse<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<DataResponse<Product>>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(DataResponse::new(product)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<StatusCode> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn app(mock_repo: MockProductRepository) -> Router {
        router(ProductService::new(mock_repo))
    }

    #[tokio::test]
    async fn test_get_returns_populated_category() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_populated().returning(|id| {
            Ok(Some(serde_json::json!({
                "_id": id.to_string(),
                "title": "Gaming Mouse",
                "category": { "name": "Electronics" }
            })))
        });

        let (status, body) = send(
            app(mock_repo),
            Request::get(format!("/{}", Uuid::now_v7()))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["category"]["name"], "Electronics");
    }

    #[tokio::test]
    async fn test_get_missing_product_is_404() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_populated().returning(|_| Ok(None));

        let id = Uuid::now_v7();
        let (status, body) = send(
            app(mock_repo),
            Request::get(format!("/{}", id)).body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], format!("Product ({}) is not found", id));
    }

    #[tokio::test]
    async fn test_create_rejects_short_description() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let payload = serde_json::json!({
            "title": "Gaming Mouse",
            "description": "short",
            "quantity": 5,
            "price": 19.99,
            "imageCover": "mouse.jpeg",
            "category": Uuid::now_v7(),
        });
        let (status, body) = send(
            app(mock_repo),
            Request::post("/")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["description"].is_array());
    }

    #[tokio::test]
    async fn test_create_returns_201_with_slug() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .returning(|input| Ok(Product::new(input)));

        let payload = serde_json::json!({
            "title": "Gaming Mouse X2",
            "description": "Ergonomic mouse with adjustable DPI settings",
            "quantity": 5,
            "price": 19.99,
            "imageCover": "mouse.jpeg",
            "category": Uuid::now_v7(),
        });
        let (status, body) = send(
            app(mock_repo),
            Request::post("/")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["slug"], "gaming-mouse-x2");
    }

    #[tokio::test]
    async fn test_list_rejects_unsupported_operator() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_count().never();
        mock_repo.expect_list_populated().never();

        let (status, body) = send(
            app(mock_repo),
            Request::get("/?price%5Bne%5D=10").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_QUERY");
    }

    #[tokio::test]
    async fn test_delete_twice_returns_404_second_time() {
        let mut mock_repo = MockProductRepository::new();
        let mut deleted = false;
        mock_repo.expect_delete().times(2).returning(move |_| {
            let existed = !deleted;
            deleted = true;
            Ok(existed)
        });
        let app = app(mock_repo);
        let uri = format!("/{}", Uuid::now_v7());

        let (status, _) = send(app.clone(), Request::delete(&uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(app, Request::delete(&uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
