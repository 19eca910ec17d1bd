//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all catalog resources
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "REST API for an e-commerce catalog: categories, sub-categories and products",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/v1/category", api = domain_categories::ApiDoc),
        (path = "/api/v1/category/{id}/subCategory", api = domain_sub_categories::NestedApiDoc),
        (path = "/api/v1/subCategory", api = domain_sub_categories::ApiDoc),
        (path = "/api/v1/product", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Categories", description = "Category management endpoints"),
        (name = "SubCategories", description = "Sub-category management endpoints"),
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;
