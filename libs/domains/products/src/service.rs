//! Product Service - Business logic layer

use std::sync::Arc;

use query_features::{QueryFeatures, QueryParams};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, PRODUCT_QUERY, Product, ProductListResponse, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// The service layer handles validation, runs the query pipeline for
/// listings and turns missing documents into [`ProductError::NotFound`].
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of products shaped by the query string
    #[instrument(skip(self, params))]
    pub async fn list_products(&self, params: &QueryParams) -> ProductResult<ProductListResponse> {
        let features = QueryFeatures::new(params, &PRODUCT_QUERY)
            .filter()?
            .search()
            .limit_fields()?
            .sort()?;

        let total = self.repository.count().await?;
        let (query, pagination) = features.pagination(total).build();

        let data = self.repository.list_populated(query).await?;
        Ok(ProductListResponse {
            results: data.len(),
            page: pagination.current_page,
            data,
        })
    }

    /// Get a product by ID, category populated
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<serde_json::Value> {
        self.repository
            .get_populated(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, input), fields(product_title = %input.title))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }
}
