//! Category Service - Business logic layer

use std::sync::Arc;

use query_features::{QueryFeatures, QueryParams};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult};
use crate::models::{CATEGORY_QUERY, Category, CategoryListResponse, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;

/// Category service providing business logic operations
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of categories shaped by the query string
    #[instrument(skip(self, params))]
    pub async fn list_categories(&self, params: &QueryParams) -> CategoryResult<CategoryListResponse> {
        let features = QueryFeatures::new(params, &CATEGORY_QUERY)
            .filter()?
            .search()
            .limit_fields()?
            .sort()?;

        let total = self.repository.count().await?;
        let (query, pagination) = features.pagination(total).build();

        let data = self.repository.list(query).await?;
        Ok(CategoryListResponse {
            results: data.len(),
            page: pagination.current_page,
            data,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: Uuid) -> CategoryResult<Category> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    #[instrument(skip(self, input), fields(category_name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(&self, id: Uuid, input: UpdateCategory) -> CategoryResult<Category> {
        input
            .validate()
            .map_err(|e| CategoryError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> CategoryResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CategoryError::NotFound(id));
        }
        Ok(())
    }
}
