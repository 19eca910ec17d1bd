use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use query_features::QueryError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category ({0}) is not found")]
    NotFound(Uuid),

    #[error("Category with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

/// Convert CategoryError to AppError for standardized error responses
impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => AppError::NotFound(err.to_string()),
            CategoryError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            CategoryError::Validation(msg) => AppError::BadRequest(msg),
            CategoryError::Query(e) => AppError::InvalidQuery(e),
            CategoryError::Database(e) => AppError::Mongo(e),
            CategoryError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
