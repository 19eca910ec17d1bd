use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use query_features::QueryError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CrudError {
    #[error("{entity} ({id}) is not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("{0} already exists")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Document serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CrudResult<T> = Result<T, CrudError>;

impl CrudError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        CrudError::NotFound { entity, id }
    }
}

impl From<CrudError> for AppError {
    fn from(err: CrudError) -> Self {
        match err {
            CrudError::NotFound { .. } => AppError::NotFound(err.to_string()),
            CrudError::Validation(msg) => AppError::BadRequest(msg),
            CrudError::Query(e) => AppError::InvalidQuery(e),
            CrudError::Duplicate(_) => AppError::Conflict(err.to_string()),
            // Keep the driver error so duplicate keys and outages map to 409/503
            CrudError::Database(e) => AppError::Mongo(e),
            CrudError::Serialization(e) => AppError::InternalServerError(e.to_string()),
            CrudError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        let err = CrudError::not_found("SubCategory", id);
        assert_eq!(
            err.to_string(),
            "SubCategory (00000000-0000-0000-0000-000000000000) is not found"
        );
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_query_error_is_bad_request() {
        let err: CrudError = QueryError::MixedProjection.into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let err = CrudError::Duplicate("SubCategory 'Phones'".into());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
