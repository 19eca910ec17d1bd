pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::mongodb::{is_decode_error, is_duplicate_key, is_unavailable};
use query_features::QueryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Body of every error response.
///
/// - `code`: integer code for logs and monitoring (e.g. 1004)
/// - `error`: machine-readable identifier (e.g. "NOT_FOUND")
/// - `msg`: human-readable message
/// - `details`: optional structured details (e.g. validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "msg": "Category (0190a5b8-...) is not found"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: i32,
    pub error: String,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            msg: msg.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type converted into exactly one HTTP response.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("BSON decoding error: {0}")]
    BsonDecode(#[from] mongodb::bson::de::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query string error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Status, error code, message and details for this error, logged at a
    /// level that matches its severity.
    fn parts(self) -> (StatusCode, ErrorCode, String, Option<serde_json::Value>) {
        match self {
            AppError::SerdeJson(e) => {
                tracing::error!(
                    error_code = ErrorCode::SerdeJsonError.code(),
                    "JSON serialization error: {:?}",
                    e
                );
                internal(ErrorCode::SerdeJsonError)
            }
            AppError::Mongo(e) => map_mongo_error(&e),
            AppError::BsonDecode(e) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseDecode.code(),
                    "Stored document could not be decoded: {:?}",
                    e
                );
                internal(ErrorCode::DatabaseDecode)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (e.status(), ErrorCode::JsonExtraction, e.body_text(), None)
            }
            AppError::QueryExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidQuery.code(),
                    "Query string extraction error: {:?}",
                    e
                );
                (e.status(), ErrorCode::InvalidQuery, e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(validation_details(&e)),
                )
            }
            AppError::InvalidQuery(e) => {
                tracing::info!(error_code = ErrorCode::InvalidQuery.code(), "Invalid query: {}", e);
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidQuery, e.to_string(), None)
            }
            AppError::UuidError(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidUuid.code(),
                    "UUID error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidUuid,
                    ErrorCode::InvalidUuid.default_message().to_string(),
                    None,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationError, msg, None)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg, None)
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorCode::Conflict, msg, None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, msg, None)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ServiceUnavailable, msg, None)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, msg, details) = self.parts();

        let body = ErrorResponse {
            details,
            ..ErrorResponse::new(code, msg)
        };

        (status, Json(body)).into_response()
    }
}

fn internal(code: ErrorCode) -> (StatusCode, ErrorCode, String, Option<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        code,
        code.default_message().to_string(),
        None,
    )
}

/// Maps driver errors: duplicate key → 409, no reachable server → 503,
/// everything else → 500.
fn map_mongo_error(
    error: &mongodb::error::Error,
) -> (StatusCode, ErrorCode, String, Option<serde_json::Value>) {
    if is_duplicate_key(error) {
        tracing::info!(
            error_code = ErrorCode::DatabaseDuplicateKey.code(),
            "Duplicate key: {}",
            error
        );
        return (
            StatusCode::CONFLICT,
            ErrorCode::DatabaseDuplicateKey,
            ErrorCode::DatabaseDuplicateKey.default_message().to_string(),
            None,
        );
    }

    if is_unavailable(error) {
        tracing::warn!(
            error_code = ErrorCode::DatabaseUnavailable.code(),
            "MongoDB server selection failed: {}",
            error
        );
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseUnavailable,
            ErrorCode::DatabaseUnavailable.default_message().to_string(),
            None,
        );
    }

    if is_decode_error(error) {
        tracing::error!(
            error_code = ErrorCode::DatabaseDecode.code(),
            "MongoDB decode error: {:?}",
            error
        );
        return internal(ErrorCode::DatabaseDecode);
    }

    tracing::error!(
        error_code = ErrorCode::DatabaseError.code(),
        "MongoDB error: {:?}",
        error
    );
    internal(ErrorCode::DatabaseError)
}

/// `{ field: [{ code, message, params }] }` for each failing field.
pub fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(messages))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(details)
}

/// Build an error response directly, e.g. from a fallback handler.
pub fn error_response(status: StatusCode, msg: impl Into<String>, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, msg))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(error: AppError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body_uses_msg() {
        let (status, body) = body_of(AppError::NotFound("Category (x) is not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, 1004);
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.msg, "Category (x) is not found");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_query_error_is_bad_request() {
        let err = QueryError::UnknownOperator {
            field: "price".into(),
            op: "ne".into(),
        };
        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "INVALID_QUERY");
        assert!(body.msg.contains("'ne'"));
    }

    #[tokio::test]
    async fn test_generic_mongo_error_is_internal() {
        let (status, body) = body_of(mongodb::error::Error::custom("boom").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "DATABASE_ERROR");
        assert!(!body.msg.contains("boom"));
    }

    #[tokio::test]
    async fn test_validation_error_has_details() {
        use validator::Validate;

        #[derive(Validate)]
        struct Input {
            #[validate(length(min = 3))]
            name: String,
        }

        let errors = Input { name: "ab".into() }.validate().unwrap_err();
        let (status, body) = body_of(errors.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "VALIDATION_ERROR");
        let details = body.details.unwrap();
        assert_eq!(details["name"][0]["code"], "length");
    }

    #[test]
    fn test_error_response_serialization_skips_empty_details() {
        let json = serde_json::to_value(ErrorResponse::new(ErrorCode::Conflict, "taken")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": 1008, "error": "CONFLICT", "msg": "taken" })
        );
    }
}
