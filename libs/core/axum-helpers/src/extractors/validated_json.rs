//! JSON extractor with validation through the `validator` crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body extractor that runs [`Validate::validate`] after deserializing.
///
/// Malformed JSON is rejected with `JSON_EXTRACTION`; failed validation with
/// 400 `VALIDATION_ERROR` and per-field details.
///
/// # Example
/// ```ignore
/// use axum::{Router, routing::post};
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateBrand {
///     #[validate(length(min = 2, max = 32))]
///     name: String,
/// }
///
/// async fn create_brand(ValidatedJson(payload): ValidatedJson<CreateBrand>) -> String {
///     payload.name
/// }
///
/// let app = Router::new().route("/brand", post(create_brand));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct CreateTag {
        #[validate(length(min = 3, max = 10))]
        name: String,
    }

    async fn create(ValidatedJson(payload): ValidatedJson<CreateTag>) -> String {
        payload.name
    }

    async fn post_json(body: &'static str) -> (StatusCode, serde_json::Value) {
        let response = Router::new()
            .route("/tags", post(create))
            .oneshot(
                Request::post("/tags")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, _) = post_json(r#"{"name":"summer"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_body_returns_details() {
        let (status, json) = post_json(r#"{"name":"ab"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["name"][0]["code"], "length");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (status, json) = post_json(r#"{"name":"#).await;
        assert!(status.is_client_error());
        assert_eq!(json["error"], "JSON_EXTRACTION");
    }
}
