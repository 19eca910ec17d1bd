//! Raw query-string extractor for list endpoints.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use query_features::QueryParams;

/// Collects every `key=value` pair of the query string, keeping repeated
/// keys and bracketed operator keys such as `price[gte]` intact.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::RawQuery;
///
/// async fn list(RawQuery(params): RawQuery) -> String {
///     params.first("page").unwrap_or("1").to_string()
/// }
/// ```
pub struct RawQuery(pub QueryParams);

impl<S> FromRequestParts<S> for RawQuery
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(RawQuery(QueryParams::from_pairs(pairs)))
    }
}
