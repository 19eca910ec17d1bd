use query_features::PaginationResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `{ "data": ... }` envelope for single-entity responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Page of documents produced by the query pipeline.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse {
    /// Number of documents in `data`
    pub results: usize,
    pub pagination_result: PaginationResult,
    pub data: Vec<serde_json::Value>,
}

impl PaginatedResponse {
    pub fn new(data: Vec<serde_json::Value>, pagination_result: PaginationResult) -> Self {
        Self {
            results: data.len(),
            pagination_result,
            data,
        }
    }
}
