//! Custom extractors for Axum handlers.
//!
//! Each one rejects with the standard [`ErrorResponse`](crate::errors::ErrorResponse) body.

pub mod query_params;
pub mod uuid_path;
pub mod validated_json;

pub use query_params::RawQuery;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
