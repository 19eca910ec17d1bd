//! Query feature pipeline for list endpoints.
//!
//! Turns a request's raw query string into a MongoDB find query plus
//! pagination metadata:
//!
//! ```text
//! ?page=2&limit=5&price[gte]=10&keyword=phone&fields=title,price&sort=-price
//!        │
//!        ▼
//! QueryParams ──► QueryFeatures
//!                   .filter()?           field[op]     → { price: { $gte: 10.0 } }
//!                   .search()            keyword       → { $or: [ { title: /phone/i }, ... ] }
//!                   .limit_fields()?     fields        → projection
//!                   .sort()?             sort          → { price: -1, _id: -1 }
//!                   .pagination(total)   page / limit  → skip, limit, PaginationResult
//!                   .build()             → (FindQuery, PaginationResult)
//! ```
//!
//! Each collection describes its filterable fields in a [`QuerySchema`].
//! Comparison operators are limited to [`ComparisonOp`]; anything else is a
//! [`QueryError`].

pub mod error;
pub mod filter;
pub mod pagination;
pub mod params;
pub mod pipeline;
pub mod schema;

pub use error::{QueryError, QueryResult};
pub use filter::{ComparisonOp, FilterExpr};
pub use pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, Pagination, PaginationResult};
pub use params::{QueryParams, RESERVED_KEYS};
pub use pipeline::{FindQuery, QueryFeatures};
pub use schema::{FieldKind, QuerySchema, SortDirection};
