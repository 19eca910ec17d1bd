use thiserror::Error;

/// Errors raised while turning query-string parameters into a find query.
///
/// Page and limit problems are never reported here; they fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Unsupported operator '{op}' on field '{field}'")]
    UnknownOperator { field: String, op: String },

    #[error("Invalid value '{value}' for field '{field}': expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("Malformed filter key '{0}'")]
    MalformedKey(String),

    #[error("Projection cannot mix included and excluded fields")]
    MixedProjection,
}

pub type QueryResult<T> = Result<T, QueryError>;
