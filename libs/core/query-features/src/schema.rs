/// How a filterable field is stored, and therefore how query-string values
/// are coerced before they reach MongoDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Bool,
    /// UUID stored as its hyphenated string
    Uuid,
    /// Timestamp stored as an RFC 3339 string with millisecond precision
    DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Per-collection description of what the pipeline may touch.
///
/// ```
/// use query_features::{FieldKind, QuerySchema, SortDirection};
///
/// const BRANDS: QuerySchema = QuerySchema {
///     fields: &[("_id", FieldKind::Uuid), ("name", FieldKind::String)],
///     search_fields: &["name"],
///     default_sort: &[("createdAt", SortDirection::Descending)],
/// };
/// assert_eq!(BRANDS.kind_of("name"), Some(FieldKind::String));
/// assert_eq!(BRANDS.kind_of("price"), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QuerySchema {
    /// Fields accepted in filters, with their storage kind
    pub fields: &'static [(&'static str, FieldKind)],
    /// Fields matched by `keyword`
    pub search_fields: &'static [&'static str],
    /// Ordering used when `sort` is absent
    pub default_sort: &'static [(&'static str, SortDirection)],
}

impl QuerySchema {
    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, kind)| *kind)
    }
}
