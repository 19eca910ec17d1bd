//! Chainable query builder over raw query-string parameters.

use mongodb::bson::{Bson, Document, doc};
use mongodb::options::FindOptions;

use crate::error::{QueryError, QueryResult};
use crate::filter::{parse_filters, to_document};
use crate::pagination::{Pagination, PaginationResult};
use crate::params::QueryParams;
use crate::schema::QuerySchema;

/// A fully configured read, ready to hand to `Collection::find`.
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub filter: Document,
    pub skip: u64,
    pub limit: i64,
    pub sort: Document,
    /// `None` returns whole documents
    pub projection: Option<Document>,
}

impl FindQuery {
    pub fn options(&self) -> FindOptions {
        FindOptions::builder()
            .skip(self.skip)
            .limit(self.limit)
            .sort(self.sort.clone())
            .projection(self.projection.clone())
            .build()
    }
}

/// Pagination, filtering, keyword search, projection and sorting applied to
/// one request's query string.
///
/// The fallible stages run before [`pagination`](Self::pagination), which
/// takes the caller's document count. The terminal [`build`](Self::build)
/// yields the query plus pagination metadata:
///
/// ```
/// use query_features::{FieldKind, QueryFeatures, QueryParams, QuerySchema, SortDirection};
///
/// const SCHEMA: QuerySchema = QuerySchema {
///     fields: &[("price", FieldKind::Float)],
///     search_fields: &["title"],
///     default_sort: &[("createdAt", SortDirection::Descending)],
/// };
///
/// let params = QueryParams::from_pairs([("price[gte]", "10"), ("limit", "5"), ("page", "2")]);
/// let (query, page) = QueryFeatures::new(&params, &SCHEMA)
///     .filter()?
///     .search()
///     .limit_fields()?
///     .sort()?
///     .pagination(12)
///     .build();
///
/// assert_eq!(query.skip, 5);
/// assert_eq!(page.next, Some(3));
/// # Ok::<(), query_features::QueryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QueryFeatures<'a> {
    params: &'a QueryParams,
    schema: &'a QuerySchema,
    base_filter: Document,
    filter: Document,
    pagination: Pagination,
    total: u64,
    projection: Option<Document>,
    sort: Option<Document>,
}

impl<'a> QueryFeatures<'a> {
    pub fn new(params: &'a QueryParams, schema: &'a QuerySchema) -> Self {
        Self {
            params,
            schema,
            base_filter: Document::new(),
            filter: Document::new(),
            pagination: Pagination::default(),
            total: 0,
            projection: None,
            sort: None,
        }
    }

    /// Conditions that always apply and cannot be overridden by the query
    /// string, e.g. scoping a listing to a parent resource.
    pub fn with_base_filter(mut self, base_filter: Document) -> Self {
        self.base_filter = base_filter;
        self
    }

    /// Read `page` and `limit`. `total` is the collection's document count.
    pub fn pagination(mut self, total: u64) -> Self {
        self.pagination = Pagination::from_params(self.params);
        self.total = total;
        self
    }

    /// Field conditions from every non-reserved key.
    pub fn filter(mut self) -> QueryResult<Self> {
        let exprs = parse_filters(self.params, self.schema)?;
        self.filter.extend(to_document(exprs));
        Ok(self)
    }

    /// Case-insensitive literal match of `keyword` against the search fields.
    pub fn search(mut self) -> Self {
        if let Some(condition) = self
            .params
            .first("keyword")
            .and_then(|keyword| keyword_condition(keyword, self.schema.search_fields))
        {
            self.filter.insert("$or", condition);
        }
        self
    }

    /// Projection from `fields`, e.g. `fields=name,slug` or `fields=-description`.
    pub fn limit_fields(mut self) -> QueryResult<Self> {
        if let Some(fields) = self.params.first("fields") {
            self.projection = projection(fields)?;
        }
        Ok(self)
    }

    /// Ordering from `sort`, e.g. `sort=-price,title`.
    pub fn sort(mut self) -> QueryResult<Self> {
        if let Some(raw) = self.params.first("sort") {
            self.sort = sort_document(raw)?;
        }
        Ok(self)
    }

    pub fn build(self) -> (FindQuery, PaginationResult) {
        let mut filter = self.filter;
        filter.extend(self.base_filter);

        let mut sort = self
            .sort
            .unwrap_or_else(|| default_sort(self.schema));
        add_tie_breaker(&mut sort);

        let query = FindQuery {
            filter,
            skip: self.pagination.skip(),
            limit: i64::try_from(self.pagination.limit).unwrap_or(i64::MAX),
            sort,
            projection: self.projection,
        };

        (query, self.pagination.result(self.total))
    }
}

fn keyword_condition(keyword: &str, fields: &[&str]) -> Option<Bson> {
    let keyword = keyword.trim();
    if keyword.is_empty() || fields.is_empty() {
        return None;
    }

    let pattern = regex::escape(keyword);
    let conditions = fields
        .iter()
        .map(|field| {
            let mut condition = Document::new();
            condition.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
            Bson::Document(condition)
        })
        .collect();

    Some(Bson::Array(conditions))
}

fn field_names(raw: &str) -> impl Iterator<Item = &str> {
    raw.split([',', ' ']).map(str::trim).filter(|s| !s.is_empty())
}

fn check_field_name(name: &str) -> QueryResult<()> {
    if name.starts_with('$') || name.is_empty() {
        return Err(QueryError::MalformedKey(name.to_string()));
    }
    Ok(())
}

fn projection(raw: &str) -> QueryResult<Option<Document>> {
    let mut projection = Document::new();
    let mut includes = false;
    let mut excludes = false;

    for token in field_names(raw) {
        let (name, value) = match token.strip_prefix('-') {
            Some(name) => (name, 0),
            None => (token, 1),
        };
        check_field_name(name)?;

        // `_id` may be excluded from an inclusion projection
        if name != "_id" {
            includes |= value == 1;
            excludes |= value == 0;
        }
        projection.insert(name, value);
    }

    if includes && excludes {
        return Err(QueryError::MixedProjection);
    }

    Ok((!projection.is_empty()).then_some(projection))
}

fn sort_document(raw: &str) -> QueryResult<Option<Document>> {
    let mut sort = Document::new();

    for token in field_names(raw) {
        let (name, direction) = match token.strip_prefix('-') {
            Some(name) => (name, -1),
            None => (token, 1),
        };
        check_field_name(name)?;
        sort.insert(name, direction);
    }

    Ok((!sort.is_empty()).then_some(sort))
}

fn default_sort(schema: &QuerySchema) -> Document {
    let mut sort = Document::new();
    for (field, direction) in schema.default_sort {
        sort.insert(*field, direction.as_i32());
    }
    sort
}

/// Append `_id` so documents with equal sort keys keep a stable order
/// across pages.
fn add_tie_breaker(sort: &mut Document) {
    if sort.contains_key("_id") {
        return;
    }
    let direction = sort
        .iter()
        .next()
        .and_then(|(_, value)| value.as_i32())
        .unwrap_or(1);
    sort.insert("_id", direction);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, SortDirection};

    const SCHEMA: QuerySchema = QuerySchema {
        fields: &[
            ("_id", FieldKind::Uuid),
            ("name", FieldKind::String),
            ("price", FieldKind::Float),
            ("category", FieldKind::Uuid),
        ],
        search_fields: &["name", "description"],
        default_sort: &[("createdAt", SortDirection::Descending)],
    };

    fn run(pairs: &[(&str, &str)], total: u64) -> QueryResult<(FindQuery, PaginationResult)> {
        let params = QueryParams::from_pairs(pairs.iter().copied());
        Ok(QueryFeatures::new(&params, &SCHEMA)
            .filter()?
            .search()
            .limit_fields()?
            .sort()?
            .pagination(total)
            .build())
    }

    #[test]
    fn test_empty_query_uses_defaults() {
        let (query, page) = run(&[], 3).unwrap();
        assert_eq!(query.filter, Document::new());
        assert_eq!(query.skip, 0);
        assert_eq!(query.limit, 1);
        assert_eq!(query.sort, doc! { "createdAt": -1, "_id": -1 });
        assert_eq!(query.projection, None);
        assert_eq!(page.number_of_pages, 3);
        assert_eq!(page.next, Some(2));
    }

    #[test]
    fn test_reserved_keys_never_become_filters() {
        let (query, _) = run(
            &[("page", "2"), ("limit", "10"), ("sort", "name"), ("fields", "name")],
            0,
        )
        .unwrap();
        assert!(query.filter.is_empty());
    }

    #[test]
    fn test_filter_and_search_combine() {
        let (query, _) = run(&[("price[lt]", "100"), ("keyword", "cable (2m)")], 0).unwrap();
        assert_eq!(
            query.filter,
            doc! {
                "price": { "$lt": 100.0 },
                "$or": [
                    { "name": { "$regex": r"cable \(2m\)", "$options": "i" } },
                    { "description": { "$regex": r"cable \(2m\)", "$options": "i" } },
                ],
            }
        );
    }

    #[test]
    fn test_blank_keyword_is_ignored() {
        let (query, _) = run(&[("keyword", "   ")], 0).unwrap();
        assert!(!query.filter.contains_key("$or"));
    }

    #[test]
    fn test_unknown_operator_fails_the_query() {
        let err = run(&[("price[ne]", "5")], 0).unwrap_err();
        assert!(matches!(err, QueryError::UnknownOperator { .. }));
    }

    #[test]
    fn test_fields_projection() {
        let (query, _) = run(&[("fields", "name")], 0).unwrap();
        assert_eq!(query.projection, Some(doc! { "name": 1 }));

        let (query, _) = run(&[("fields", "name,-_id")], 0).unwrap();
        assert_eq!(query.projection, Some(doc! { "name": 1, "_id": 0 }));

        let (query, _) = run(&[("fields", "-description -images")], 0).unwrap();
        assert_eq!(query.projection, Some(doc! { "description": 0, "images": 0 }));
    }

    #[test]
    fn test_mixed_projection_is_rejected() {
        assert_eq!(
            run(&[("fields", "name,-price")], 0).unwrap_err(),
            QueryError::MixedProjection
        );
    }

    #[test]
    fn test_operator_field_names_are_rejected() {
        assert!(run(&[("fields", "$where")], 0).is_err());
        assert!(run(&[("sort", "-$natural")], 0).is_err());
    }

    #[test]
    fn test_sort_accepts_comma_and_space() {
        let (query, _) = run(&[("sort", "-price,name")], 0).unwrap();
        assert_eq!(query.sort, doc! { "price": -1, "name": 1, "_id": -1 });

        let (query, _) = run(&[("sort", "name -createdAt")], 0).unwrap();
        assert_eq!(query.sort, doc! { "name": 1, "createdAt": -1, "_id": 1 });
    }

    #[test]
    fn test_explicit_id_sort_is_kept() {
        let (query, _) = run(&[("sort", "_id")], 0).unwrap();
        assert_eq!(query.sort, doc! { "_id": 1 });
    }

    #[test]
    fn test_base_filter_overrides_query_string() {
        let params = QueryParams::from_pairs([(
            "category",
            "0190a5b8-0000-7000-8000-000000000002",
        )]);
        let (query, _) = QueryFeatures::new(&params, &SCHEMA)
            .with_base_filter(doc! { "category": "0190a5b8-0000-7000-8000-000000000001" })
            .pagination(0)
            .filter()
            .unwrap()
            .build();
        assert_eq!(
            query.filter,
            doc! { "category": "0190a5b8-0000-7000-8000-000000000001" }
        );
    }

    #[test]
    fn test_total_pages_ignore_active_filters() {
        // numberOfPages is computed from the collection total, not the filtered count
        let (_, page) = run(&[("price[gte]", "10"), ("limit", "2")], 9).unwrap();
        assert_eq!(page.number_of_pages, 5);
    }

    #[test]
    fn test_find_options_carry_window() {
        let (query, _) = run(&[("page", "3"), ("limit", "4"), ("fields", "name")], 20).unwrap();
        let options = query.options();
        assert_eq!(options.skip, Some(8));
        assert_eq!(options.limit, Some(4));
        assert_eq!(options.projection, Some(doc! { "name": 1 }));
    }
}
