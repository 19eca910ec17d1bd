use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::params::QueryParams;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 1;

/// MongoDB reads `skip` and `limit` as signed 64-bit integers.
const MAX_WINDOW: u64 = i64::MAX as u64;

/// Page window requested by the client.
///
/// Missing, non-numeric or non-positive `page`/`limit` values fall back to
/// [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`], as do values whose window would not
/// fit in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn from_params(params: &QueryParams) -> Self {
        let limit = positive(params.first("limit"))
            .filter(|limit| *limit <= MAX_WINDOW)
            .unwrap_or(DEFAULT_LIMIT);
        let page = positive(params.first("page"))
            .filter(|page| {
                (page - 1)
                    .checked_mul(limit)
                    .is_some_and(|skip| skip <= MAX_WINDOW)
            })
            .unwrap_or(DEFAULT_PAGE);

        Self { page, limit }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Metadata for this window over `total` documents.
    pub fn result(&self, total: u64) -> PaginationResult {
        let has_more = self.page.saturating_mul(self.limit) < total;
        PaginationResult {
            current_page: self.page,
            limit: self.limit,
            number_of_pages: total.div_ceil(self.limit),
            next: has_more.then(|| self.page + 1),
            prev: (self.page > 1).then(|| self.page - 1),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
}

/// Pagination metadata returned alongside list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult {
    #[schema(example = 1)]
    pub current_page: u64,
    #[schema(example = 10)]
    pub limit: u64,
    #[schema(example = 3)]
    pub number_of_pages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 2)]
    pub next: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination(pairs: &[(&str, &str)]) -> Pagination {
        Pagination::from_params(&QueryParams::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_defaults_when_absent() {
        let p = pagination(&[]);
        assert_eq!(p, Pagination { page: 1, limit: 1 });
        assert_eq!(p.skip(), 0);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        assert_eq!(pagination(&[("page", "abc"), ("limit", "-3")]), Pagination::default());
        assert_eq!(pagination(&[("page", "0"), ("limit", "0")]), Pagination::default());
        assert_eq!(pagination(&[("page", "1.5"), ("limit", "")]), Pagination::default());
    }

    #[test]
    fn test_skip_is_page_minus_one_times_limit() {
        let p = pagination(&[("page", "3"), ("limit", "4")]);
        assert_eq!(p.skip(), 8);
    }

    #[test]
    fn test_window_beyond_i64_falls_back_to_defaults() {
        let p = pagination(&[("page", "9223372036854775809"), ("limit", "1")]);
        assert_eq!(p, Pagination { page: 1, limit: 1 });

        let p = pagination(&[("page", "3"), ("limit", "9223372036854775808")]);
        assert_eq!(p, Pagination { page: 3, limit: 1 });
        assert_eq!(p.skip(), 2);

        let p = pagination(&[("page", "4611686018427387904"), ("limit", "4")]);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn test_largest_representable_skip_is_kept() {
        let p = pagination(&[("page", "9223372036854775808"), ("limit", "1")]);
        assert_eq!(p.skip(), i64::MAX as u64);
    }

    #[test]
    fn test_result_first_middle_last() {
        let first = pagination(&[("page", "1"), ("limit", "2")]).result(5);
        assert_eq!(first.number_of_pages, 3);
        assert_eq!(first.next, Some(2));
        assert_eq!(first.prev, None);

        let middle = pagination(&[("page", "2"), ("limit", "2")]).result(5);
        assert_eq!(middle.next, Some(3));
        assert_eq!(middle.prev, Some(1));

        let last = pagination(&[("page", "3"), ("limit", "2")]).result(5);
        assert_eq!(last.next, None);
        assert_eq!(last.prev, Some(2));
    }

    #[test]
    fn test_exact_multiple_has_no_next_page() {
        let result = pagination(&[("page", "2"), ("limit", "2")]).result(4);
        assert_eq!(result.number_of_pages, 2);
        assert_eq!(result.next, None);
    }

    #[test]
    fn test_empty_collection() {
        let result = Pagination::default().result(0);
        assert_eq!(result.number_of_pages, 0);
        assert_eq!(result.next, None);
        assert_eq!(result.prev, None);
    }

    #[test]
    fn test_result_serializes_camel_case_without_absent_links() {
        let json = serde_json::to_value(pagination(&[("limit", "10")]).result(3)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "currentPage": 1, "limit": 10, "numberOfPages": 1 })
        );
    }
}
