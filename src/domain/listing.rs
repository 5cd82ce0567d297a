//! Filtering, ordering and page windows shared by every list endpoint.
//!
//! Query parameters arrive as raw strings. Each recognised key goes through a
//! total coercion function: a value that cannot be coerced is treated as if the
//! key was never sent, so an absent or garbled filter never narrows the result.

use std::{cmp::Ordering, collections::HashMap, str::FromStr};

use serde::Serialize;

use crate::constants::MAX_PAGE_SIZE;

pub type RawQuery = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `asc` selects ascending order; anything else, including absence, is descending.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    /// Nulls sort lowest in both directions.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC NULLS FIRST",
            SortOrder::Desc => "DESC NULLS LAST",
        }
    }

    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// A field a record type can be ordered by.
pub trait SortField: Copy + Send + Sync + 'static {
    type Record;

    /// Resolves a wire field name (`createdAt`, `proficiency`, ...).
    fn parse(name: &str) -> Option<Self>;

    /// SQL expression used in `ORDER BY`. Only ever a fixed column name.
    fn column(&self) -> &'static str;

    fn compare(&self, a: &Self::Record, b: &Self::Record) -> Ordering;
}

/// A predicate over records built from the filter keys a caller supplied.
pub trait RecordFilter<T> {
    fn matches(&self, record: &T) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<S> {
    pub field: S,
    pub order: SortOrder,
}

impl<S: SortField> Sort<S> {
    pub fn new(field: S, order: SortOrder) -> Self {
        Sort { field, order }
    }

    pub fn desc(field: S) -> Self {
        Sort::new(field, SortOrder::Desc)
    }

    /// Unknown field names fall back to `default`.
    pub fn from_params(field: Option<&str>, order: Option<&str>, default: S) -> Self {
        let field = field
            .map(str::trim)
            .and_then(S::parse)
            .unwrap_or(default);

        Sort::new(field, SortOrder::from_param(order))
    }

    pub fn compare(&self, a: &S::Record, b: &S::Record) -> Ordering {
        self.order.apply(self.field.compare(a, b))
    }
}

/// A contiguous slice of an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl Window {
    pub fn first(limit: u32) -> Self {
        Window { offset: 0, limit: u64::from(limit) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// `page` is clamped to at least 1, `limit` to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        PageRequest {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn from_params(raw: &RawQuery, default_limit: u32) -> Self {
        PageRequest::new(
            coerce_u32(raw.get("page")),
            coerce_u32(raw.get("limit")),
            default_limit,
        )
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn window(&self) -> Window {
        Window { offset: self.offset(), limit: u64::from(self.limit) }
    }
}

/// Everything a paginated list call needs: constraint, ordering and page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F, S> {
    pub filter: F,
    pub sort: Sort<S>,
    pub page: PageRequest,
}

impl<F, S: SortField> ListQuery<F, S> {
    pub fn from_params(raw: &RawQuery, filter: F, default_sort: S, default_limit: u32) -> Self {
        ListQuery {
            filter,
            sort: Sort::from_params(
                raw.get("sort").map(String::as_str),
                raw.get("order").map(String::as_str),
                default_sort,
            ),
            page: PageRequest::from_params(raw, default_limit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let limit = request.limit.max(1);
        let pages = total.div_ceil(u64::from(limit));

        Pagination {
            page: request.page,
            limit,
            total,
            pages,
            has_next: u64::from(request.page) < pages,
            has_prev: request.page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Paginated { data, pagination: Pagination::new(request, total) }
    }
}

/// Counts the records a filter admits.
pub fn count_matching<T, F: RecordFilter<T>>(records: &[T], filter: &F) -> u64 {
    records.iter().filter(|r| filter.matches(r)).count() as u64
}

/// Filters, orders and windows `records`.
///
/// `records` must be in insertion order: the sort is stable, so ties keep
/// creation order.
pub fn select<T, F, S>(records: &[T], filter: &F, sort: &Sort<S>, window: Option<Window>) -> Vec<T>
where
    T: Clone,
    F: RecordFilter<T>,
    S: SortField<Record = T>,
{
    let mut matched: Vec<&T> = records.iter().filter(|r| filter.matches(r)).collect();
    matched.sort_by(|a, b| sort.compare(a, b));

    let (offset, limit) = match window {
        Some(w) => (w.offset as usize, w.limit as usize),
        None => (0, usize::MAX),
    };

    matched.into_iter().skip(offset).take(limit).cloned().collect()
}

pub fn coerce_bool(raw: Option<&String>) -> Option<bool> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

pub fn coerce_u32(raw: Option<&String>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
}

pub fn coerce_enum<E: FromStr>(raw: Option<&String>) -> Option<E> {
    raw.and_then(|s| s.trim().parse::<E>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        score: i32,
        flag: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum RowSort {
        Score,
        Name,
    }

    impl SortField for RowSort {
        type Record = Row;

        fn parse(name: &str) -> Option<Self> {
            match name {
                "score" => Some(RowSort::Score),
                "name" => Some(RowSort::Name),
                _ => None,
            }
        }

        fn column(&self) -> &'static str {
            match self {
                RowSort::Score => "score",
                RowSort::Name => "name",
            }
        }

        fn compare(&self, a: &Row, b: &Row) -> Ordering {
            match self {
                RowSort::Score => a.score.cmp(&b.score),
                RowSort::Name => a.name.cmp(b.name),
            }
        }
    }

    struct FlagFilter(Option<bool>);

    impl RecordFilter<Row> for FlagFilter {
        fn matches(&self, record: &Row) -> bool {
            self.0.is_none_or(|flag| record.flag == flag)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "a", score: 5, flag: true },
            Row { name: "b", score: 9, flag: false },
            Row { name: "c", score: 5, flag: true },
            Row { name: "d", score: 1, flag: false },
            Row { name: "e", score: 5, flag: true },
        ]
    }

    fn raw(pairs: &[(&str, &str)]) -> RawQuery {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn pagination_matches_featured_scenario() {
        let p = Pagination::new(PageRequest::new(Some(1), Some(2), 10), 5);
        assert_eq!(p, Pagination { page: 1, limit: 2, total: 5, pages: 3, has_next: true, has_prev: false });
    }

    #[test]
    fn last_page_has_no_next() {
        let p = Pagination::new(PageRequest::new(Some(3), Some(2), 10), 5);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let p = Pagination::new(PageRequest::new(None, None, 10), 0);
        assert_eq!(p.pages, 0);
        assert!(!p.has_next);
    }

    #[test]
    fn page_and_limit_are_clamped() {
        let req = PageRequest::from_params(&raw(&[("page", "0"), ("limit", "0")]), 10);
        assert_eq!(req, PageRequest { page: 1, limit: 1 });

        let req = PageRequest::from_params(&raw(&[("limit", "5000")]), 10);
        assert_eq!(req.limit, MAX_PAGE_SIZE);

        let req = PageRequest::from_params(&raw(&[("page", "-3"), ("limit", "abc")]), 20);
        assert_eq!(req, PageRequest { page: 1, limit: 20 });
    }

    #[test]
    fn offset_follows_page() {
        assert_eq!(PageRequest::new(Some(3), Some(10), 10).offset(), 20);
    }

    #[test]
    fn bool_coercion_is_total() {
        assert_eq!(coerce_bool(Some(&"true".to_string())), Some(true));
        assert_eq!(coerce_bool(Some(&"FALSE".to_string())), Some(false));
        assert_eq!(coerce_bool(Some(&"yes".to_string())), None);
        assert_eq!(coerce_bool(Some(&String::new())), None);
        assert_eq!(coerce_bool(None), None);
    }

    #[test]
    fn absent_filter_imposes_no_constraint() {
        let all = rows();
        assert_eq!(count_matching(&all, &FlagFilter(None)), 5);
        assert_eq!(count_matching(&all, &FlagFilter(Some(false))), 2);
    }

    #[test]
    fn select_sorts_stably_and_windows() {
        let all = rows();
        let sort = Sort::new(RowSort::Score, SortOrder::Desc);

        let page = select(&all, &FlagFilter(None), &sort, Some(Window { offset: 1, limit: 3 }));
        let names: Vec<_> = page.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "c", "e"]);

        let asc = Sort::new(RowSort::Score, SortOrder::Asc);
        let names: Vec<_> = select(&all, &FlagFilter(Some(true)), &asc, None)
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["a", "c", "e"]);
    }

    #[test]
    fn unknown_sort_falls_back_to_default_and_order_defaults_desc() {
        let sort = Sort::from_params(Some("bogus"), None, RowSort::Name);
        assert_eq!(sort, Sort { field: RowSort::Name, order: SortOrder::Desc });

        let sort = Sort::from_params(Some("score"), Some("asc"), RowSort::Name);
        assert_eq!(sort, Sort { field: RowSort::Score, order: SortOrder::Asc });
    }
}
