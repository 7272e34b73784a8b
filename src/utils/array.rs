//! Generic list helpers shared by the list view and statistics code.
//!
//! Records expose their fields through [`Record`] so that sorting and
//! filtering can be driven by a field key chosen at runtime (a column key,
//! a search field list) without reflection.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single field read from a record, with a total order across values of
/// the same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Int(_) | FieldValue::Decimal(_) => 2,
            FieldValue::Text(_) => 3,
            FieldValue::Date(_) => 4,
        }
    }

    /// Compares two non-null values. Integers and decimals compare
    /// numerically; other mixed kinds fall back to a fixed kind order.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Decimal(a), FieldValue::Decimal(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Decimal(b)) => Decimal::from(*a).cmp(b),
            (FieldValue::Decimal(a), FieldValue::Int(b)) => a.cmp(&Decimal::from(*b)),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Text form used by free-text search. Null and boolean fields are not
    /// searchable.
    pub fn search_text(&self) -> Option<String> {
        match self {
            FieldValue::Null | FieldValue::Bool(_) => None,
            FieldValue::Int(v) => Some(v.to_string()),
            FieldValue::Decimal(v) => Some(v.to_string()),
            FieldValue::Text(v) => Some(v.clone()),
            FieldValue::Date(v) => Some(v.format("%Y-%m-%d").to_string()),
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map(FieldValue::Text).unwrap_or(FieldValue::Null)
    }
}

pub trait Record {
    type Key: Copy;

    fn field(&self, key: Self::Key) -> FieldValue;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Nulls are the largest value: last ascending, first descending.
pub fn compare_nulls_largest(a: &FieldValue, b: &FieldValue, order: SortOrder) -> Ordering {
    let ascending = match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.compare(b),
    };
    match order {
        SortOrder::Asc => ascending,
        SortOrder::Desc => ascending.reverse(),
    }
}

/// Stable sort of a copy of `items` by one field. Ties keep input order.
pub fn sort_by_key<T: Record + Clone>(items: &[T], key: T::Key, order: SortOrder) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| compare_nulls_largest(&a.field(key), &b.field(key), order));
    sorted
}

/// Stable sort of a copy of `items` with a caller-supplied comparator.
/// `Desc` reverses the comparator rather than the result, so ties keep
/// input order either way.
pub fn sort_by_compare<T, F>(items: &[T], mut compare: F, order: SortOrder) -> Vec<T>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut sorted = items.to_vec();
    match order {
        SortOrder::Asc => sorted.sort_by(|a, b| compare(a, b)),
        SortOrder::Desc => sorted.sort_by(|a, b| compare(b, a)),
    }
    sorted
}

/// Case-insensitive substring match over `keys`. `needle` must already be
/// trimmed and lowercased; an empty needle matches everything.
pub fn matches_search<T: Record>(item: &T, needle: &str, keys: &[T::Key]) -> bool {
    if needle.is_empty() {
        return true;
    }
    keys.iter().any(|key| {
        item.field(*key)
            .search_text()
            .map(|text| text.to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

pub fn normalize_search_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Items whose searchable fields contain `term`. A blank term returns every
/// item.
pub fn filter_by_search<T: Record + Clone>(items: &[T], term: &str, keys: &[T::Key]) -> Vec<T> {
    let needle = normalize_search_term(term);
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| matches_search(*item, &needle, keys))
        .cloned()
        .collect()
}

/// Items whose `key` field equals `value`. `FieldValue::Null` means "no
/// filter" and returns every item.
pub fn filter_by_property<T: Record + Clone>(items: &[T], key: T::Key, value: &FieldValue) -> Vec<T> {
    if value.is_null() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| &item.field(key) == value)
        .cloned()
        .collect()
}

pub fn filter_by<T: Clone, P: FnMut(&T) -> bool>(items: &[T], mut predicate: P) -> Vec<T> {
    items.iter().filter(|item| predicate(item)).cloned().collect()
}

/// Search followed by an optional property match, in that order.
#[derive(Debug, Clone)]
pub struct CombinedFilter<'a, K> {
    pub search_term: Option<&'a str>,
    pub search_keys: &'a [K],
    pub property: Option<(K, FieldValue)>,
}

pub fn combine_filters<T: Record + Clone>(items: &[T], filter: &CombinedFilter<'_, T::Key>) -> Vec<T> {
    let mut result = match filter.search_term {
        Some(term) => filter_by_search(items, term, filter.search_keys),
        None => items.to_vec(),
    };
    if let Some((key, value)) = &filter.property {
        result = filter_by_property(&result, *key, value);
    }
    result
}

/// One-based page slice. Pages before the first or past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    if page == 0 || page_size == 0 {
        return Vec::new();
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub start_index: usize,
    pub end_index: usize,
}

pub fn pagination_info(total_items: usize, current_page: usize, page_size: usize) -> PaginationInfo {
    let total_pages = if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    };
    let start_index = current_page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total_items);
    let end_index = start_index.saturating_add(page_size).min(total_items);

    PaginationInfo {
        current_page,
        total_pages,
        total_items,
        page_size,
        has_next: current_page < total_pages,
        has_previous: current_page > 1,
        start_index,
        end_index,
    }
}
