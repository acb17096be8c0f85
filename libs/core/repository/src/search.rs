use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Page size used when a request carries no valid `perPage`
pub const DEFAULT_PER_PAGE: usize = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Only a case-insensitive `"asc"` is ascending; anything else is `Desc`
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if s.to_lowercase() == "asc" => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Asc)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Raw search request, exactly as it arrived.
///
/// Fields are untyped JSON so that query strings and payloads of any shape
/// can be handed over; [`SearchParams`] does the normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchInput {
    pub page: Option<Value>,
    pub per_page: Option<Value>,
    pub sort: Option<Value>,
    pub sort_direction: Option<Value>,
    pub filter: Option<Value>,
}

impl SearchInput {
    pub fn page(mut self, page: impl Into<Value>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn per_page(mut self, per_page: impl Into<Value>) -> Self {
        self.per_page = Some(per_page.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<Value>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn sort_direction(mut self, direction: impl Into<Value>) -> Self {
        self.sort_direction = Some(direction.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<Value>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Normalized query: page, page size, sort and filter.
///
/// Construction never fails. Malformed values fall back to their defaults,
/// so code receiving a `SearchParams` never has to re-check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SearchInput")]
pub struct SearchParams {
    page: usize,
    per_page: usize,
    sort: Option<String>,
    sort_direction: Option<SortDirection>,
    filter: Option<String>,
}

impl SearchParams {
    pub fn new(input: SearchInput) -> Self {
        Self::with_default_per_page(input, DEFAULT_PER_PAGE)
    }

    /// Same as [`SearchParams::new`] with a different fallback page size
    pub fn with_default_per_page(input: SearchInput, default_per_page: usize) -> Self {
        let sort = coerce_text(input.sort.as_ref());
        let sort_direction = sort
            .as_ref()
            .map(|_| SortDirection::from_value(input.sort_direction.as_ref()));

        Self {
            page: positive_or(input.page.as_ref(), 1),
            per_page: positive_or(input.per_page.as_ref(), default_per_page.max(1)),
            sort,
            sort_direction,
            filter: coerce_text(input.filter.as_ref()),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// `None` exactly when there is no sort field
    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort_direction
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::new(SearchInput::default())
    }
}

impl From<SearchInput> for SearchParams {
    fn from(input: SearchInput) -> Self {
        Self::new(input)
    }
}

/// Positive integers pass; numeric strings are parsed (query strings);
/// fractions, booleans, zero, negatives and everything else fall back.
fn positive_or(value: Option<&Value>, fallback: usize) -> usize {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f > 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| *n > 0)
        .unwrap_or(fallback)
}

/// Scalars become their string form; empty strings, null and compound values are `None`
fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// One page of results plus the metadata needed to render pagination.
///
/// Serializes as `{ items, total, currentPage, perPage, lastPage, sort,
/// sortDirection, filter }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    items: Vec<T>,
    total: usize,
    current_page: usize,
    per_page: usize,
    last_page: usize,
    sort: Option<String>,
    sort_direction: Option<SortDirection>,
    filter: Option<String>,
}

impl<T> SearchResult<T> {
    /// `total` counts every match before pagination; the query is echoed back
    pub fn new(items: Vec<T>, total: usize, params: &SearchParams) -> Self {
        let per_page = params.per_page().max(1);
        Self {
            items,
            total,
            current_page: params.page(),
            per_page,
            last_page: total.div_ceil(per_page).max(1),
            sort: params.sort.clone(),
            sort_direction: params.sort_direction,
            filter: params.filter.clone(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn last_page(&self) -> usize {
        self.last_page
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort_direction
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Convert every item, keeping the pagination metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchResult<U> {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            last_page: self.last_page,
            sort: self.sort,
            sort_direction: self.sort_direction,
            filter: self.filter,
        }
    }
}
