use serde::{Deserialize, Serialize};
use skyway_core::Validator;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Paging input as received from a caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageParams {
    pub page: i64,
    pub page_size: i64,
    pub order_by: String,
    pub order: String,
    pub search_term: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            order_by: "id".to_string(),
            order: "ASC".to_string(),
            search_term: None,
        }
    }
}

/// Upper bound on `pageSize`. Larger pages are rejected with a validation
/// failure rather than clamped, so callers find out they asked for too much.
pub const MAX_PAGE_SIZE: i64 = 100;

impl PageParams {
    /// Paging constraints, with `order_by` restricted to `sortable`.
    pub fn rules(&self, sortable: &[&str]) -> Validator {
        Validator::new()
            .min("page", self.page, 1)
            .range("pageSize", self.page_size, 1, MAX_PAGE_SIZE)
            .one_of("orderBy", self.order_by.as_str(), sortable)
            .one_of("order", self.order.as_str(), &["ASC", "DESC"])
    }

    /// Convert validated params into a repository query.
    pub fn to_query(&self) -> PageQuery {
        PageQuery {
            page: self.page.max(1).unsigned_abs(),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE).unsigned_abs(),
            order_by: self.order_by.clone(),
            order: self.order.parse().unwrap_or_default(),
            search_term: self
                .search_term
                .as_deref()
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(str::to_string),
        }
    }
}

/// One page request against a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u64,
    pub page_size: u64,
    pub order_by: String,
    pub order: SortOrder,
    pub search_term: Option<String>,
}

impl PageQuery {
    /// Rows to skip. Saturates instead of wrapping, so an absurd page number
    /// still lands past the end of the data.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Cut one page out of an already filtered and sorted collection.
    pub fn slice<T>(&self, items: Vec<T>) -> PagedResult<T> {
        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit()).unwrap_or(usize::MAX))
            .collect();
        PagedResult { items, total }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PagedResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
