use serde::{Deserialize, Serialize};

/// Page used when the caller asks for page zero or a negative page
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller asks for a non-positive size
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Page request/response contract consumed by paginated list queries.
///
/// Implementations report a positive page and size (falling back to defaults
/// for non-positive input) and receive the total row count exactly once, when
/// the list query runs.
pub trait Pagination {
    /// Current page, 1-indexed
    fn current(&self) -> i64;
    /// Rows per page
    fn size(&self) -> i64;
    /// Record the number of rows matching the query, ignoring LIMIT/OFFSET
    fn set_total(&mut self, total: i64);
}

/// Default pagination object: requested page and size plus the total filled in by the query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub curr: i64,
    pub size: i64,
    pub total: i64,
}

impl Page {
    pub fn new(curr: i64, size: i64) -> Self {
        Self {
            curr,
            size,
            total: 0,
        }
    }

    /// Number of rows skipped before this page
    pub fn offset(&self) -> i64 {
        (self.current() - 1).saturating_mul(self.size())
    }

    /// Calculate total pages from the recorded total
    pub fn total_pages(&self) -> i64 {
        if self.total <= 0 {
            return 0;
        }
        let size = self.size();
        self.total / size + i64::from(self.total % size != 0)
    }

    /// Check if there's a next page
    pub fn has_next_page(&self) -> bool {
        self.current().saturating_mul(self.size()) < self.total
    }

    /// Check if there's a previous page
    pub fn has_previous_page(&self) -> bool {
        self.current() > 1
    }
}

impl Pagination for Page {
    fn current(&self) -> i64 {
        if self.curr <= 0 {
            DEFAULT_PAGE
        } else {
            self.curr
        }
    }

    fn size(&self) -> i64 {
        if self.size <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.size
        }
    }

    fn set_total(&mut self, total: i64) {
        self.total = total;
    }
}

/// LIMIT/OFFSET window rendered into a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl LimitOffset {
    /// Window for a 1-indexed page of `per_page` rows
    pub fn page(page: u64, per_page: u64) -> Self {
        Self {
            limit: Some(per_page),
            offset: Some(page.saturating_sub(1).saturating_mul(per_page)),
        }
    }

    /// Create pagination with only limit
    pub fn limit_only(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    /// Create pagination with only offset
    pub fn offset_only(offset: u64) -> Self {
        Self {
            limit: None,
            offset: Some(offset),
        }
    }

    /// Window for a pagination object, normalising non-positive values
    pub fn from_pagination<P: Pagination + ?Sized>(pagination: &P) -> Self {
        Self::page(
            positive(pagination.current(), DEFAULT_PAGE),
            positive(pagination.size(), DEFAULT_PAGE_SIZE),
        )
    }

    /// Like [`LimitOffset::from_pagination`] but never wider than `max_size` rows
    pub fn from_pagination_capped<P: Pagination + ?Sized>(pagination: &P, max_size: u64) -> Self {
        let size = positive(pagination.size(), DEFAULT_PAGE_SIZE).min(max_size.max(1));
        Self::page(positive(pagination.current(), DEFAULT_PAGE), size)
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => format!(" LIMIT {limit} OFFSET {offset}"),
            (Some(limit), None) => format!(" LIMIT {limit}"),
            // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded
            (None, Some(offset)) => format!(" LIMIT -1 OFFSET {offset}"),
            (None, None) => String::new(),
        }
    }
}

fn positive(value: i64, fallback: i64) -> u64 {
    if value <= 0 {
        fallback as u64
    } else {
        value as u64
    }
}
