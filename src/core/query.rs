//! Listing parameters, sorting and pagination utilities

use serde::Serialize;

use super::filter::RawFilterParams;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Columns the listing can be ordered by
///
/// This is an allow-list: a requested key never reaches the store as a field
/// name, it is resolved to one of these variants first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    CustomerName,
    Quantity,
}

impl SortKey {
    /// Resolve a requested key, falling back to [`SortKey::Date`]
    ///
    /// Accepts the API names (`date`, `customerName`, `quantity`) as well as
    /// the column labels the dashboard sends (`Date`, `Customer Name`,
    /// `Quantity`).
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "customerName" | "Customer Name" => SortKey::CustomerName,
            "quantity" | "Quantity" => SortKey::Quantity,
            _ => SortKey::Date,
        }
    }

    /// Stored column label
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Date => "Date",
            SortKey::CustomerName => "Customer Name",
            SortKey::Quantity => "Quantity",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `asc` or `desc` in any case; anything else is descending
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    /// Direction as a document-store sort value
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// Validated sort key and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }
}

/// Parameters of the listing endpoint
///
/// Built from the raw query pairs so that multi-valued filters may be sent
/// as repeated keys.
///
/// # Example
/// ```rust,ignore
/// // GET /api/transactions?page=2&limit=10&sortBy=Quantity&sortOrder=asc&gender[]=Male
/// let params = ListingParams::from_pairs(pairs);
/// assert_eq!(params.page(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListingParams {
    /// Page number (starts at 1)
    pub page: Option<usize>,

    /// Number of items per page
    pub limit: Option<usize>,

    /// Requested sort key, resolved by [`SortKey::parse`]
    pub sort_by: Option<String>,

    /// Requested sort direction, resolved by [`SortOrder::parse`]
    pub sort_order: Option<String>,

    /// Filter parameters, shared with the stats endpoint
    pub filters: RawFilterParams,
}

impl ListingParams {
    /// Collect listing parameters from query pairs
    ///
    /// Unparsable `page`/`limit` values are treated as absent.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "page" => params.page = value.trim().parse().ok(),
                "limit" => params.limit = value.trim().parse().ok(),
                "sortBy" => params.sort_by = Some(value.to_string()),
                "sortOrder" => params.sort_order = Some(value.to_string()),
                _ => {
                    params.filters.absorb(key, value);
                }
            }
        }
        params
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Get limit, clamped to `1..=max_limit`
    pub fn limit(&self, default_limit: usize, max_limit: usize) -> usize {
        self.limit.unwrap_or(default_limit).clamp(1, max_limit.max(1))
    }

    /// Resolved sort
    pub fn sort(&self) -> Sort {
        Sort {
            key: self.sort_by.as_deref().map(SortKey::parse).unwrap_or_default(),
            order: self
                .sort_order
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}

/// Page window handed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub limit: usize,
}

impl PageWindow {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Number of records to skip
    pub fn skip(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}
