//! Query execution over a [`TransactionStore`]
//!
//! The executor owns no state besides the store handle. Reads that do not
//! depend on each other (a page and its count, a count and its sums, the six
//! distinct lookups) are issued concurrently; any failure fails the whole
//! call, so callers never see partial results.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::error::{DashboardError, DashboardResult, StorageError};
use super::predicate::{Column, Predicate};
use super::query::{PageWindow, PaginationMeta, Sort};
use super::record::{TransactionRecord, TransactionSummary, split_tags};
use super::store::{Totals, TransactionStore};

/// One page of the listing
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub records: Vec<TransactionSummary>,
    pub pagination: PaginationMeta,
}

/// Figures shown on the dashboard metric cards
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_transactions: usize,
    pub total_units_sold: i64,
    pub total_amount: f64,
    pub total_discount: f64,
}

/// Sorted distinct values for every filter dropdown
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub genders: Vec<String>,
    pub categories: Vec<String>,
    pub payment_methods: Vec<String>,
    pub order_statuses: Vec<String>,
    pub tags: Vec<String>,
}

/// Runs compiled predicates against the injected store
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn TransactionStore>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    fn storage_error(&self, err: anyhow::Error) -> DashboardError {
        DashboardError::Storage(StorageError::query(self.store.backend_name(), err))
    }

    /// Fetch one page and the total matching count
    ///
    /// The total comes from a separate count over the same predicate, never
    /// from the page length.
    pub async fn execute(
        &self,
        predicate: &Predicate,
        sort: Sort,
        window: PageWindow,
    ) -> DashboardResult<Page> {
        let (records, total) = tokio::try_join!(
            self.store.find(predicate, sort, window),
            self.store.count(predicate),
        )
        .map_err(|e| self.storage_error(e))?;

        Ok(Page {
            records,
            pagination: PaginationMeta::new(window.page, window.limit, total),
        })
    }

    /// Unit, amount and discount sums over matching records
    pub async fn aggregate(&self, predicate: &Predicate) -> DashboardResult<Totals> {
        self.store
            .aggregate(predicate)
            .await
            .map_err(|e| self.storage_error(e))
    }

    /// Matching count plus sums, for the stats endpoint
    pub async fn stats(&self, predicate: &Predicate) -> DashboardResult<DashboardStats> {
        let (count, totals) = tokio::try_join!(
            self.store.count(predicate),
            self.store.aggregate(predicate),
        )
        .map_err(|e| self.storage_error(e))?;

        Ok(DashboardStats {
            total_transactions: count,
            total_units_sold: totals.units,
            total_amount: totals.amount,
            total_discount: totals.discount,
        })
    }

    /// Full record by transaction id
    pub async fn find_by_id(&self, id: i64) -> DashboardResult<TransactionRecord> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| self.storage_error(e))?
            .ok_or_else(|| DashboardError::NotFound { id: id.to_string() })
    }

    /// Dropdown values over the whole collection, ignoring any filter
    pub async fn filter_options(&self) -> DashboardResult<FilterOptions> {
        let (regions, genders, categories, payment_methods, order_statuses, tags) = tokio::try_join!(
            self.store.distinct(Column::CustomerRegion),
            self.store.distinct(Column::Gender),
            self.store.distinct(Column::ProductCategory),
            self.store.distinct(Column::PaymentMethod),
            self.store.distinct(Column::OrderStatus),
            self.store.distinct(Column::Tags),
        )
        .map_err(|e| self.storage_error(e))?;

        Ok(FilterOptions {
            regions: sorted_unique(regions.iter().map(String::as_str)),
            genders: sorted_unique(genders.iter().map(String::as_str)),
            categories: sorted_unique(categories.iter().map(String::as_str)),
            payment_methods: sorted_unique(payment_methods.iter().map(String::as_str)),
            order_statuses: sorted_unique(order_statuses.iter().map(String::as_str)),
            tags: sorted_unique(tags.iter().flat_map(|t| split_tags(t))),
        })
    }
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
