//! Record store abstraction
//!
//! The executor never talks to a database directly. It receives a
//! [`TransactionStore`] at construction time, which keeps the query logic
//! testable against the in-memory store and lets the MongoDB backend stay
//! behind a feature flag.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use super::predicate::{Column, Predicate};
use super::query::{PageWindow, Sort};
use super::record::{TransactionRecord, TransactionSummary};

/// Sums over the records matching a predicate
///
/// Every field is zero when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    /// Σ quantity
    pub units: i64,
    /// Σ total amount
    pub amount: f64,
    /// Σ total amount × discount percentage / 100, computed per record
    pub discount: f64,
}

/// Read access to the transaction collection
///
/// Implementations must evaluate every method against the same predicate
/// semantics; `find` and `count` in particular must agree on the matched set.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Backend name used in error messages and logs
    fn backend_name(&self) -> &'static str;

    /// One page of matching records, ordered by `sort`
    async fn find(
        &self,
        predicate: &Predicate,
        sort: Sort,
        window: PageWindow,
    ) -> Result<Vec<TransactionSummary>>;

    /// Number of matching records
    async fn count(&self, predicate: &Predicate) -> Result<usize>;

    /// Unit, amount and discount sums over matching records
    async fn aggregate(&self, predicate: &Predicate) -> Result<Totals>;

    /// Exact lookup by transaction id
    async fn find_by_id(&self, id: i64) -> Result<Option<TransactionRecord>>;

    /// Distinct stored values of a column over the whole collection
    ///
    /// Values are returned as stored: for [`Column::Tags`] that may include
    /// comma-joined strings, which the caller splits.
    async fn distinct(&self, column: Column) -> Result<Vec<String>>;
}
