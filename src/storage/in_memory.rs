//! In-memory implementation of TransactionStore for testing and development

use crate::core::predicate::{Column, Predicate};
use crate::core::query::{PageWindow, Sort, SortKey, SortOrder};
use crate::core::record::{TransactionRecord, TransactionSummary};
use crate::core::store::{Totals, TransactionStore};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// In-memory transaction store
///
/// Records are keyed by transaction id, so inserting an existing id replaces
/// the previous record. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryTransactionStore {
    records: Arc<RwLock<BTreeMap<i64, TransactionRecord>>>,
}

impl InMemoryTransactionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`
    pub fn from_records(records: impl IntoIterator<Item = TransactionRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Load a JSON array of records
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<TransactionRecord> =
            serde_json::from_str(json).context("Failed to parse seed records")?;
        Ok(Self::from_records(records))
    }

    /// Load a JSON array of records from a file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid seed file '{}'", path.display()))
    }

    /// Insert or replace a record
    pub fn insert(&self, record: TransactionRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.insert(record.id, record);

        Ok(())
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Order two records by the sort key, ties broken by ascending id
fn compare(a: &TransactionRecord, b: &TransactionRecord, sort: Sort) -> Ordering {
    let by_key = match sort.key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::CustomerName => a.customer_name.cmp(&b.customer_name),
        SortKey::Quantity => a.quantity.cmp(&b.quantity),
    };
    let by_key = match sort.order {
        SortOrder::Asc => by_key,
        SortOrder::Desc => by_key.reverse(),
    };
    by_key.then_with(|| a.id.cmp(&b.id))
}

fn column_values(record: &TransactionRecord, column: Column) -> Vec<String> {
    match column {
        Column::CustomerName => vec![record.customer_name.clone()],
        Column::PhoneNumber => vec![record.phone_number.as_text()],
        Column::Gender => vec![record.gender.clone()],
        Column::Age => record.age.years().map(|y| y.to_string()).into_iter().collect(),
        Column::CustomerRegion => vec![record.customer_region.clone()],
        Column::ProductCategory => vec![record.product_category.clone()],
        Column::Tags => record.tags.tokens(),
        Column::PaymentMethod => vec![record.payment_method.clone()],
        Column::OrderStatus => vec![record.order_status.clone()],
        Column::Date => vec![record.date.to_rfc3339()],
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn find(
        &self,
        predicate: &Predicate,
        sort: Sort,
        window: PageWindow,
    ) -> Result<Vec<TransactionSummary>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matching: Vec<&TransactionRecord> =
            records.values().filter(|r| predicate.matches(r)).collect();
        matching.sort_by(|a, b| compare(a, b, sort));

        Ok(matching
            .into_iter()
            .skip(window.skip())
            .take(window.limit)
            .map(TransactionSummary::from)
            .collect())
    }

    async fn count(&self, predicate: &Predicate) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.values().filter(|r| predicate.matches(r)).count())
    }

    async fn aggregate(&self, predicate: &Predicate) -> Result<Totals> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records
            .values()
            .filter(|r| predicate.matches(r))
            .fold(Totals::default(), |mut totals, r| {
                totals.units += r.quantity;
                totals.amount += r.total_amount;
                totals.discount += r.discount_amount();
                totals
            }))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TransactionRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(&id).cloned())
    }

    async fn distinct(&self, column: Column) -> Result<Vec<String>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let values: BTreeSet<String> = records
            .values()
            .flat_map(|r| column_values(r, column))
            .filter(|v| !v.is_empty())
            .collect();

        Ok(values.into_iter().collect())
    }
}
