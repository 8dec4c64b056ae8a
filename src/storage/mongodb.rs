//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides [`MongoTransactionStore`], a [`TransactionStore`] backed by a
//! single collection (`sales` by default) of a `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! retail-dash = { version = "0.1.0", features = ["mongodb_backend"] }
//! ```
//!
//! # Query translation
//!
//! Predicates are translated into one filter document whose clauses are
//! always combined under an explicit `$and`, so no clause can overwrite
//! another at the top level. Columns with inconsistent stored types are
//! coerced server-side: phone numbers via `$toString`, ages via `$convert`
//! with a null fallback so that an unparsable age never matches.
//!
//! # Serialization strategy
//!
//! Documents are converted to `serde_json::Value` (relaxed extended JSON)
//! and deserialized into the record types. BSON dates are rewritten as
//! RFC 3339 strings first, and `_id` is dropped.

use crate::core::predicate::{Column, Predicate};
use crate::core::query::{PageWindow, Sort};
use crate::core::record::{SUMMARY_COLUMNS, TransactionRecord, TransactionSummary};
use crate::core::store::{Totals, TransactionStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Database};
use serde::de::DeserializeOwned;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a BSON Document into a serde_json::Value, dropping `_id` and
/// rendering dates as RFC 3339 strings.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    doc.remove("_id");

    for (_, value) in doc.iter_mut() {
        if let Bson::DateTime(dt) = value
            && let Ok(text) = dt.try_to_rfc3339_string()
        {
            *value = Bson::String(text);
        }
    }

    Bson::Document(doc).into_relaxed_extjson()
}

fn document_to<T: DeserializeOwned>(doc: Document) -> Result<T> {
    serde_json::from_value(document_to_json(doc))
        .map_err(|e| anyhow!("Failed to deserialize transaction from document: {}", e))
}

fn bson_date(ts: &DateTime<Utc>) -> Bson {
    Bson::DateTime(mongodb::bson::DateTime::from_millis(ts.timestamp_millis()))
}

/// Numeric BSON value as f64; anything else counts as zero
fn bson_f64(value: Option<&Bson>) -> f64 {
    match value {
        Some(Bson::Double(f)) => *f,
        Some(Bson::Int32(n)) => f64::from(*n),
        Some(Bson::Int64(n)) => *n as f64,
        _ => 0.0,
    }
}

fn bson_i64(value: Option<&Bson>) -> i64 {
    match value {
        Some(Bson::Int32(n)) => i64::from(*n),
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Double(f)) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}

/// Stored scalar as dropdown text
fn bson_text(value: Bson) -> Option<String> {
    match value {
        Bson::String(s) => Some(s),
        Bson::Int32(n) => Some(n.to_string()),
        Bson::Int64(n) => Some(n.to_string()),
        Bson::Double(f) => Some(f.to_string()),
        Bson::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Field reference for aggregation expressions, e.g. `$Phone Number`
fn field_ref(column: Column) -> String {
    format!("${}", column.label())
}

/// Age as an integer, or null when it cannot be converted
fn age_expression() -> Document {
    let age = field_ref(Column::Age);
    doc! {
        "$convert": {
            "input": {
                "$cond": [
                    { "$eq": [{ "$type": age.as_str() }, "string"] },
                    { "$trim": { "input": age.as_str() } },
                    age.as_str(),
                ]
            },
            "to": "int",
            "onError": Bson::Null,
            "onNull": Bson::Null,
        }
    }
}

/// Translate a predicate into a MongoDB filter document
pub fn predicate_to_document(predicate: &Predicate) -> Document {
    match predicate {
        Predicate::All => doc! {},
        Predicate::And(children) if children.is_empty() => doc! {},
        Predicate::And(children) => {
            let clauses: Vec<Document> = children.iter().map(predicate_to_document).collect();
            doc! { "$and": clauses }
        }
        Predicate::Or(children) if children.is_empty() => doc! { "$expr": false },
        Predicate::Or(children) => {
            let clauses: Vec<Document> = children.iter().map(predicate_to_document).collect();
            doc! { "$or": clauses }
        }
        Predicate::In { column, values } => {
            let mut filter = Document::new();
            filter.insert(column.label(), doc! { "$in": values.clone() });
            filter
        }
        Predicate::Contains {
            column: Column::PhoneNumber,
            pattern,
        } => doc! {
            "$expr": {
                "$regexMatch": {
                    "input": { "$toString": field_ref(Column::PhoneNumber) },
                    "regex": pattern.as_str(),
                    "options": "i",
                }
            }
        },
        Predicate::Contains { column, pattern } => {
            let mut filter = Document::new();
            filter.insert(
                column.label(),
                doc! { "$regex": pattern.as_str(), "$options": "i" },
            );
            filter
        }
        Predicate::AgeBetween { min, max } => doc! {
            "$expr": {
                "$and": [
                    { "$gte": [age_expression(), *min] },
                    { "$lte": [age_expression(), *max] },
                ]
            }
        },
        Predicate::DateRange { start, end } => {
            let mut bounds = Document::new();
            if let Some(start) = start {
                bounds.insert("$gte", bson_date(start));
            }
            if let Some(end) = end {
                bounds.insert("$lte", bson_date(end));
            }
            if bounds.is_empty() {
                return doc! {};
            }
            let mut filter = Document::new();
            filter.insert(Column::Date.label(), bounds);
            filter
        }
    }
}

/// Sort document: the requested key, then ascending transaction id
fn sort_document(sort: Sort) -> Document {
    let mut doc = Document::new();
    doc.insert(sort.key.column(), sort.order.as_i32());
    doc.insert("Transaction ID", 1);
    doc
}

fn summary_projection() -> Document {
    let mut projection = doc! { "_id": 0 };
    for column in SUMMARY_COLUMNS {
        projection.insert(*column, 1);
    }
    projection
}

// ---------------------------------------------------------------------------
// MongoTransactionStore
// ---------------------------------------------------------------------------

/// Transaction store backed by a MongoDB collection.
///
/// # Example
///
/// ```rust,ignore
/// use retail::storage::MongoTransactionStore;
///
/// let store = MongoTransactionStore::connect("mongodb://localhost:27017", "retail", "sales").await?;
/// let count = store.count(&Predicate::All).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoTransactionStore {
    database: Database,
    collection: String,
}

impl MongoTransactionStore {
    /// Create a store over `collection` of the given database handle.
    pub fn new(database: Database, collection: impl Into<String>) -> Self {
        Self {
            database,
            collection: collection.into(),
        }
    }

    /// Connect to `uri` and open `collection` of `database`.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| anyhow!("Failed to connect to MongoDB: {}", e))?;

        tracing::info!(database, collection, "Connected to MongoDB");

        Ok(Self::new(client.database(database), collection))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(&self.collection)
    }
}

#[async_trait]
impl TransactionStore for MongoTransactionStore {
    fn backend_name(&self) -> &'static str {
        "MongoDB"
    }

    async fn find(
        &self,
        predicate: &Predicate,
        sort: Sort,
        window: PageWindow,
    ) -> Result<Vec<TransactionSummary>> {
        let cursor = self
            .collection()
            .find(predicate_to_document(predicate))
            .projection(summary_projection())
            .sort(sort_document(sort))
            .skip(window.skip() as u64)
            .limit(window.limit as i64)
            .await
            .map_err(|e| anyhow!("Failed to list transactions: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect transactions: {}", e))?;

        docs.into_iter().map(document_to).collect()
    }

    async fn count(&self, predicate: &Predicate) -> Result<usize> {
        let count = self
            .collection()
            .count_documents(predicate_to_document(predicate))
            .await
            .map_err(|e| anyhow!("Failed to count transactions: {}", e))?;

        Ok(count as usize)
    }

    async fn aggregate(&self, predicate: &Predicate) -> Result<Totals> {
        let pipeline = vec![
            doc! { "$match": predicate_to_document(predicate) },
            doc! {
                "$group": {
                    "_id": Bson::Null,
                    "units": { "$sum": "$Quantity" },
                    "amount": { "$sum": "$Total Amount" },
                    "discount": {
                        "$sum": {
                            "$divide": [
                                { "$multiply": ["$Total Amount", "$Discount Percentage"] },
                                100,
                            ]
                        }
                    },
                }
            },
        ];

        let mut cursor = self
            .collection()
            .aggregate(pipeline)
            .await
            .map_err(|e| anyhow!("Failed to aggregate transactions: {}", e))?;

        let group = cursor
            .try_next()
            .await
            .map_err(|e| anyhow!("Failed to read aggregation result: {}", e))?;

        // No matching document means no group at all
        Ok(group
            .map(|g| Totals {
                units: bson_i64(g.get("units")),
                amount: bson_f64(g.get("amount")),
                discount: bson_f64(g.get("discount")),
            })
            .unwrap_or_default())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TransactionRecord>> {
        let doc = self
            .collection()
            .find_one(doc! { "Transaction ID": id })
            .await
            .map_err(|e| anyhow!("Failed to get transaction: {}", e))?;

        doc.map(document_to).transpose()
    }

    async fn distinct(&self, column: Column) -> Result<Vec<String>> {
        let values = self
            .collection()
            .distinct(column.label(), doc! {})
            .await
            .map_err(|e| anyhow!("Failed to fetch distinct {}: {}", column, e))?;

        Ok(values.into_iter().filter_map(bson_text).collect())
    }
}
