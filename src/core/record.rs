//! Transaction records and typed accessors over loosely typed columns
//!
//! The `sales` collection was imported from spreadsheets, so a handful of
//! columns arrive with inconsistent types: phone numbers are sometimes text
//! and sometimes 64-bit integers, ages are sometimes numeric strings, and
//! tags are either a comma-joined string or a list. Each of those columns
//! gets a small wrapper type exposing one accessor that always yields the
//! canonical form, and that accessor is used both when filtering and when
//! rendering a record.
//!
//! Records keep the stored column labels (`"Customer Name"`, `"Total Amount"`,
//! ...) on the wire, which is what the dashboard table keys its columns by.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Column labels returned by the listing endpoint, in table order
pub const SUMMARY_COLUMNS: &[&str] = &[
    "Transaction ID",
    "Date",
    "Customer ID",
    "Customer Name",
    "Phone Number",
    "Gender",
    "Age",
    "Customer Region",
    "Product Category",
    "Quantity",
    "Total Amount",
    "Product ID",
    "Employee Name",
];

// =============================================================================
// Phone number
// =============================================================================

/// Phone number as stored: text, an integer, or occasionally a float
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum PhoneNumber {
    Text(String),
    Integer(i64),
    Float(f64),
    #[default]
    Missing,
}

impl PhoneNumber {
    /// Canonical string form
    ///
    /// Total over every stored representation, and idempotent: wrapping the
    /// result in [`PhoneNumber::Text`] yields the same string again.
    pub fn as_text(&self) -> String {
        match self {
            PhoneNumber::Text(s) => s.clone(),
            PhoneNumber::Integer(n) => n.to_string(),
            PhoneNumber::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.2e18 => {
                (*f as i64).to_string()
            }
            PhoneNumber::Float(f) => f.to_string(),
            PhoneNumber::Missing => String::new(),
        }
    }
}

impl From<&str> for PhoneNumber {
    fn from(value: &str) -> Self {
        PhoneNumber::Text(value.to_string())
    }
}

impl From<i64> for PhoneNumber {
    fn from(value: i64) -> Self {
        PhoneNumber::Integer(value)
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_text())
    }
}

// =============================================================================
// Age
// =============================================================================

/// Age as stored: an integer, a float, or a numeric string
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum Age {
    Integer(i64),
    Float(f64),
    Text(String),
    #[default]
    Missing,
}

impl Age {
    /// Age coerced to whole years
    ///
    /// Floats are truncated toward zero. Text must parse as an integer once
    /// trimmed; anything else has no age and never satisfies an age bound.
    pub fn years(&self) -> Option<i64> {
        match self {
            Age::Integer(n) => Some(*n),
            Age::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Age::Float(_) => None,
            Age::Text(s) => s.trim().parse().ok(),
            Age::Missing => None,
        }
    }
}

impl From<i64> for Age {
    fn from(value: i64) -> Self {
        Age::Integer(value)
    }
}

impl From<&str> for Age {
    fn from(value: &str) -> Self {
        Age::Text(value.to_string())
    }
}

impl Serialize for Age {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self.years(), self) {
            (Some(years), _) => serializer.serialize_i64(years),
            (None, Age::Text(s)) => serializer.serialize_str(s),
            (None, _) => serializer.serialize_none(),
        }
    }
}

// =============================================================================
// Tags
// =============================================================================

/// Tags as stored: a comma-joined string or a list of strings
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    List(Vec<String>),
    Joined(String),
    #[default]
    Missing,
}

impl Tags {
    /// Trimmed, non-empty tag tokens in stored order
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Tags::List(items) => items
                .iter()
                .flat_map(|item| split_tags(item))
                .map(str::to_string)
                .collect(),
            Tags::Joined(text) => split_tags(text).map(str::to_string).collect(),
            Tags::Missing => Vec::new(),
        }
    }

    /// Whether `pred` holds for the stored tag text
    ///
    /// A joined string is tested as a whole; a list matches when any element
    /// does. This mirrors how a document store applies a pattern to a scalar
    /// versus an array field.
    pub fn any_text(&self, pred: impl Fn(&str) -> bool) -> bool {
        match self {
            Tags::List(items) => items.iter().any(|item| pred(item)),
            Tags::Joined(text) => pred(text),
            Tags::Missing => false,
        }
    }
}

impl From<&str> for Tags {
    fn from(value: &str) -> Self {
        Tags::Joined(value.to_string())
    }
}

impl Serialize for Tags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tokens().serialize(serializer)
    }
}

/// Split comma-joined tag text into trimmed, non-empty tokens
pub fn split_tags(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|t| !t.is_empty())
}

// =============================================================================
// Timestamps
// =============================================================================

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

// =============================================================================
// Records
// =============================================================================

/// A complete sales transaction, as returned by single-record lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "Transaction ID")]
    pub id: i64,

    #[serde(rename = "Date", deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,

    #[serde(rename = "Customer ID", default)]
    pub customer_id: String,

    #[serde(rename = "Customer Name", default)]
    pub customer_name: String,

    #[serde(rename = "Phone Number", default)]
    pub phone_number: PhoneNumber,

    #[serde(rename = "Gender", default)]
    pub gender: String,

    #[serde(rename = "Age", default)]
    pub age: Age,

    #[serde(rename = "Customer Region", default)]
    pub customer_region: String,

    #[serde(rename = "Customer Type", default, skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<String>,

    #[serde(rename = "Product ID", default)]
    pub product_id: String,

    #[serde(rename = "Product Name", default)]
    pub product_name: String,

    #[serde(rename = "Brand", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(rename = "Product Category", default)]
    pub product_category: String,

    #[serde(rename = "Tags", default)]
    pub tags: Tags,

    #[serde(rename = "Quantity", default)]
    pub quantity: i64,

    #[serde(rename = "Price per Unit", default)]
    pub price_per_unit: f64,

    #[serde(rename = "Discount Percentage", default)]
    pub discount_percentage: f64,

    #[serde(rename = "Total Amount", default)]
    pub total_amount: f64,

    #[serde(rename = "Final Amount", default)]
    pub final_amount: f64,

    #[serde(rename = "Payment Method", default)]
    pub payment_method: String,

    #[serde(rename = "Order Status", default)]
    pub order_status: String,

    #[serde(rename = "Delivery Type", default, skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<String>,

    #[serde(rename = "Store ID", default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,

    #[serde(rename = "Store Location", default, skip_serializing_if = "Option::is_none")]
    pub store_location: Option<String>,

    #[serde(rename = "Salesperson ID", default, skip_serializing_if = "Option::is_none")]
    pub salesperson_id: Option<String>,

    #[serde(rename = "Employee Name", default)]
    pub employee_name: String,
}

impl TransactionRecord {
    /// Discount granted on this transaction, in currency units
    pub fn discount_amount(&self) -> f64 {
        self.total_amount * self.discount_percentage / 100.0
    }
}

/// The fixed column subset shown in the transactions table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    #[serde(rename = "Transaction ID")]
    pub id: i64,

    #[serde(rename = "Date", deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,

    #[serde(rename = "Customer ID", default)]
    pub customer_id: String,

    #[serde(rename = "Customer Name", default)]
    pub customer_name: String,

    #[serde(rename = "Phone Number", default)]
    pub phone_number: PhoneNumber,

    #[serde(rename = "Gender", default)]
    pub gender: String,

    #[serde(rename = "Age", default)]
    pub age: Age,

    #[serde(rename = "Customer Region", default)]
    pub customer_region: String,

    #[serde(rename = "Product Category", default)]
    pub product_category: String,

    #[serde(rename = "Quantity", default)]
    pub quantity: i64,

    #[serde(rename = "Total Amount", default)]
    pub total_amount: f64,

    #[serde(rename = "Product ID", default)]
    pub product_id: String,

    #[serde(rename = "Employee Name", default)]
    pub employee_name: String,
}

impl From<&TransactionRecord> for TransactionSummary {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            id: record.id,
            date: record.date,
            customer_id: record.customer_id.clone(),
            customer_name: record.customer_name.clone(),
            phone_number: record.phone_number.clone(),
            gender: record.gender.clone(),
            age: record.age.clone(),
            customer_region: record.customer_region.clone(),
            product_category: record.product_category.clone(),
            quantity: record.quantity,
            total_amount: record.total_amount,
            product_id: record.product_id.clone(),
            employee_name: record.employee_name.clone(),
        }
    }
}
