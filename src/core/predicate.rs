//! Store-agnostic predicate tree
//!
//! A [`Predicate`] is what the filter compiler produces and what every
//! [`TransactionStore`](crate::core::store::TransactionStore) consumes. The
//! in-memory backend evaluates it directly with [`Predicate::matches`]; the
//! MongoDB backend translates it into a BSON filter document. Keeping one
//! tree for both the listing and the stats path is what guarantees that
//! both endpoints count the same records.

use chrono::{DateTime, Utc};
use std::fmt;

use super::record::TransactionRecord;

/// Columns a predicate can constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    CustomerName,
    PhoneNumber,
    Gender,
    Age,
    CustomerRegion,
    ProductCategory,
    Tags,
    PaymentMethod,
    OrderStatus,
    Date,
}

impl Column {
    /// Stored column label
    pub fn label(self) -> &'static str {
        match self {
            Column::CustomerName => "Customer Name",
            Column::PhoneNumber => "Phone Number",
            Column::Gender => "Gender",
            Column::Age => "Age",
            Column::CustomerRegion => "Customer Region",
            Column::ProductCategory => "Product Category",
            Column::Tags => "Tags",
            Column::PaymentMethod => "Payment Method",
            Column::OrderStatus => "Order Status",
            Column::Date => "Date",
        }
    }

    /// Text value of a plain string column, `None` for typed columns
    fn text<'a>(self, record: &'a TransactionRecord) -> Option<&'a str> {
        match self {
            Column::CustomerName => Some(&record.customer_name),
            Column::Gender => Some(&record.gender),
            Column::CustomerRegion => Some(&record.customer_region),
            Column::ProductCategory => Some(&record.product_category),
            Column::PaymentMethod => Some(&record.payment_method),
            Column::OrderStatus => Some(&record.order_status),
            Column::PhoneNumber | Column::Age | Column::Tags | Column::Date => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Case-insensitive literal substring pattern
///
/// Records in memory are matched by a lowercase substring search, so the
/// needle never goes through a regex compiler and its length is not bounded
/// by one. [`TextPattern::as_str`] yields the regex-escaped source, which is
/// what document stores receive.
#[derive(Debug, Clone)]
pub struct TextPattern {
    folded: String,
    escaped: String,
}

impl TextPattern {
    /// Build a pattern matching `needle` anywhere, ignoring case
    pub fn literal(needle: &str) -> Self {
        Self {
            folded: needle.to_lowercase(),
            escaped: regex::escape(needle),
        }
    }

    /// Escaped regex source
    pub fn as_str(&self) -> &str {
        &self.escaped
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.folded)
    }
}

impl PartialEq for TextPattern {
    fn eq(&self, other: &Self) -> bool {
        self.escaped == other.escaped
    }
}

/// A composable condition over transaction records
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every record
    All,

    /// Every child must match
    And(Vec<Predicate>),

    /// At least one child must match
    Or(Vec<Predicate>),

    /// Column value is one of `values` (exact match)
    In { column: Column, values: Vec<String> },

    /// Column text contains the pattern, ignoring case
    ///
    /// Phone numbers are compared on their canonical string form, never on
    /// the stored representation.
    Contains { column: Column, pattern: TextPattern },

    /// Age, coerced to whole years, lies in `min..=max`
    AgeBetween { min: i64, max: i64 },

    /// Date lies within the bounds; either bound may be open
    DateRange {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

impl Predicate {
    /// Conjunction that collapses trivial shapes
    ///
    /// `All` members are dropped; an empty conjunction is `All`, a single
    /// member is returned as is.
    pub fn and(clauses: Vec<Predicate>) -> Predicate {
        let mut clauses: Vec<Predicate> = clauses
            .into_iter()
            .filter(|c| !matches!(c, Predicate::All))
            .collect();
        match clauses.len() {
            0 => Predicate::All,
            1 => clauses.remove(0),
            _ => Predicate::And(clauses),
        }
    }

    /// Whether this predicate places no constraint at all
    pub fn is_all(&self) -> bool {
        matches!(self, Predicate::All)
    }

    /// Evaluate against a record
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        match self {
            Predicate::All => true,
            Predicate::And(children) => children.iter().all(|c| c.matches(record)),
            Predicate::Or(children) => children.iter().any(|c| c.matches(record)),
            Predicate::In { column, values } => column
                .text(record)
                .is_some_and(|text| values.iter().any(|v| v == text)),
            Predicate::Contains { column, pattern } => match column {
                Column::PhoneNumber => pattern.is_match(&record.phone_number.as_text()),
                Column::Tags => record.tags.any_text(|text| pattern.is_match(text)),
                other => other.text(record).is_some_and(|t| pattern.is_match(t)),
            },
            Predicate::AgeBetween { min, max } => record
                .age
                .years()
                .is_some_and(|years| years >= *min && years <= *max),
            Predicate::DateRange { start, end } => {
                start.is_none_or(|s| record.date >= s) && end.is_none_or(|e| record.date <= e)
            }
        }
    }
}
