//! Filter parameters and the filter compiler
//!
//! Translation happens in two steps:
//!
//! 1. [`RawFilterParams`] collects the query-string values exactly as the
//!    dashboard sends them (multi-selects as repeated or `key[]` pairs, the
//!    age and date ranges as JSON strings).
//! 2. [`FilterSpec::parse`] normalizes them, and [`FilterCompiler::compile`]
//!    turns the spec into a single [`Predicate`].
//!
//! Both the listing and the stats endpoint go through
//! [`FilterCompiler::from_params`], so identical query strings always produce
//! identical predicates.
//!
//! # Example
//!
//! ```rust,ignore
//! let raw = RawFilterParams::from_pairs([
//!     ("search", "john"),
//!     ("gender[]", "Male"),
//!     ("ageRange", r#"{"min":30,"max":40}"#),
//! ]);
//! let predicate = FilterCompiler::from_params(&raw, RangePolicy::Lenient)?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DashboardError;
use super::predicate::{Column, Predicate, TextPattern};
use super::record::parse_timestamp;

/// Multi-select value meaning "no constraint on this dimension"
const ALL_SENTINEL: &str = "All";

pub const DEFAULT_AGE_MIN: i64 = 0;
pub const DEFAULT_AGE_MAX: i64 = 150;

/// What to do with an `ageRange`/`dateRange` value that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Drop the malformed range and apply no constraint on that dimension
    #[default]
    Lenient,
    /// Reject the request with a client error
    Strict,
}

// =============================================================================
// Raw parameters
// =============================================================================

/// Filter parameters as received on the query string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFilterParams {
    pub search: Option<String>,
    pub customer_region: Vec<String>,
    pub gender: Vec<String>,
    pub product_category: Vec<String>,
    pub tags: Vec<String>,
    pub payment_method: Vec<String>,
    pub order_status: Vec<String>,
    /// JSON object `{min, max}`
    pub age_range: Option<String>,
    /// JSON object `{start, end}`
    pub date_range: Option<String>,
}

impl RawFilterParams {
    /// Collect filter parameters from query pairs, ignoring unrelated keys
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            params.absorb(key.as_ref(), value.as_ref());
        }
        params
    }

    /// Record one query pair
    ///
    /// Multi-select keys accept both `key=v` and the `key[]=v` array form and
    /// accumulate across repeats. Returns `false` for keys that are not
    /// filter parameters.
    pub fn absorb(&mut self, key: &str, value: &str) -> bool {
        let key = key.strip_suffix("[]").unwrap_or(key);
        let target = match key {
            "search" => {
                self.search = Some(value.to_string());
                return true;
            }
            "ageRange" => {
                self.age_range = Some(value.to_string());
                return true;
            }
            "dateRange" => {
                self.date_range = Some(value.to_string());
                return true;
            }
            "customerRegion" => &mut self.customer_region,
            "gender" => &mut self.gender,
            "productCategory" => &mut self.product_category,
            "tags" => &mut self.tags,
            "paymentMethod" => &mut self.payment_method,
            "orderStatus" => &mut self.order_status,
            _ => return false,
        };
        target.push(value.to_string());
        true
    }
}

// =============================================================================
// Normalized filter spec
// =============================================================================

/// Inclusive age bounds in whole years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    pub min: i64,
    pub max: i64,
}

impl Default for AgeRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_AGE_MIN,
            max: DEFAULT_AGE_MAX,
        }
    }
}

/// Date bounds; each side is independent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Normalized, request-scoped filter selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Trimmed search text, `None` when blank
    pub search: Option<String>,
    pub customer_region: Vec<String>,
    pub gender: Vec<String>,
    pub product_category: Vec<String>,
    pub tags: Vec<String>,
    pub payment_method: Vec<String>,
    pub order_status: Vec<String>,
    /// `None` when no (usable) age range was sent
    pub age_range: Option<AgeRange>,
    pub date_range: DateRange,
}

impl FilterSpec {
    /// Normalize raw parameters
    ///
    /// With [`RangePolicy::Lenient`] this never fails: a malformed range is
    /// dropped. With [`RangePolicy::Strict`] it is reported as
    /// [`DashboardError::InvalidRange`].
    pub fn parse(raw: &RawFilterParams, policy: RangePolicy) -> Result<Self, DashboardError> {
        let age_range = match raw.age_range.as_deref().map(parse_age_range) {
            None => None,
            Some(Ok(range)) => Some(range),
            Some(Err(message)) => degrade(policy, "ageRange", message)?,
        };

        let date_range = match raw.date_range.as_deref().map(parse_date_range) {
            None => DateRange::default(),
            Some(Ok(range)) => range,
            Some(Err(message)) => degrade(policy, "dateRange", message)?.unwrap_or_default(),
        };

        Ok(Self {
            search: raw
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            customer_region: normalize_set(&raw.customer_region),
            gender: normalize_set(&raw.gender),
            product_category: normalize_set(&raw.product_category),
            tags: normalize_set(&raw.tags),
            payment_method: normalize_set(&raw.payment_method),
            order_status: normalize_set(&raw.order_status),
            age_range,
            date_range,
        })
    }
}

fn degrade<T>(
    policy: RangePolicy,
    parameter: &str,
    message: String,
) -> Result<Option<T>, DashboardError> {
    match policy {
        RangePolicy::Lenient => {
            tracing::debug!(parameter, %message, "ignoring malformed range parameter");
            Ok(None)
        }
        RangePolicy::Strict => Err(DashboardError::InvalidRange {
            parameter: parameter.to_string(),
            message,
        }),
    }
}

/// Trim, drop blanks and the `All` sentinel, de-duplicate keeping order
fn normalize_set(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values.iter().map(|v| v.trim()) {
        if value.is_empty() || value == ALL_SENTINEL || out.iter().any(|v| v == value) {
            continue;
        }
        out.push(value.to_string());
    }
    out
}

fn parse_range_object(raw: &str) -> Result<serde_json::Map<String, Value>, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {other}")),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_age_range(raw: &str) -> Result<AgeRange, String> {
    let map = parse_range_object(raw)?;
    let bound = |key: &str, default: i64| map.get(key).and_then(age_bound).unwrap_or(default);
    Ok(AgeRange {
        min: bound("min", DEFAULT_AGE_MIN),
        max: bound("max", DEFAULT_AGE_MAX),
    })
}

fn age_bound(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_date_range(raw: &str) -> Result<DateRange, String> {
    let map = parse_range_object(raw)?;
    let bound = |key: &str| match map.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => parse_timestamp(s),
        _ => None,
    };
    Ok(DateRange {
        start: bound("start"),
        end: bound("end"),
    })
}

// =============================================================================
// Compiler
// =============================================================================

/// Compiles a [`FilterSpec`] into a [`Predicate`]
pub struct FilterCompiler;

impl FilterCompiler {
    /// Parse raw parameters and compile them in one step
    ///
    /// This is the single entry point used by every endpoint that filters.
    pub fn from_params(
        raw: &RawFilterParams,
        policy: RangePolicy,
    ) -> Result<Predicate, DashboardError> {
        let spec = FilterSpec::parse(raw, policy)?;
        let predicate = Self::compile(&spec);
        tracing::debug!(?predicate, "compiled filter predicate");
        Ok(predicate)
    }

    /// Build the predicate for a normalized spec
    ///
    /// The result is a flat conjunction. The search disjunction and the age
    /// clause are separate members of that conjunction, so neither can absorb
    /// the other. A spec with nothing selected compiles to [`Predicate::All`].
    pub fn compile(spec: &FilterSpec) -> Predicate {
        let mut clauses = Vec::new();

        if let Some(search) = &spec.search {
            let pattern = TextPattern::literal(search);
            clauses.push(Predicate::Or(vec![
                Predicate::Contains {
                    column: Column::CustomerName,
                    pattern: pattern.clone(),
                },
                Predicate::Contains {
                    column: Column::PhoneNumber,
                    pattern,
                },
            ]));
        }

        let categorical = [
            (Column::CustomerRegion, &spec.customer_region),
            (Column::Gender, &spec.gender),
            (Column::ProductCategory, &spec.product_category),
            (Column::PaymentMethod, &spec.payment_method),
            (Column::OrderStatus, &spec.order_status),
        ];
        for (column, values) in categorical {
            if !values.is_empty() {
                clauses.push(Predicate::In {
                    column,
                    values: values.clone(),
                });
            }
        }

        if !spec.tags.is_empty() {
            clauses.push(Predicate::Or(
                spec.tags
                    .iter()
                    .map(|tag| Predicate::Contains {
                        column: Column::Tags,
                        pattern: TextPattern::literal(tag),
                    })
                    .collect(),
            ));
        }

        if let Some(AgeRange { min, max }) = spec.age_range {
            clauses.push(Predicate::AgeBetween { min, max });
        }

        if !spec.date_range.is_open() {
            clauses.push(Predicate::DateRange {
                start: spec.date_range.start,
                end: spec.date_range.end,
            });
        }

        Predicate::and(clauses)
    }
}
