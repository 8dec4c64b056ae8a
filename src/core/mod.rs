//! Core module: records, predicates, filter compilation and query execution

pub mod error;
pub mod executor;
pub mod filter;
pub mod predicate;
pub mod query;
pub mod record;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{ApiError, ConfigError, DashboardError, DashboardResult, StorageError};
pub use executor::{DashboardStats, FilterOptions, Page, QueryExecutor};
pub use filter::{FilterCompiler, FilterSpec, RangePolicy, RawFilterParams};
pub use predicate::{Column, Predicate, TextPattern};
pub use query::{ListingParams, PageWindow, PaginationMeta, Sort, SortKey, SortOrder};
pub use record::{Age, PhoneNumber, Tags, TransactionRecord, TransactionSummary};
pub use store::{Totals, TransactionStore};
