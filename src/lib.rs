//! # Retail Dashboard
//!
//! REST backend for a retail sales dashboard: a filtered, sorted and
//! paginated transaction listing, aggregate metric cards over the same
//! filters, dropdown values for the filter panel and single-record lookup.
//!
//! ## Features
//!
//! - **One filter, two queries**: UI parameters compile once into a
//!   [`Predicate`](core::Predicate) shared by the listing and the stats
//!   endpoint, so both always count the same records
//! - **Typed accessors**: phone numbers, ages and tags stored with mixed
//!   types are coerced to one canonical form for filtering and display
//! - **Pluggable stores**: an in-memory store for tests and demos, MongoDB
//!   behind the `mongodb_backend` feature
//! - **Configuration-Based**: YAML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use retail::prelude::*;
//!
//! let store = InMemoryTransactionStore::from_json_file("sales.json")?;
//!
//! ServerBuilder::new()
//!     .with_config(DashboardConfig::default().with_env_overrides()?)
//!     .with_store(store)
//!     .serve("0.0.0.0:5000")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, Column, DashboardError, DashboardResult, DashboardStats, FilterCompiler,
        FilterOptions, FilterSpec, ListingParams, Page, PageWindow, PaginationMeta, Predicate,
        QueryExecutor, RangePolicy, RawFilterParams, Sort, SortKey, SortOrder, TextPattern,
        Totals, TransactionRecord, TransactionStore, TransactionSummary,
    };

    // === Configuration ===
    pub use crate::config::{DashboardConfig, Environment, StorageBackend};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, build_api_routes};

    // === Storage ===
    pub use crate::storage::InMemoryTransactionStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoTransactionStore;

    // === External re-exports ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use axum::Router;
}
