//! HTTP handlers for the dashboard endpoints
//!
//! Query strings are extracted as ordered pairs rather than a struct, so that
//! repeated keys (`gender=Male&gender=Female`) and the bracket form
//! (`gender[]=Male`) both arrive as sets. The listing and stats handlers
//! compile the filter exactly once per request through [`FilterCompiler`].

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::core::error::{ApiError, DashboardError};
use crate::core::executor::{DashboardStats, FilterOptions, QueryExecutor};
use crate::core::filter::{FilterCompiler, RawFilterParams};
use crate::core::query::{ListingParams, PageWindow, PaginationMeta};
use crate::core::record::{TransactionRecord, TransactionSummary};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub executor: QueryExecutor,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    /// Turn a failed operation into a response, logging server errors
    fn fail(&self, err: DashboardError, fallback: &str) -> ApiError {
        if err.is_client_error() {
            tracing::debug!(error = %err, code = err.error_code(), "Rejected request");
        } else {
            tracing::error!(error = %err, code = err.error_code(), "{}", fallback);
        }
        ApiError::from_error(&err, fallback, self.config.environment.expose_error_details())
    }
}

/// Response for the listing endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub success: bool,
    pub data: Vec<TransactionSummary>,
    pub total_count: usize,
    pub page: usize,
    pub total_pages: usize,
    pub pagination: PaginationMeta,
    pub message: &'static str,
}

/// Envelope for the single-object endpoints
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T> DataResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    fn with_message(data: T, message: &'static str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message),
        }
    }
}

/// List transactions
///
/// GET /api/transactions?page=1&limit=10&sortBy=Date&sortOrder=desc&search=...
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    const FAILURE: &str = "Failed to fetch transactions";

    let params = ListingParams::from_pairs(pairs);
    let predicate = FilterCompiler::from_params(&params.filters, state.config.range_policy)
        .map_err(|e| state.fail(e, FAILURE))?;

    let pagination = &state.config.pagination;
    let window = PageWindow::new(
        params.page(),
        params.limit(pagination.default_limit, pagination.max_limit),
    );

    let page = state
        .executor
        .execute(&predicate, params.sort(), window)
        .await
        .map_err(|e| state.fail(e, FAILURE))?;

    Ok(Json(ListingResponse {
        success: true,
        data: page.records,
        total_count: page.pagination.total,
        page: page.pagination.page,
        total_pages: page.pagination.total_pages,
        pagination: page.pagination,
        message: "Transactions retrieved successfully",
    })
    .into_response())
}

/// Dashboard metric cards for the current filters
///
/// GET /api/stats/dashboard?gender=Female&ageRange={"min":20,"max":30}
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<DataResponse<DashboardStats>>, ApiError> {
    const FAILURE: &str = "Failed to load dashboard stats.";

    let raw = RawFilterParams::from_pairs(pairs);
    let predicate = FilterCompiler::from_params(&raw, state.config.range_policy)
        .map_err(|e| state.fail(e, FAILURE))?;

    let stats = state
        .executor
        .stats(&predicate)
        .await
        .map_err(|e| state.fail(e, FAILURE))?;

    Ok(Json(DataResponse::ok(stats)))
}

/// Distinct values for every filter dropdown
///
/// GET /api/transactions/filter-options
pub async fn filter_options(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<FilterOptions>>, ApiError> {
    let options = state
        .executor
        .filter_options()
        .await
        .map_err(|e| state.fail(e, "Failed to fetch filter options"))?;

    Ok(Json(DataResponse::with_message(
        options,
        "Filter options retrieved successfully",
    )))
}

/// Full record by transaction id
///
/// GET /api/transactions/{id}
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DataResponse<TransactionRecord>>, ApiError> {
    const FAILURE: &str = "Failed to fetch transaction";

    let id: i64 = raw_id.trim().parse().map_err(|_| {
        state.fail(DashboardError::NotFound { id: raw_id.clone() }, FAILURE)
    })?;

    let record = state
        .executor
        .find_by_id(id)
        .await
        .map_err(|e| state.fail(e, FAILURE))?;

    Ok(Json(DataResponse::with_message(
        record,
        "Transaction retrieved successfully",
    )))
}
