//! Route table of the dashboard API

use super::handlers::{AppState, dashboard_stats, filter_options, get_transaction, list_transactions};
use axum::{Router, routing::get};

/// Build the dashboard routes
///
/// - GET /api/transactions - Filtered, sorted, paginated listing
/// - GET /api/transactions/filter-options - Dropdown values
/// - GET /api/transactions/{id} - Single record
/// - GET /api/stats/dashboard - Metric cards for the current filters
///
/// The static `filter-options` segment takes precedence over `{id}`.
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/transactions", get(list_transactions))
        .route("/api/transactions/filter-options", get(filter_options))
        .route("/api/transactions/{id}", get(get_transaction))
        .route("/api/stats/dashboard", get(dashboard_stats))
        .with_state(state)
}
