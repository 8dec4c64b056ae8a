//! End-to-end tests of the dashboard HTTP API
//!
//! These tests drive the full router (query extraction, filter compilation,
//! execution, response envelopes) against the in-memory store.

mod support;

use anyhow::{Result, anyhow};
use retail::prelude::*;
use serde_json::{Value, json};
use support::*;

// =============================================================================
// Failing store
// =============================================================================

struct UnavailableStore;

#[async_trait]
impl TransactionStore for UnavailableStore {
    fn backend_name(&self) -> &'static str {
        "unavailable"
    }

    async fn find(&self, _: &Predicate, _: Sort, _: PageWindow) -> Result<Vec<TransactionSummary>> {
        Err(anyhow!("connection refused"))
    }

    async fn count(&self, _: &Predicate) -> Result<usize> {
        Err(anyhow!("connection refused"))
    }

    async fn aggregate(&self, _: &Predicate) -> Result<Totals> {
        Err(anyhow!("connection refused"))
    }

    async fn find_by_id(&self, _: i64) -> Result<Option<TransactionRecord>> {
        Err(anyhow!("connection refused"))
    }

    async fn distinct(&self, _: Column) -> Result<Vec<String>> {
        Err(anyhow!("connection refused"))
    }
}

fn development() -> DashboardConfig {
    DashboardConfig {
        environment: Environment::Development,
        ..DashboardConfig::default()
    }
}

// =============================================================================
// Listing
// =============================================================================

mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_listing_envelope() {
        let server = sample_server();

        let response = server.get("/api/transactions").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Transactions retrieved successfully");
        assert_eq!(body["totalCount"], SAMPLE_SIZE);
        assert_eq!(body["page"], 1);
        assert_eq!(body["totalPages"], 1);
        assert_eq!(
            body["pagination"],
            json!({
                "page": 1,
                "limit": 10,
                "total": SAMPLE_SIZE,
                "totalPages": 1,
                "hasNext": false,
                "hasPrev": false
            })
        );
    }

    #[tokio::test]
    async fn test_listing_defaults_to_date_descending() {
        let server = sample_server();

        let body: Value = server.get("/api/transactions").await.json();
        assert_eq!(ids(&body), vec![7, 3, 6, 8, 2, 1, 5, 4]);
    }

    #[tokio::test]
    async fn test_listing_rows_carry_only_table_columns() {
        let server = sample_server();

        let body: Value = server.get("/api/transactions").await.json();
        let row = body["data"][0].as_object().unwrap();

        assert_eq!(row.len(), 13);
        assert!(row.contains_key("Employee Name"));
        assert!(!row.contains_key("Tags"));
        assert!(!row.contains_key("Discount Percentage"));
    }

    #[tokio::test]
    async fn test_listing_sort_by_column_label() {
        let server = sample_server();

        let body: Value = server
            .get("/api/transactions")
            .add_query_param("sortBy", "Quantity")
            .add_query_param("sortOrder", "asc")
            .await
            .json();
        assert_eq!(ids(&body), vec![2, 8, 1, 7, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_listing_sort_by_api_name() {
        let server = sample_server();

        let body: Value = server
            .get("/api/transactions")
            .add_query_param("sortBy", "customerName")
            .add_query_param("sortOrder", "ASC")
            .await
            .json();
        assert_eq!(ids(&body), vec![5, 6, 1, 2, 7, 3, 4, 8]);
    }

    #[tokio::test]
    async fn test_listing_pagination() {
        let server = sample_server();

        let response = server
            .get("/api/transactions")
            .add_query_param("page", "3")
            .add_query_param("limit", "3")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(ids(&body), vec![5, 4]);
        assert_eq!(body["pagination"]["totalPages"], 3);
        assert_eq!(body["pagination"]["hasNext"], false);
        assert_eq!(body["pagination"]["hasPrev"], true);
    }

    #[tokio::test]
    async fn test_listing_page_beyond_end_is_empty() {
        let server = sample_server();

        let body: Value = server
            .get("/api/transactions")
            .add_query_param("page", "9")
            .await
            .json();
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["totalCount"], SAMPLE_SIZE);
    }

    #[tokio::test]
    async fn test_listing_limit_is_clamped() {
        let server = sample_server();

        let body: Value = server
            .get("/api/transactions")
            .add_query_param("limit", "5000")
            .await
            .json();
        assert_eq!(body["pagination"]["limit"], 100);

        let body: Value = server
            .get("/api/transactions")
            .add_query_param("limit", "0")
            .add_query_param("page", "-2")
            .await
            .json();
        assert_eq!(body["pagination"]["limit"], 1);
        assert_eq!(body["pagination"]["page"], 1);
    }

    #[tokio::test]
    async fn test_listing_bracket_and_repeated_keys() {
        let server = sample_server();

        let bracket: Value = server
            .get("/api/transactions")
            .add_query_param("customerRegion[]", "North")
            .add_query_param("customerRegion[]", "South")
            .await
            .json();
        let repeated: Value = server
            .get("/api/transactions")
            .add_query_param("customerRegion", "North")
            .add_query_param("customerRegion", "South")
            .await
            .json();

        assert_eq!(bracket["totalCount"], 4);
        assert_eq!(ids(&bracket), ids(&repeated));
    }

    #[tokio::test]
    async fn test_listing_all_sentinel_means_no_constraint() {
        let server = sample_server();

        let body: Value = server
            .get("/api/transactions")
            .add_query_param("gender", "All")
            .await
            .json();
        assert_eq!(body["totalCount"], SAMPLE_SIZE);
    }

    #[tokio::test]
    async fn test_listing_search_is_literal() {
        let server = sample_server();

        let body: Value = server
            .get("/api/transactions")
            .add_query_param("search", ".*")
            .await
            .json();
        assert_eq!(body["totalCount"], 0);
    }

    #[tokio::test]
    async fn test_listing_accepts_very_long_search_and_tags() {
        let server = sample_server();
        let long = "k".repeat(50_000);

        let response = server
            .get("/api/transactions")
            .add_query_param("search", &long)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["totalCount"], 0);

        let response = server
            .get("/api/transactions")
            .add_query_param("tags[]", &long)
            .add_query_param("tags[]", "formal")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(ids(&body), vec![7, 3, 4]);
    }

    #[tokio::test]
    async fn test_listing_date_range() {
        let server = sample_server();

        let body: Value = server
            .get("/api/transactions")
            .add_query_param("dateRange", r#"{"start":"2023-01-01","end":"2023-06-30"}"#)
            .await
            .json();
        assert_eq!(ids(&body), vec![2, 1, 5]);
    }
}

// =============================================================================
// Stats
// =============================================================================

mod stats_tests {
    use super::*;

    #[tokio::test]
    async fn test_stats_over_everything() {
        let server = sample_server();

        let response = server.get("/api/stats/dashboard").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(
            body["data"],
            json!({
                "totalTransactions": SAMPLE_SIZE,
                "totalUnitsSold": 24,
                "totalAmount": 13600.0,
                "totalDiscount": 1500.0
            })
        );
    }

    #[tokio::test]
    async fn test_stats_for_empty_match_are_zero() {
        let server = sample_server();

        let body: Value = server
            .get("/api/stats/dashboard")
            .add_query_param("search", "nobody-by-this-name")
            .await
            .json();
        assert_eq!(body["data"]["totalTransactions"], 0);
        assert_eq!(body["data"]["totalUnitsSold"], 0);
        assert_eq!(body["data"]["totalAmount"], 0.0);
        assert_eq!(body["data"]["totalDiscount"], 0.0);
    }

    #[tokio::test]
    async fn test_stats_accept_very_long_search() {
        let server = sample_server();

        let response = server
            .get("/api/stats/dashboard")
            .add_query_param("search", "k".repeat(50_000))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["totalTransactions"], 0);
        assert_eq!(body["data"]["totalAmount"], 0.0);
    }

    #[tokio::test]
    async fn test_stats_ignore_pagination_and_sort_keys() {
        let server = sample_server();

        let body: Value = server
            .get("/api/stats/dashboard")
            .add_query_param("page", "4")
            .add_query_param("sortBy", "Quantity")
            .await
            .json();
        assert_eq!(body["data"]["totalTransactions"], SAMPLE_SIZE);
    }
}

// =============================================================================
// Filter options
// =============================================================================

mod filter_options_tests {
    use super::*;

    #[tokio::test]
    async fn test_filter_options() {
        let server = sample_server();

        let response = server.get("/api/transactions/filter-options").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["message"], "Filter options retrieved successfully");
        assert_eq!(
            body["data"],
            json!({
                "regions": ["Central", "East", "North", "South", "West"],
                "genders": ["Female", "Male"],
                "categories": ["Beauty", "Clothing", "Electronics"],
                "paymentMethods": ["Cash", "Credit Card", "Debit Card", "UPI", "Wallet"],
                "orderStatuses": ["Cancelled", "Completed", "Pending", "Returned"],
                "tags": [
                    "casual", "formal", "gadgets", "organic", "portable",
                    "semi-casual", "skincare", "smart", "wireless"
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_filter_options_ignore_filters() {
        let server = sample_server();

        let body: Value = server
            .get("/api/transactions/filter-options")
            .add_query_param("gender", "Female")
            .await
            .json();
        assert_eq!(body["data"]["genders"], json!(["Female", "Male"]));
    }
}

// =============================================================================
// Single record
// =============================================================================

mod single_record_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_transaction_returns_full_record() {
        let server = sample_server();

        let response = server.get("/api/transactions/3").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let record = &body["data"];
        assert_eq!(body["message"], "Transaction retrieved successfully");
        assert_eq!(record["Customer Name"], "Neha Yadav");
        assert_eq!(record["Phone Number"], "9876543210");
        assert_eq!(record["Age"], 45);
        assert_eq!(record["Tags"], json!(["casual", "formal"]));
        assert_eq!(record["Discount Percentage"], 20.0);
        assert_eq!(record["Brand"], "Acme");
    }

    #[tokio::test]
    async fn test_get_transaction_not_found() {
        let server = sample_server();

        let response = server.get("/api/transactions/999").await;
        response.assert_status_not_found();

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({"success": false, "message": "Transaction not found"})
        );
    }

    #[tokio::test]
    async fn test_get_transaction_non_numeric_id_is_not_found() {
        let server = sample_server();

        let response = server.get("/api/transactions/abc").await;
        response.assert_status_not_found();

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({"success": false, "message": "Transaction not found"})
        );
    }
}

// =============================================================================
// Error handling
// =============================================================================

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_store_failure_hides_detail_in_production() {
        let server = server_with(UnavailableStore, DashboardConfig::default());

        let response = server.get("/api/transactions").await;
        assert_eq!(response.status_code().as_u16(), 500);

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({"success": false, "message": "Failed to fetch transactions"})
        );
    }

    #[tokio::test]
    async fn test_store_failure_shows_detail_in_development() {
        let server = server_with(UnavailableStore, development());

        let body: Value = server.get("/api/stats/dashboard").await.json();
        assert_eq!(body["message"], "Failed to load dashboard stats.");
        assert_eq!(
            body["error"],
            "unavailable query error: connection refused"
        );
    }

    #[tokio::test]
    async fn test_every_endpoint_reports_its_own_failure() {
        let server = server_with(UnavailableStore, DashboardConfig::default());

        let cases = [
            ("/api/transactions", "Failed to fetch transactions"),
            ("/api/transactions/filter-options", "Failed to fetch filter options"),
            ("/api/transactions/1", "Failed to fetch transaction"),
            ("/api/stats/dashboard", "Failed to load dashboard stats."),
        ];

        for (path, message) in cases {
            let response = server.get(path).await;
            assert_eq!(response.status_code().as_u16(), 500, "{path}");

            let body: Value = response.json();
            assert_eq!(body["message"], message, "{path}");
            assert!(body.get("error").is_none(), "{path}");
        }
    }

    #[tokio::test]
    async fn test_malformed_range_is_ignored_by_default() {
        let server = sample_server();

        let body: Value = server
            .get("/api/transactions")
            .add_query_param("ageRange", "not json")
            .await
            .json();
        assert_eq!(body["totalCount"], SAMPLE_SIZE);
    }

    #[tokio::test]
    async fn test_malformed_range_is_rejected_under_strict_policy() {
        let config = DashboardConfig {
            range_policy: RangePolicy::Strict,
            ..DashboardConfig::default()
        };
        let server = server_with(sample_store(), config);

        for path in ["/api/transactions", "/api/stats/dashboard"] {
            let response = server
                .get(path)
                .add_query_param("dateRange", "{broken")
                .await;
            response.assert_status_bad_request();

            let body: Value = response.json();
            assert_eq!(body["success"], false);
            assert!(
                body["message"].as_str().unwrap().contains("dateRange"),
                "{path}"
            );
        }
    }
}
