//! Shared fixtures for the integration tests
//!
//! The sample collection is small enough to reason about by hand:
//!
//! | id | name          | gender | age       | region  | category    | tags               | qty | total | disc |
//! |----|---------------|--------|-----------|---------|-------------|--------------------|-----|-------|------|
//! | 1  | John Doe      | Male   | 25        | North   | Electronics | smart              | 2   | 3000  | 5    |
//! | 2  | Johnny Walker | Male   | 35        | East    | Clothing    | semi-casual        | 1   | 1000  | 10   |
//! | 3  | Neha Yadav    | Female | "45"      | South   | Clothing    | casual,formal      | 3   | 500   | 20   |
//! | 4  | Priya Sharma  | Female | 45        | West    | Beauty      | [organic, formal]  | 4   | 800   | 0    |
//! | 5  | Arjun Mehta   | Male   | "unknown" | South   | Electronics | gadgets, wireless  | 5   | 4000  | 15   |
//! | 6  | Jane Smith    | Female | 35        | North   | Beauty      | skincare           | 6   | 600   | 0    |
//! | 7  | Kavya Iyer    | Female | 52.0      | Central | Clothing    | formal             | 2   | 1200  | 25   |
//! | 8  | Rahul Verma   | Male   | 30        | East    | Electronics | [portable]         | 1   | 2500  | 10   |

#![allow(dead_code)]

use axum_test::TestServer;
use retail::prelude::*;
use serde_json::{Value, json};

pub const SAMPLE_SIZE: usize = 8;

#[allow(clippy::too_many_arguments)]
fn sale(
    id: i64,
    date: &str,
    name: &str,
    phone: Value,
    gender: &str,
    age: Value,
    region: &str,
    category: &str,
    tags: Value,
    quantity: i64,
    total: f64,
    discount: f64,
    payment: &str,
    status: &str,
) -> Value {
    json!({
        "Transaction ID": id,
        "Date": date,
        "Customer ID": format!("CUST-{id:03}"),
        "Customer Name": name,
        "Phone Number": phone,
        "Gender": gender,
        "Age": age,
        "Customer Region": region,
        "Customer Type": "Returning",
        "Product ID": format!("PROD-{id:03}"),
        "Product Name": format!("{category} item"),
        "Brand": "Acme",
        "Product Category": category,
        "Tags": tags,
        "Quantity": quantity,
        "Price per Unit": total / quantity as f64,
        "Discount Percentage": discount,
        "Total Amount": total,
        "Final Amount": total * (100.0 - discount) / 100.0,
        "Payment Method": payment,
        "Order Status": status,
        "Employee Name": "Harsh Agarwal"
    })
}

pub fn sample_sales() -> Vec<Value> {
    vec![
        sale(1, "2023-03-15T10:00:00Z", "John Doe", json!(9_123_456_789_i64), "Male", json!(25), "North", "Electronics", json!("smart"), 2, 3000.0, 5.0, "UPI", "Completed"),
        sale(2, "2023-05-10T10:00:00Z", "Johnny Walker", json!("98765 01234"), "Male", json!(35), "East", "Clothing", json!("semi-casual"), 1, 1000.0, 10.0, "Cash", "Completed"),
        sale(3, "2023-09-26T10:00:00Z", "Neha Yadav", json!(9_876_543_210_i64), "Female", json!("45"), "South", "Clothing", json!("casual,formal"), 3, 500.0, 20.0, "UPI", "Pending"),
        sale(4, "2022-12-01T10:00:00Z", "Priya Sharma", json!("+91 90000 11111"), "Female", json!(45), "West", "Beauty", json!(["organic", "formal"]), 4, 800.0, 0.0, "Credit Card", "Cancelled"),
        sale(5, "2023-01-20T10:00:00Z", "Arjun Mehta", json!(9_700_000_005_i64), "Male", json!("unknown"), "South", "Electronics", json!("gadgets, wireless"), 5, 4000.0, 15.0, "Debit Card", "Returned"),
        sale(6, "2023-08-05T10:00:00Z", "Jane Smith", json!(9_600_000_006_i64), "Female", json!(35), "North", "Beauty", json!("skincare"), 6, 600.0, 0.0, "Wallet", "Completed"),
        sale(7, "2023-11-11T10:00:00Z", "Kavya Iyer", json!(9_500_000_007_i64), "Female", json!(52.0), "Central", "Clothing", json!("formal"), 2, 1200.0, 25.0, "UPI", "Completed"),
        sale(8, "2023-07-01T10:00:00Z", "Rahul Verma", json!("9400000008"), "Male", json!(30), "East", "Electronics", json!(["portable"]), 1, 2500.0, 10.0, "Cash", "Pending"),
    ]
}

pub fn sample_records() -> Vec<TransactionRecord> {
    sample_sales()
        .into_iter()
        .map(|value| serde_json::from_value(value).expect("sample record"))
        .collect()
}

pub fn sample_store() -> InMemoryTransactionStore {
    InMemoryTransactionStore::from_records(sample_records())
}

pub fn server_with(store: impl TransactionStore + 'static, config: DashboardConfig) -> TestServer {
    let app = ServerBuilder::new()
        .with_config(config)
        .with_store(store)
        .build()
        .expect("Failed to build app");

    TestServer::new(app)
}

pub fn sample_server() -> TestServer {
    server_with(sample_store(), DashboardConfig::default())
}

/// Transaction ids of a listing response, in order
pub fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|row| row["Transaction ID"].as_i64().expect("numeric id"))
        .collect()
}
