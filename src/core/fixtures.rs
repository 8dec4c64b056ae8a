//! Sample records shared by unit tests

use serde_json::{Value, json};

use super::record::TransactionRecord;

pub fn sample_json() -> Vec<Value> {
    vec![
        json!({
            "Transaction ID": 1,
            "Date": "2023-09-26T00:00:00Z",
            "Customer ID": "CUST-001",
            "Customer Name": "Neha Yadav",
            "Phone Number": 9_876_543_210_i64,
            "Gender": "Female",
            "Age": "45",
            "Customer Region": "South",
            "Product ID": "PROD-01",
            "Product Category": "Clothing",
            "Tags": "casual,formal",
            "Quantity": 3,
            "Discount Percentage": 10,
            "Total Amount": 1500.0,
            "Payment Method": "UPI",
            "Order Status": "Completed",
            "Employee Name": "Harsh Agarwal"
        }),
        json!({
            "Transaction ID": 2,
            "Date": "2023-03-15T00:00:00Z",
            "Customer ID": "CUST-002",
            "Customer Name": "John Doe",
            "Phone Number": "9123456789",
            "Gender": "Male",
            "Age": 25,
            "Customer Region": "North",
            "Product ID": "PROD-02",
            "Product Category": "Electronics",
            "Tags": ["smart", "wireless"],
            "Quantity": 1,
            "Discount Percentage": 0,
            "Total Amount": 2000.0,
            "Payment Method": "Credit Card",
            "Order Status": "Pending",
            "Employee Name": "Rohan Gupta"
        }),
        json!({
            "Transaction ID": 3,
            "Date": "2022-12-01T00:00:00Z",
            "Customer ID": "CUST-003",
            "Customer Name": "Johnny Walker",
            "Phone Number": 9_812_345_678_i64,
            "Gender": "Male",
            "Age": 35,
            "Customer Region": "East",
            "Product ID": "PROD-03",
            "Product Category": "Beauty",
            "Tags": "semi-casual",
            "Quantity": 5,
            "Discount Percentage": 20,
            "Total Amount": 1000.0,
            "Payment Method": "Cash",
            "Order Status": "Completed",
            "Employee Name": "Harsh Agarwal"
        }),
        json!({
            "Transaction ID": 4,
            "Date": "2023-06-10T00:00:00Z",
            "Customer ID": "CUST-004",
            "Customer Name": "Priya Sharma",
            "Phone Number": "+91 90000 11111",
            "Gender": "Female",
            "Age": 28,
            "Customer Region": "West",
            "Product ID": "PROD-04",
            "Product Category": "Clothing",
            "Tags": "formal",
            "Quantity": 2,
            "Discount Percentage": 5,
            "Total Amount": 800.0,
            "Payment Method": "UPI",
            "Order Status": "Cancelled",
            "Employee Name": "Rohan Gupta"
        }),
        json!({
            "Transaction ID": 5,
            "Date": "2023-01-20T00:00:00Z",
            "Customer ID": "CUST-005",
            "Customer Name": "Arjun Mehta",
            "Phone Number": 9_700_000_005_i64,
            "Gender": "Male",
            "Age": "unknown",
            "Customer Region": "South",
            "Product ID": "PROD-05",
            "Product Category": "Electronics",
            "Tags": "gadgets, smart",
            "Quantity": 4,
            "Discount Percentage": 15,
            "Total Amount": 4000.0,
            "Payment Method": "Debit Card",
            "Order Status": "Returned",
            "Employee Name": "Sneha Rao"
        }),
        json!({
            "Transaction ID": 6,
            "Date": "2023-08-05T00:00:00Z",
            "Customer ID": "CUST-006",
            "Customer Name": "Kavya Iyer",
            "Phone Number": 9_600_000_006_i64,
            "Gender": "Female",
            "Age": 52.0,
            "Customer Region": "North",
            "Product ID": "PROD-06",
            "Product Category": "Beauty",
            "Tags": "organic",
            "Quantity": 6,
            "Discount Percentage": 0,
            "Total Amount": 600.0,
            "Payment Method": "Wallet",
            "Order Status": "Completed",
            "Employee Name": "Sneha Rao"
        }),
    ]
}

pub fn sample_records() -> Vec<TransactionRecord> {
    sample_json()
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap())
        .collect()
}
