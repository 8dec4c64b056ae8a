//! Dashboard API example
//!
//! This example demonstrates:
//! - Loading configuration from YAML with environment overrides
//! - Seeding the in-memory store with sample sales
//! - Serving the four dashboard endpoints with graceful shutdown
//!
//! Run with:
//! ```text
//! RUST_LOG=retail=debug,tower_http=info cargo run --example dashboard_api -- demos/dashboard_api/dashboard.yaml
//! ```
//! Setting `MONGODB_URI` (with `--features mongodb_backend`) serves a real
//! `sales` collection instead.

use retail::prelude::*;
use tracing_subscriber::EnvFilter;

const SAMPLE_SALES: &str = include_str!("sales.json");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DashboardConfig::from_yaml_file(&path)?,
        None => DashboardConfig::default(),
    }
    .with_env_overrides()?;

    tracing::info!(
        environment = ?config.environment,
        backend = ?config.storage.backend,
        cors_origin = %config.cors_origin,
        "Starting retail dashboard API"
    );

    let builder = ServerBuilder::new().with_config(config.clone());
    let builder = if config.storage.backend == StorageBackend::InMemory
        && config.storage.seed_file.is_none()
    {
        builder.with_store(InMemoryTransactionStore::from_json_str(SAMPLE_SALES)?)
    } else {
        builder.with_configured_store().await?
    };

    println!("\n🌐 Server running on http://{}", config.socket_addr()?);
    println!("\n📚 Endpoints:");
    println!("   GET /api/transactions                    - Filtered, paginated listing");
    println!("   GET /api/transactions/filter-options     - Dropdown values");
    println!("   GET /api/transactions/{{id}}               - Single transaction");
    println!("   GET /api/stats/dashboard                 - Metric cards");
    println!("\n💡 Try:");
    println!("   curl 'http://localhost:{}/api/transactions?gender[]=Female&sortBy=Quantity&sortOrder=asc'", config.server.port);
    println!(
        "   curl 'http://localhost:{}/api/stats/dashboard?ageRange={{\"min\":20,\"max\":40}}'\n",
        config.server.port
    );

    builder.serve_configured().await
}
