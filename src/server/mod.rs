//! HTTP server: routes, handlers and the builder that wires them to a store

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_api_routes;
