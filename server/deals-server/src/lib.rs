//! Deals Server - task board web application
//!
//! This library provides the core functionality of the Deals HTTP
//! server: template-rendered pages for creating and browsing tasks,
//! media uploads and a JSON health endpoint.

pub mod error;
pub mod forms;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod templates;
pub mod validation;

// Re-export commonly used types
pub use error::*;
pub use server::{DealsServer, ServerConfig};

use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Create the main application router with all routes and middleware
pub fn create_app(server: DealsServer) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .nest_service(routes::paths::MEDIA, ServeDir::new(server.media.root()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(middleware::request_timing_middleware))
                .layer(DefaultBodyLimit::max(server.config.max_upload_bytes)),
        )
        .with_state(server)
}
