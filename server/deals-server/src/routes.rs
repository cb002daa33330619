pub mod paths;

use axum::{
    routing::get,
    Router,
};

use crate::{
    handlers::{health, pages},
    server::DealsServer,
};

/// Create page routes
pub fn page_routes() -> Router<DealsServer> {
    Router::new()
        .route(
            paths::deals::HOME,
            get(pages::home).post(pages::create_task),
        )
        .route(paths::deals::TASK_ADDED, get(pages::task_added))
        .route(paths::deals::TASK_LIST, get(pages::task_list))
        .route(paths::deals::TASK_DETAIL, get(pages::task_detail))
}

/// Create health check routes
pub fn health_routes() -> Router<DealsServer> {
    Router::new().route(paths::health::HEALTH, get(health::health_check))
}

/// Create all application routes
pub fn create_routes() -> Router<DealsServer> {
    Router::new()
        // Health check routes
        .merge(health_routes())
        // Page routes
        .merge(page_routes())
}
