//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};

use crate::AppState;

mod deploys;
mod healing;
mod health;
mod nodes;
mod pools;
mod teams;

pub use health::*;

/// Where a successful node removal sends the browser
pub const POOL_LIST_PATH: &str = "/api/v1/pools";

/// Public API routes (no session required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
}

/// Protected API routes (orchestrator token required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .nest("/pools", pools::routes())
        .nest("/nodes", nodes::routes())
        .nest("/deploys", deploys::routes())
        .nest("/healing", healing::routes())
        .nest("/teams", teams::routes())
}

/// Create the full API router (public + protected; useful for tests)
pub fn routes() -> Router<AppState> {
    public_routes().merge(protected_routes())
}
