//! tsuru dashboard library
//!
//! Admin dashboard backend for a tsuru PaaS: pool and node overviews, deploy
//! history and charts, healing events, node removal and team creation. All
//! data comes from the tsuru API using the caller's own token.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use middleware::session_middleware;
pub use services::{SessionToken, TsuruClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// tsuru API client
    pub tsuru: Arc<TsuruClient>,
}

impl AppState {
    /// Build the state, creating the upstream client from the configuration
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let tsuru = Arc::new(TsuruClient::new(&config.tsuru)?);
        Ok(Self { config, tsuru })
    }
}
