//! Middleware components
//!
//! This module contains middleware for:
//! - Orchestrator session extraction
//! - Security and cache headers

pub mod security_headers;
pub mod session;

pub use security_headers::security_headers_middleware;
pub use session::{session_middleware, TOKEN_COOKIE};
