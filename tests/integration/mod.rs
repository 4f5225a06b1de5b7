//! Integration tests for the tsuru dashboard
//!
//! These tests drive the full API router with the session middleware
//! against a mocked tsuru API.

mod deploys_tests;
mod pools_tests;
