//! Business logic services

pub mod deploys;
pub mod diff;
pub mod healing;
pub mod pools;
pub mod tsuru;

pub use tsuru::{RemoveNodeRequest, SessionToken, TsuruClient, TsuruError};
