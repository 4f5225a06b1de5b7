//! Data models

mod deploy;
mod healing;
mod node;
mod team;

pub use deploy::*;
pub use healing::*;
pub use node::*;
pub use team::*;
