pub mod config;
pub mod error;
pub mod render;
pub mod server;

pub use crate::config::ShowcaseConfig;
pub use crate::error::{ShowcaseError, ShowcaseResult};
pub use crate::server::Server;
