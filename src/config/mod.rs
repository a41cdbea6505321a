//! Configuration management

pub mod loader;
pub mod schema;

pub use loader::{default_config_content, load_config, load_config_from_path};
pub use schema::*;
