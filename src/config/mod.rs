//! Configuration management for Blogpad

pub mod loader;
mod schema;

pub use loader::{ensure_instance_path, load_config};
pub use schema::*;
