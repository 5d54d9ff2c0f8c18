//! Blogpad - a small multi-user blog
//!
//! This is the library interface for Blogpad: the application factory,
//! configuration, database access and the auth and blog views.

pub mod auth;
pub mod blog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod web;

pub use config::Config;
pub use error::Error;
pub use web::{create_app, run_server, serve};
