//! Blog posts

pub mod models;
pub mod routes;

pub use models::{get_post, Post, PostForm};
pub use routes::router;
