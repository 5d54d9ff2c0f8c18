//! HTTP server, request context and page rendering

pub mod context;
pub mod server;
pub mod templates;

pub use context::{Ctx, RequestContext};
pub use server::*;
pub use templates::Templates;
