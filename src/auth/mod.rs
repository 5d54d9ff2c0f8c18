//! Authentication and session management

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod session;

pub use jwt::{Claims, SessionSigner};
pub use middleware::{load_logged_in_user, LoginRequired};
pub use models::{Credentials, User};
pub use routes::router;
pub use session::Session;
