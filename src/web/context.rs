//! Request-scoped context

use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::auth::{Session, User};
use crate::db::RequestDb;
use crate::error::Error;

/// Per-request state: the cached database connection, the logged in user
/// and the session that will be written back to the cookie.
#[derive(Debug)]
pub struct RequestContext {
    db: RequestDb,
    user: Option<User>,
    session: Mutex<Session>,
}

impl RequestContext {
    pub fn new(db: RequestDb, session: Session, user: Option<User>) -> Self {
        Self {
            db,
            user,
            session: Mutex::new(session),
        }
    }

    pub fn db(&self) -> &RequestDb {
        &self.db
    }

    /// User loaded from the session, if logged in
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    fn session_mut(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a fresh session for the user
    pub fn login(&self, user_id: i64) {
        let mut session = self.session_mut();
        session.clear();
        session.set_user_id(user_id);
    }

    pub fn logout(&self) {
        self.session_mut().clear();
    }

    pub fn flash(&self, message: impl Into<String>) {
        self.session_mut().flash(message);
    }

    pub fn take_flashes(&self) -> Vec<String> {
        self.session_mut().take_flashes()
    }

    /// Current session state
    pub fn session(&self) -> Session {
        self.session_mut().clone()
    }
}

/// Extractor for the request context installed by the session middleware
pub struct Ctx(pub Arc<RequestContext>);

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<RequestContext>>()
            .cloned()
            .map(Ctx)
            .ok_or_else(|| Error::Other("request context missing".to_string()))
    }
}
