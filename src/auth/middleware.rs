//! Authentication middleware and extractors

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::auth::models::User;
use crate::auth::session::Session;
use crate::db::RequestDb;
use crate::web::{RequestContext, SharedState};

/// Load the logged in user before every request
///
/// Reads the session cookie, resolves the user id it carries and stores
/// everything in a [`RequestContext`]. After the handler ran, the request's
/// connection is closed and a changed session is written back as a cookie.
pub async fn load_logged_in_user(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_name = &state.config.session.cookie_name;
    let session = Session::from_headers(req.headers(), cookie_name, &state.signer);
    let db = RequestDb::new(state.database.clone());

    let user = match session.user_id() {
        Some(user_id) => match db.with(|conn| User::find_by_id(conn, user_id)) {
            Ok(user) => user,
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    let ctx = Arc::new(RequestContext::new(db, session, user));
    req.extensions_mut().insert(Arc::clone(&ctx));

    let mut response = next.run(req).await;

    ctx.db().close();

    match ctx.session().set_cookie_header(cookie_name, &state.signer) {
        Ok(Some(cookie)) => {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
        Ok(None) => {}
        Err(e) => tracing::error!("Failed to write session cookie: {}", e),
    }

    response
}

/// Extractor for views that need a logged in user
///
/// Anonymous requests are redirected to the login page before any other
/// extractor or check runs.
pub struct LoginRequired(pub User);

impl<S> FromRequestParts<S> for LoginRequired
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Arc<RequestContext>>()
            .and_then(|ctx| ctx.user().cloned())
            .map(LoginRequired)
            .ok_or_else(|| Redirect::to("/auth/login"))
    }
}
