//! Cookie-backed session state

use axum::http::{header, HeaderMap, HeaderValue};

use crate::auth::jwt::SessionSigner;
use crate::error::{Error, Result};

/// Session information carried between requests in a signed cookie
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user_id: Option<i64>,
    flashes: Vec<String>,
    modified: bool,
}

impl Session {
    /// Logged in user id, if any
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    /// Store the logged in user id
    pub fn set_user_id(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
        self.modified = true;
    }

    /// Forget everything stored in the session
    pub fn clear(&mut self) {
        self.user_id = None;
        self.flashes.clear();
        self.modified = true;
    }

    /// Queue a message for the next rendered page
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flashes.push(message.into());
        self.modified = true;
    }

    /// Messages queued but not yet shown
    pub fn pending_flashes(&self) -> &[String] {
        &self.flashes
    }

    /// Remove and return the queued messages
    pub fn take_flashes(&mut self) -> Vec<String> {
        if !self.flashes.is_empty() {
            self.modified = true;
        }
        std::mem::take(&mut self.flashes)
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.flashes.is_empty()
    }

    /// Whether the cookie has to be rewritten
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Read the session from the request cookie
    ///
    /// A missing, tampered or expired cookie yields an empty session.
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str, signer: &SessionSigner) -> Self {
        let Some(token) = find_cookie(headers, cookie_name) else {
            return Self::default();
        };

        match signer.verify(token) {
            Ok(claims) => Self {
                user_id: claims.uid,
                flashes: claims.flashes,
                modified: false,
            },
            Err(e) => {
                tracing::debug!("Ignoring invalid session cookie: {}", e);
                Self::default()
            }
        }
    }

    /// Build the Set-Cookie header for this session
    ///
    /// Returns `None` when nothing changed. An emptied session removes the cookie.
    pub fn set_cookie_header(
        &self,
        cookie_name: &str,
        signer: &SessionSigner,
    ) -> Result<Option<HeaderValue>> {
        if !self.modified {
            return Ok(None);
        }

        let cookie = if self.is_empty() {
            format!(
                "{}=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; HttpOnly; Path=/",
                cookie_name
            )
        } else {
            format!(
                "{}={}; Max-Age={}; HttpOnly; Path=/; SameSite=Lax",
                cookie_name,
                signer.sign(self)?,
                signer.lifetime().num_seconds()
            )
        };

        HeaderValue::from_str(&cookie)
            .map(Some)
            .map_err(|e| Error::Other(format!("Invalid session cookie: {}", e)))
    }
}

/// Find a cookie value in the request headers
fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}
