//! Error types for Blogpad

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::HtmlEscape;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("Session error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("You don't have the permission to access the requested resource.")]
    Forbidden,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log, not in the page
        let description = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "The server encountered an internal error and was unable to complete your request."
                .to_string()
        } else {
            self.to_string()
        };

        // Messages can echo the request path
        let description = HtmlEscape(&description).to_string();
        let reason = status.canonical_reason().unwrap_or("Error");
        let page = format!(
            "<!doctype html>\n<title>{code} {reason}</title>\n<h1>{reason}</h1>\n<p>{description}</p>\n",
            code = status.as_u16(),
            reason = reason,
            description = description,
        );

        (status, Html(page)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
