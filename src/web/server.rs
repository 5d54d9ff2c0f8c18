//! HTTP server and application factory

use axum::{
    extract::Path,
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use rust_embed::RustEmbed;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::auth::{self, SessionSigner};
use crate::blog;
use crate::config::{self, Config};
use crate::db::Database;
use crate::error::{Error, Result};

use super::templates::Templates;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticFiles;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub database: Database,
    pub templates: Templates,
    pub signer: SessionSigner,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let database = Database::new(config.database_path());
        let signer = SessionSigner::new(&config.secret_key, config.session.lifetime_days);

        Self {
            config,
            database,
            templates: Templates::new(),
            signer,
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Build the application router for the given configuration
pub fn create_app(config: Config) -> Router {
    config::ensure_instance_path(&config);

    if config.testing {
        tracing::debug!("Running in testing mode");
    }

    let state = Arc::new(AppState::new(config));
    create_router(state)
}

/// Create the router with all routes
fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/static/{*path}", get(static_file))
        .nest("/auth", auth::router())
        .merge(blog::router())
        // Middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::load_logged_in_user,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the application on an already bound listener
pub async fn serve(listener: TcpListener, config: Config) -> Result<()> {
    let app = create_app(config);

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Server listening on {}", addr);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Run the HTTP server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    serve(listener, config).await
}

async fn hello() -> &'static str {
    "Hello, World!"
}

async fn static_file(Path(path): Path<String>) -> Result<Response> {
    let file = StaticFiles::get(&path)
        .ok_or_else(|| Error::NotFound(format!("Static file {} doesn't exist.", path)))?;

    let content_type = match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    };

    Ok(([(header::CONTENT_TYPE, content_type)], file.data.into_owned()).into_response())
}
