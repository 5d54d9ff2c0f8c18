//! Shared helpers for the HTTP integration tests
//!
//! Each test gets its own server on a random port, backed by a fresh
//! database in a temp folder.

#![allow(dead_code)]

use blogpad::auth::{password::hash_password, User};
use blogpad::config::{Config, PasswordConfig};
use blogpad::db::Database;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::{RequestBuilder, Response};
use rusqlite::Connection;
use std::sync::Mutex;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// Lowest cost bcrypt accepts, keeps tests fast
pub const TEST_BCRYPT_COST: u32 = 4;

pub struct TestApp {
    pub config: Config,
    base_url: String,
    client: reqwest::Client,
    session_cookie: Mutex<Option<String>>,
    handle: JoinHandle<()>,
    _dir: TempDir,
}

/// Config pointing at a temp folder, in testing mode
pub fn test_config(dir: &TempDir) -> Config {
    Config {
        testing: true,
        instance_path: dir.path().join("instance"),
        database: Some(dir.path().join("test.sqlite")),
        password: PasswordConfig {
            bcrypt_cost: TEST_BCRYPT_COST,
        },
        ..Config::default()
    }
}

/// Create the schema and the fixture rows: users `test` and `other`
/// (password equal to the username) and one post by `test`
pub fn seed(config: &Config) {
    let database = Database::new(config.database_path());
    database.init().expect("Failed to init database");

    let conn = database.connect().expect("Failed to connect");
    for name in ["test", "other"] {
        let hash = hash_password(name, TEST_BCRYPT_COST).expect("Failed to hash");
        User::create(&conn, name, &hash).expect("Failed to create user");
    }
    conn.execute(
        "INSERT INTO post (title, body, author_id, created) VALUES (?1, ?2, 1, '2018-01-01 00:00:00')",
        ["test title", "test\nbody"],
    )
    .expect("Failed to create post");
}

impl TestApp {
    /// Start a seeded server
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(&dir);
        seed(&config);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let server_config = config.clone();
        let handle = tokio::spawn(async move {
            let _ = blogpad::serve(listener, server_config).await;
        });

        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("Failed to build client");

        Self {
            config,
            base_url: format!("http://{}", addr),
            client,
            session_cookie: Mutex::new(None),
            handle,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Open a connection to the test database
    pub fn db(&self) -> Connection {
        Database::new(self.config.database_path())
            .connect()
            .expect("Failed to connect to test database")
    }

    pub async fn get(&self, path: &str) -> Response {
        self.send(self.client.get(self.url(path))).await
    }

    /// POST without a body
    pub async fn post(&self, path: &str) -> Response {
        self.send(self.client.post(self.url(path))).await
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.send(self.client.post(self.url(path)).form(form)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.post_form(
            "/auth/login",
            &[("username", username), ("password", password)],
        )
        .await
    }

    /// Log in as the fixture user `test`
    pub async fn login_default(&self) -> Response {
        self.login("test", "test").await
    }

    pub async fn logout(&self) -> Response {
        self.get("/auth/logout").await
    }

    /// Current session cookie value, if the server set one
    pub fn session_cookie(&self) -> Option<String> {
        self.session_cookie
            .lock()
            .expect("cookie jar poisoned")
            .clone()
    }

    async fn send(&self, request: RequestBuilder) -> Response {
        let cookie_name = &self.config.session.cookie_name;

        let request = match self.session_cookie() {
            Some(value) => request.header(COOKIE, format!("{}={}", cookie_name, value)),
            None => request,
        };

        let response = request.send().await.expect("Request failed");

        for header in response.headers().get_all(SET_COOKIE) {
            let Ok(cookie) = header.to_str() else { continue };
            let Some((name, rest)) = cookie.split_once('=') else { continue };
            if name != cookie_name {
                continue;
            }

            let value = rest.split(';').next().unwrap_or("").to_string();
            let removed = value.is_empty() || cookie.contains("Max-Age=0");
            *self.session_cookie.lock().expect("cookie jar poisoned") =
                if removed { None } else { Some(value) };
        }

        response
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Location header of a redirect response
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
