//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DATABASE_FILENAME: &str = "blogpad.sqlite";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Key used to sign session cookies
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Folder holding per-deployment files (config.toml, the database)
    #[serde(default = "default_instance_path")]
    pub instance_path: PathBuf,

    /// Database file; defaults to a file inside the instance folder
    #[serde(default)]
    pub database: Option<PathBuf>,

    #[serde(default)]
    pub testing: bool,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub password: PasswordConfig,
}

fn default_secret_key() -> String {
    "dev".to_string()
}

fn default_instance_path() -> PathBuf {
    PathBuf::from("instance")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            instance_path: default_instance_path(),
            database: None,
            testing: false,
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            password: PasswordConfig::default(),
        }
    }
}

/// Server configuration for the HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// How long a signed session stays valid
    #[serde(default = "default_lifetime_days")]
    pub lifetime_days: i64,
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_lifetime_days() -> i64 {
    31
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            lifetime_days: default_lifetime_days(),
        }
    }
}

/// Password hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl Config {
    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| self.instance_path.join(DATABASE_FILENAME))
    }
}
