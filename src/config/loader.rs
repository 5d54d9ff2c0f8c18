//! Configuration loading and environment variable interpolation

use crate::error::Result;
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "config.toml";

/// Load configuration from `<instance_path>/config.toml`
///
/// A missing file is not an error: the defaults are used instead. The
/// instance path passed in always wins over one written in the file.
pub fn load_config(instance_path: &Path) -> Result<Config> {
    let config_path = instance_path.join(CONFIG_FILENAME);

    let mut config = if config_path.exists() {
        load_config_from_path(&config_path)?
    } else {
        tracing::debug!("No config file at {}, using defaults", config_path.display());
        Config::default()
    };

    config.instance_path = instance_path.to_path_buf();
    Ok(config)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Make sure the instance folder exists
pub fn ensure_instance_path(config: &Config) {
    if let Err(e) = fs::create_dir_all(&config.instance_path) {
        tracing::debug!(
            "Could not create instance folder {}: {}",
            config.instance_path.display(),
            e
        );
    }
}
