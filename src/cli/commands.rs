//! CLI command implementations

use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::{error, info, write_success};
use crate::config::{self, Config};
use crate::db::Database;

pub const INIT_DB_MESSAGE: &str = "Initialized the database.";

/// Clear the existing data and create new tables
pub async fn init_db(instance_path: &Path) -> Result<()> {
    let config = load_config(instance_path)?;
    init_db_with(&config, &mut io::stdout())
}

/// Initialize the database described by an already loaded configuration,
/// reporting success to `out`
pub fn init_db_with(config: &Config, out: &mut impl Write) -> Result<()> {
    config::ensure_instance_path(config);

    let database = Database::new(config.database_path());
    if let Err(e) = database.init() {
        error(&format!("Failed to initialize the database: {}", e));
        return Err(e.into());
    }

    write_success(out, INIT_DB_MESSAGE)?;
    Ok(())
}

/// Start the web server
pub async fn serve(instance_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(instance_path)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    crate::web::run_server(config, &host, port).await?;
    Ok(())
}

fn load_config(instance_path: &Path) -> Result<Config> {
    config::load_config(instance_path).map_err(|e| anyhow::anyhow!("{}", e))
}
