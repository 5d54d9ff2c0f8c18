//! CLI interface for Blogpad

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blogpad")]
#[command(author = "Krakaw")]
#[command(version = "1.0.0")]
#[command(about = "A small multi-user blog", long_about = None)]
pub struct Cli {
    /// Instance folder holding config.toml and the database
    #[arg(long, global = true, env = "BLOGPAD_INSTANCE", default_value = "instance")]
    pub instance_path: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clear the existing data and create new tables
    InitDb,

    /// Start the web server
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
