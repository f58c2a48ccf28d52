//! Configuration for Bloglist
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;

use crate::types::BloglistError;

/// Bloglist - REST API for a list of blogs
#[derive(Parser, Debug, Clone)]
#[command(name = "bloglist")]
#[command(about = "Blog list REST API backed by MongoDB")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:3003")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "bloglist")]
    pub mongodb_db: String,

    /// Enable development mode
    /// Falls back to an in-memory store when MongoDB is unreachable
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), BloglistError> {
        if self.mongodb_uri.trim().is_empty() {
            return Err(BloglistError::Config("MONGODB_URI must not be empty".into()));
        }

        if self.mongodb_db.trim().is_empty() {
            return Err(BloglistError::Config("MONGODB_DB must not be empty".into()));
        }

        Ok(())
    }
}
