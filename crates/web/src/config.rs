use std::path::PathBuf;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// When set, the meet is loaded from and saved to this file.
    pub snapshot_path: Option<PathBuf>,
    pub broadcast_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: match std::env::var("PORT") {
                Ok(port) => port.parse().context("PORT must be a number")?,
                Err(_) => 8080,
            },
            snapshot_path: std::env::var("SNAPSHOT_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            broadcast_capacity: match std::env::var("BROADCAST_CAPACITY") {
                Ok(capacity) => capacity
                    .parse()
                    .context("BROADCAST_CAPACITY must be a positive number")?,
                Err(_) => 64,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
