//! Runtime configuration from environment variables.

use std::net::SocketAddr;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Forwarded to page contexts for client behavior toggling.
    pub debug: bool,
    /// Optional JSON dataset to preload into the in-memory store.
    pub data_file: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .unwrap_or(3000);
        let bind_addr = format!("{host}:{port}").parse()?;

        let debug = std::env::var("DEBUG")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let data_file = std::env::var("DATA_FILE").ok();

        Ok(Self {
            bind_addr,
            debug,
            data_file,
        })
    }
}
