//! Server configuration

use anyhow::Result;
use std::net::SocketAddr;
use std::str::FromStr;

/// Storage engine backing the company repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local map; data is lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Unknown storage backend: '{}'", other),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HTTP_HOST`: Address to bind (default: "0.0.0.0")
    /// - `HTTP_PORT`: Port to bind (default: 3000)
    /// - `STORAGE_BACKEND`: "postgres" or "memory" (default: "postgres")
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("HTTP_PORT") {
            Ok(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid TCP port for HTTP server: '{}'", port))?,
            Err(_) => 3000,
        };

        let storage = std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        Ok(Self {
            host,
            port,
            storage,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))
    }
}
