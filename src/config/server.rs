// src/config/server.rs
use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const ENV_HOST: &str = "SCHOLARSTREAM_HOST";
pub const ENV_PORT: &str = "SCHOLARSTREAM_PORT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Read host/port from the environment. Missing values take defaults;
    /// an unparseable port is an error rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        let host = env::var(ENV_HOST)
            .ok()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match env::var(ENV_PORT) {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("{ENV_PORT} must be a port number, got '{raw}'"))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[serial_test::serial]
    #[test]
    fn defaults_then_env_overrides() {
        env::remove_var(ENV_HOST);
        env::remove_var(ENV_PORT);
        assert_eq!(ServerConfig::from_env().unwrap(), ServerConfig::default());

        env::set_var(ENV_HOST, "127.0.0.1");
        env::set_var(ENV_PORT, "9100");
        let cfg = ServerConfig::from_env().unwrap();
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.socket_addr().unwrap().to_string(), "127.0.0.1:9100");

        env::set_var(ENV_PORT, "eighty");
        assert!(ServerConfig::from_env().is_err());

        env::remove_var(ENV_HOST);
        env::remove_var(ENV_PORT);
    }
}
