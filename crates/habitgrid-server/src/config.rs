use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Report every API error as 500, like the original server.
    pub legacy_errors: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("HABITGRID_DB_PATH").unwrap_or_else(|| "habitgrid.db".into());
        let host = lookup("HABITGRID_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("HABITGRID_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("HABITGRID_PORT must be a port number")?;
        let legacy_errors = match lookup("HABITGRID_LEGACY_ERRORS") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("HABITGRID_LEGACY_ERRORS must be true or false, got '{}'", raw))?,
            None => false,
        };

        Ok(Self {
            db_path: db_path.into(),
            host,
            port,
            legacy_errors,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
