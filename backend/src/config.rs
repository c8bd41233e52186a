//! Runtime configuration read from the process environment.
//!
//! `main` loads `.env` through dotenvy before calling [`Config::from_env`]; the
//! resulting value is handed to [`crate::initialize_backend`] and
//! [`crate::create_router`] and never stored globally.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:geowiki.db";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

/// Origins allowed to call the API from a browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`: echo back whatever origin the request carries
    Mirror,
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated `CORS_ORIGIN` value. Blank entries are dropped and
    /// an all-blank value falls back to the defaults.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "*" {
            return CorsOrigins::Mirror;
        }
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() {
            CorsOrigins::default()
        } else {
            CorsOrigins::List(origins)
        }
    }
}

impl Default for CorsOrigins {
    fn default() -> Self {
        CorsOrigins::List(DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub addr: SocketAddr,
    pub cors_origins: CorsOrigins,
    /// Load the demonstration catalog into an empty database at boot
    pub seed: bool,
    /// Built frontend served for any unmatched path
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("GEOWIKI_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let raw_addr = lookup("GEOWIKI_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("GEOWIKI_ADDR is not a socket address: {raw_addr}"))?;

        let cors_origins = lookup("CORS_ORIGIN")
            .map(|raw| CorsOrigins::parse(&raw))
            .unwrap_or_default();

        let seed = lookup("GEOWIKI_SEED").map_or(false, |raw| parse_flag(&raw));

        let static_dir = lookup("GEOWIKI_STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            database_url,
            addr,
            cors_origins,
            seed,
            static_dir,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origins: CorsOrigins::default(),
            seed: false,
            static_dir: None,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
