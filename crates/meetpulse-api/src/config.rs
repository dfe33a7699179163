//! Server configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `4000` |
//! | `STORE_BACKEND` | `postgres` (`memory` keeps everything in-process) |
//! | `DATABASE_URL` | `postgres://localhost/meetpulse` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `ALLOWED_ORIGINS` | falls back to `FRONTEND_URL`, then `http://localhost:5173` |
//! | `STATS_CACHE_CAPACITY` | `1000` (`0` disables the stats cache) |

use std::fmt;
use std::str::FromStr;

use meetpulse_core::Error;

/// Default port the web front-end expects.
pub const DEFAULT_PORT: u16 = 4000;

/// Default front-end origin allowed by CORS.
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Default number of identities kept in the stats cache.
pub const DEFAULT_STATS_CACHE_CAPACITY: usize = 1000;

/// Which document store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!("unknown STORE_BACKEND: {}", other))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: String,
    pub db_max_connections: u32,
    pub allowed_origins: Vec<String>,
    pub stats_cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            store_backend: StoreBackend::default(),
            database_url: "postgres://localhost/meetpulse".to_string(),
            db_max_connections: meetpulse_db::pool::DEFAULT_MAX_CONNECTIONS,
            allowed_origins: vec![DEFAULT_FRONTEND_URL.to_string()],
            stats_cache_capacity: DEFAULT_STATS_CACHE_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Numeric values that fail to parse fall back to their defaults; an
    /// unknown store backend is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let store_backend = match lookup("STORE_BACKEND") {
            Some(v) if !v.trim().is_empty() => v.parse()?,
            _ => defaults.store_backend,
        };

        let origins = lookup("ALLOWED_ORIGINS")
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup("FRONTEND_URL"))
            .map(|v| parse_origins(&v))
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(lookup("PORT"), defaults.port),
            store_backend,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), defaults.db_max_connections),
            allowed_origins: origins,
            stats_cache_capacity: parse_or(
                lookup("STATS_CACHE_CAPACITY"),
                defaults.stats_cache_capacity,
            ),
        })
    }

    /// `host:port` string for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
