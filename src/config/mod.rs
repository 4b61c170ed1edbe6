//! Configuration module for the Nera backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key guarding the admin API (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// How long a gallery media snapshot stays fresh
    pub gallery_ttl: Duration,
    /// Upper bound for the `count` of a single gallery sampling request
    pub gallery_max_count: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("NERA_API_PSK").ok().filter(|k| !k.is_empty());

        let db_path = env::var("NERA_DB_PATH")
            .unwrap_or_else(|_| "./data/nera.sqlite".to_string())
            .into();

        let bind_addr = env::var("NERA_BIND_ADDR")
            .ok()
            .and_then(|addr| match addr.parse() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    eprintln!("Invalid NERA_BIND_ADDR '{}', using default", addr);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

        let log_level = env::var("NERA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("NERA_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let gallery_ttl = env::var("NERA_GALLERY_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_GALLERY_TTL);

        let gallery_max_count = env::var("NERA_GALLERY_MAX_COUNT")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_GALLERY_MAX_COUNT);

        Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            log_json,
            gallery_ttl,
            gallery_max_count,
        }
    }
}

/// Five minutes, matching how often the site used to refetch its gallery.
pub const DEFAULT_GALLERY_TTL: Duration = Duration::from_secs(300);

pub const DEFAULT_GALLERY_MAX_COUNT: usize = 50;
