use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

/// Runtime configuration, entirely env-var driven. Every variable has a
/// default, so the server starts with no environment at all.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// CORS origin the API allows; the literal `*` selects an open policy.
    pub allowed_origin: String,
    /// Optional YAML catalog overriding the built-in tables.
    pub catalog_path: Option<PathBuf>,
    /// Probe image URLs at startup and substitute the placeholder for any
    /// that fail. Off by default to keep startup network-free.
    pub probe_images: bool,
    pub probe_timeout_secs: u64,
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build the configuration through the provided env-var lookup, so the
/// parsing logic can be tested against a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let raw_bind = or_default("MINISHOP_BIND_ADDR", "0.0.0.0:5000");
    let bind_addr = raw_bind
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "MINISHOP_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    let log_level = or_default("MINISHOP_LOG_LEVEL", "info");
    let allowed_origin = or_default("MINISHOP_ALLOWED_ORIGIN", "http://localhost:3000");
    let catalog_path = lookup("MINISHOP_CATALOG_PATH").ok().map(PathBuf::from);

    let probe_images = parse_bool("MINISHOP_PROBE_IMAGES", &or_default("MINISHOP_PROBE_IMAGES", "false"))?;

    let raw_timeout = or_default("MINISHOP_PROBE_TIMEOUT_SECS", "5");
    let probe_timeout_secs = raw_timeout
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "MINISHOP_PROBE_TIMEOUT_SECS".to_string(),
            reason: e.to_string(),
        })?;

    Ok(AppConfig {
        bind_addr,
        log_level,
        allowed_origin,
        catalog_path,
        probe_images,
        probe_timeout_secs,
    })
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected true/false, got '{other}'"),
        }),
    }
}
