use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_INSTAGRAM_API_BASE_URL: &str = "https://graph.instagram.com";
pub const DEFAULT_TIKTOK_API_BASE_URL: &str = "https://open.tiktokapis.com";
pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let base_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw.trim_end_matches('/').to_string())
        } else {
            Err(invalid(var, format!("expected an http(s) URL, got '{raw}'")))
        }
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("CREATORHUB_ENV", "development"))?;
    let bind_addr = parse_addr("CREATORHUB_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CREATORHUB_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("CREATORHUB_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("CREATORHUB_DB_MIN_CONNECTIONS", "1")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "CREATORHUB_DB_MIN_CONNECTIONS",
            format!(
                "{db_min_connections} exceeds CREATORHUB_DB_MAX_CONNECTIONS ({db_max_connections})"
            ),
        ));
    }
    let db_acquire_timeout_secs = parse_u64("CREATORHUB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let http_timeout_secs = parse_u64("CREATORHUB_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("CREATORHUB_USER_AGENT", "creatorhub/0.1 (platform-sync)");

    let instagram_api_base_url =
        base_url("INSTAGRAM_API_BASE_URL", DEFAULT_INSTAGRAM_API_BASE_URL)?;
    let tiktok_api_base_url = base_url("TIKTOK_API_BASE_URL", DEFAULT_TIKTOK_API_BASE_URL)?;
    let youtube_api_base_url = base_url("YOUTUBE_API_BASE_URL", DEFAULT_YOUTUBE_API_BASE_URL)?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        http_timeout_secs,
        user_agent,
        instagram_api_base_url,
        tiktok_api_base_url,
        youtube_api_base_url,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CREATORHUB_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
