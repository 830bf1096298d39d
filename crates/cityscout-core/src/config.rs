use crate::app_config::{AppConfig, Environment};
use crate::places::MAX_NEARBY_RESULTS;
use crate::ConfigError;

/// Google caps nearby-search radius at 50 km.
const MAX_SEARCH_RADIUS_M: u32 = 50_000;

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
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("CITYSCOUT_ENV", "development"))?;

    let maps_api_key = lookup("CITYSCOUT_MAPS_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    if maps_api_key.is_none() && env == Environment::Production {
        return Err(ConfigError::MissingEnvVar(
            "CITYSCOUT_MAPS_API_KEY".to_string(),
        ));
    }

    let bind_addr = or_default("CITYSCOUT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("CITYSCOUT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("CITYSCOUT_LOG_LEVEL", "info");
    let maps_base_url = or_default("CITYSCOUT_MAPS_BASE_URL", "https://maps.googleapis.com");

    let search_radius_m = parse_u32("CITYSCOUT_SEARCH_RADIUS_M", "30000")?;
    if search_radius_m == 0 || search_radius_m > MAX_SEARCH_RADIUS_M {
        return Err(invalid(
            "CITYSCOUT_SEARCH_RADIUS_M",
            format!("must be between 1 and {MAX_SEARCH_RADIUS_M}, got {search_radius_m}"),
        ));
    }

    let max_results = parse_usize("CITYSCOUT_MAX_RESULTS", "20")?;
    if max_results == 0 || max_results > MAX_NEARBY_RESULTS {
        return Err(invalid(
            "CITYSCOUT_MAX_RESULTS",
            format!("must be between 1 and {MAX_NEARBY_RESULTS}, got {max_results}"),
        ));
    }

    let request_timeout_secs = parse_u64("CITYSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("CITYSCOUT_USER_AGENT", "cityscout/0.1 (city-explorer)");
    let max_retries = parse_u32("CITYSCOUT_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("CITYSCOUT_RETRY_BACKOFF_BASE_MS", "500")?;

    let detail_concurrency = parse_usize("CITYSCOUT_DETAIL_CONCURRENCY", "4")?;
    if detail_concurrency == 0 {
        return Err(invalid(
            "CITYSCOUT_DETAIL_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }

    let photo_max_width = parse_u32("CITYSCOUT_PHOTO_MAX_WIDTH", "400")?;
    let photo_max_height = parse_u32("CITYSCOUT_PHOTO_MAX_HEIGHT", "300")?;
    let categories_path = lookup("CITYSCOUT_CATEGORIES_PATH").ok().map(PathBuf::from);

    Ok(AppConfig {
        maps_api_key,
        env,
        bind_addr,
        log_level,
        maps_base_url,
        search_radius_m,
        max_results,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        detail_concurrency,
        photo_max_width,
        photo_max_height,
        categories_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CITYSCOUT_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
