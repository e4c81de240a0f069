use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
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

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
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

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "value must be finite".to_string()))
        }
    };

    let env = parse_environment(&or_default("GQMAP_ENV", "development"))?;
    let bind_addr = parse_addr("GQMAP_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("GQMAP_LOG_LEVEL", "info");
    let variants_path = optional("GQMAP_VARIANTS_PATH").map(PathBuf::from);
    let default_variant = or_default("GQMAP_VARIANT", "generic").trim().to_lowercase();
    let mapbox_token = optional("GQMAP_MAPBOX_TOKEN");
    let geocode_base_url = or_default("GQMAP_GEOCODE_BASE_URL", "https://api.mapbox.com/");

    let request_timeout_secs = parse_u64("GQMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("GQMAP_USER_AGENT", "gqmap/0.1 (store-locator)");

    let fallback_lat = parse_f64("GQMAP_FALLBACK_LAT", "39.4015")?;
    if !(-90.0..=90.0).contains(&fallback_lat) {
        return Err(invalid(
            "GQMAP_FALLBACK_LAT",
            format!("{fallback_lat} is outside [-90, 90]"),
        ));
    }
    let fallback_lng = parse_f64("GQMAP_FALLBACK_LNG", "-76.6053")?;
    if !(-180.0..=180.0).contains(&fallback_lng) {
        return Err(invalid(
            "GQMAP_FALLBACK_LNG",
            format!("{fallback_lng} is outside [-180, 180]"),
        ));
    }

    let min_zoom = parse_f64("GQMAP_MIN_ZOOM", "8")?;
    let nearest_limit = parse_usize("GQMAP_NEAREST_LIMIT", "10")?;
    if nearest_limit == 0 {
        return Err(invalid(
            "GQMAP_NEAREST_LIMIT",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        variants_path,
        default_variant,
        mapbox_token,
        geocode_base_url,
        request_timeout_secs,
        user_agent,
        fallback_lat,
        fallback_lng,
        min_zoom,
        nearest_limit,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GQMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
