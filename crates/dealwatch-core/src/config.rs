use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files, which is useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup without touching the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values are treated the same as unset ones.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let webhook_url = optional("DISCORD_WEBHOOK_URL");
    let max_pages = parse_u32("DEALWATCH_MAX_PAGES", "2")?;
    let search_term = optional("DEALWATCH_SEARCH_TERM");
    let seen_path = PathBuf::from(or_default("DEALWATCH_SEEN_PATH", "./data/seen_deals.json"));
    let sources_path = PathBuf::from(or_default(
        "DEALWATCH_SOURCES_PATH",
        "./config/sources.yaml",
    ));
    let log_level = or_default("DEALWATCH_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("DEALWATCH_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("DEALWATCH_USER_AGENT", DEFAULT_USER_AGENT);
    let page_delay_min_ms = parse_u64("DEALWATCH_PAGE_DELAY_MIN_MS", "3000")?;
    let page_delay_max_ms = parse_u64("DEALWATCH_PAGE_DELAY_MAX_MS", "8000")?;
    let notify_delay_ms = parse_u64("DEALWATCH_NOTIFY_DELAY_MS", "1000")?;
    let rate_limit_buffer_ms = parse_u64("DEALWATCH_RATE_LIMIT_BUFFER_MS", "500")?;

    if page_delay_min_ms > page_delay_max_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "DEALWATCH_PAGE_DELAY_MIN_MS".to_string(),
            reason: format!(
                "minimum delay {page_delay_min_ms}ms exceeds maximum {page_delay_max_ms}ms"
            ),
        });
    }

    Ok(AppConfig {
        webhook_url,
        max_pages,
        search_term,
        seen_path,
        sources_path,
        log_level,
        request_timeout_secs,
        user_agent,
        page_delay_min_ms,
        page_delay_max_ms,
        notify_delay_ms,
        rate_limit_buffer_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
