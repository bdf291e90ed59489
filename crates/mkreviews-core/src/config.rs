use chrono::NaiveDateTime;

use crate::app_config::RunConfig;
use crate::ConfigError;

/// Accepted layouts for `MKREVIEWS_NOW`.
const NOW_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Load run configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but invalid.
pub fn load_run_config() -> Result<RunConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_run_config_from_env()
}

/// Load run configuration from environment variables already in the process.
///
/// Unlike [`load_run_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but invalid.
pub fn load_run_config_from_env() -> Result<RunConfig, ConfigError> {
    build_run_config(|key| std::env::var(key), chrono::Local::now().naive_local())
}

/// Build run configuration using the provided env-var lookup function.
///
/// `fallback_now` is used as the reference instant when `MKREVIEWS_NOW` is
/// not set, keeping this function free of clock reads.
fn build_run_config<F>(lookup: F, fallback_now: NaiveDateTime) -> Result<RunConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let now = match lookup("MKREVIEWS_NOW") {
        Ok(raw) => parse_now(&raw).ok_or_else(|| {
            invalid(
                "MKREVIEWS_NOW",
                format!("\"{raw}\" is not a YYYY-MM-DDTHH:MM[:SS] timestamp"),
            )
        })?,
        Err(_) => fallback_now,
    };

    let scroll_wait_ms = parse_u64("MKREVIEWS_SCROLL_WAIT_MS", "1000")?;
    let fetch_timeout_secs = parse_u64("MKREVIEWS_FETCH_TIMEOUT_SECS", "30")?;

    let no_growth_confirmations = parse_u32("MKREVIEWS_NO_GROWTH_CONFIRMATIONS", "2")?;
    if no_growth_confirmations == 0 {
        return Err(invalid(
            "MKREVIEWS_NO_GROWTH_CONFIRMATIONS",
            "must be at least 1".to_string(),
        ));
    }

    let required_fields =
        parse_field_list(&or_default("MKREVIEWS_REQUIRED_FIELDS", "author,rate,date"));
    if required_fields.is_empty() {
        return Err(invalid(
            "MKREVIEWS_REQUIRED_FIELDS",
            "must name at least one field".to_string(),
        ));
    }

    let max_retries = parse_u32("MKREVIEWS_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("MKREVIEWS_RETRY_BACKOFF_BASE_MS", "500")?;
    let inter_page_delay_ms = parse_u64("MKREVIEWS_INTER_PAGE_DELAY_MS", "0")?;

    let max_pages = match lookup("MKREVIEWS_MAX_PAGES") {
        Ok(raw) => Some(
            raw.parse::<usize>()
                .map_err(|e| invalid("MKREVIEWS_MAX_PAGES", e.to_string()))?,
        ),
        Err(_) => None,
    };

    let locale_path = lookup("MKREVIEWS_LOCALE_PATH").ok().map(PathBuf::from);
    let log_level = or_default("MKREVIEWS_LOG_LEVEL", "info");

    Ok(RunConfig {
        now,
        scroll_wait_ms,
        fetch_timeout_secs,
        no_growth_confirmations,
        required_fields,
        max_retries,
        retry_backoff_base_ms,
        inter_page_delay_ms,
        max_pages,
        locale_path,
        log_level,
    })
}

fn parse_now(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NOW_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Splits a comma-separated field list into lowercase, non-empty names.
fn parse_field_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
