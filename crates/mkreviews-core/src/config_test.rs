use std::collections::HashMap;
use std::env::VarError;

use chrono::NaiveDate;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn fallback_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn build_run_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_run_config(lookup_from_map(&map), fallback_now());
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.now, fallback_now());
    assert_eq!(cfg.scroll_wait_ms, 1000);
    assert_eq!(cfg.fetch_timeout_secs, 30);
    assert_eq!(cfg.no_growth_confirmations, 2);
    assert_eq!(cfg.required_fields, vec!["author", "rate", "date"]);
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.inter_page_delay_ms, 0);
    assert!(cfg.max_pages.is_none());
    assert!(cfg.locale_path.is_none());
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn now_override_with_minutes() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_NOW", "2023-12-31T23:59");
    let cfg = build_run_config(lookup_from_map(&map), fallback_now()).unwrap();
    assert_eq!(
        cfg.now,
        NaiveDate::from_ymd_opt(2023, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap()
    );
}

#[test]
fn now_override_with_seconds() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_NOW", "2024-01-02T03:04:05");
    let cfg = build_run_config(lookup_from_map(&map), fallback_now()).unwrap();
    assert_eq!(cfg.now.to_string(), "2024-01-02 03:04:05");
}

#[test]
fn now_override_invalid() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_NOW", "yesterday");
    let result = build_run_config(lookup_from_map(&map), fallback_now());
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MKREVIEWS_NOW"),
        "expected InvalidEnvVar(MKREVIEWS_NOW), got: {result:?}"
    );
}

#[test]
fn no_growth_confirmations_zero_rejected() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_NO_GROWTH_CONFIRMATIONS", "0");
    let result = build_run_config(lookup_from_map(&map), fallback_now());
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MKREVIEWS_NO_GROWTH_CONFIRMATIONS"),
        "expected InvalidEnvVar(MKREVIEWS_NO_GROWTH_CONFIRMATIONS), got: {result:?}"
    );
}

#[test]
fn no_growth_confirmations_override() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_NO_GROWTH_CONFIRMATIONS", "3");
    let cfg = build_run_config(lookup_from_map(&map), fallback_now()).unwrap();
    assert_eq!(cfg.no_growth_confirmations, 3);
}

#[test]
fn required_fields_are_trimmed_and_lowercased() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_REQUIRED_FIELDS", " Author , RATE,, date ");
    let cfg = build_run_config(lookup_from_map(&map), fallback_now()).unwrap();
    assert_eq!(cfg.required_fields, vec!["author", "rate", "date"]);
}

#[test]
fn required_fields_empty_rejected() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_REQUIRED_FIELDS", " , ");
    let result = build_run_config(lookup_from_map(&map), fallback_now());
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MKREVIEWS_REQUIRED_FIELDS"),
        "expected InvalidEnvVar(MKREVIEWS_REQUIRED_FIELDS), got: {result:?}"
    );
}

#[test]
fn scroll_wait_ms_invalid() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_SCROLL_WAIT_MS", "soon");
    let result = build_run_config(lookup_from_map(&map), fallback_now());
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MKREVIEWS_SCROLL_WAIT_MS"),
        "expected InvalidEnvVar(MKREVIEWS_SCROLL_WAIT_MS), got: {result:?}"
    );
}

#[test]
fn max_pages_override() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_MAX_PAGES", "50");
    let cfg = build_run_config(lookup_from_map(&map), fallback_now()).unwrap();
    assert_eq!(cfg.max_pages, Some(50));
}

#[test]
fn max_pages_invalid() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_MAX_PAGES", "-1");
    let result = build_run_config(lookup_from_map(&map), fallback_now());
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MKREVIEWS_MAX_PAGES"),
        "expected InvalidEnvVar(MKREVIEWS_MAX_PAGES), got: {result:?}"
    );
}

#[test]
fn durations_follow_millisecond_and_second_fields() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_SCROLL_WAIT_MS", "250");
    map.insert("MKREVIEWS_FETCH_TIMEOUT_SECS", "7");
    map.insert("MKREVIEWS_INTER_PAGE_DELAY_MS", "40");
    let cfg = build_run_config(lookup_from_map(&map), fallback_now()).unwrap();
    assert_eq!(cfg.scroll_wait().as_millis(), 250);
    assert_eq!(cfg.fetch_timeout().as_secs(), 7);
    assert_eq!(cfg.inter_page_delay().as_millis(), 40);
}

#[test]
fn locale_path_and_log_level_override() {
    let mut map = HashMap::new();
    map.insert("MKREVIEWS_LOCALE_PATH", "./config/locale.en.yaml");
    map.insert("MKREVIEWS_LOG_LEVEL", "debug");
    let cfg = build_run_config(lookup_from_map(&map), fallback_now()).unwrap();
    assert_eq!(
        cfg.locale_path.as_deref(),
        Some(std::path::Path::new("./config/locale.en.yaml"))
    );
    assert_eq!(cfg.log_level, "debug");
}
