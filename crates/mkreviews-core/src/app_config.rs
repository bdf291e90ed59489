use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;

/// Settings for one extraction run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Reference instant for resolving "today"/"yesterday" and missing years.
    pub now: NaiveDateTime,
    pub scroll_wait_ms: u64,
    pub fetch_timeout_secs: u64,
    /// Consecutive no-growth readings required before a scroll run stops.
    pub no_growth_confirmations: u32,
    /// Canonical keys every record must carry.
    pub required_fields: Vec<String>,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub inter_page_delay_ms: u64,
    /// Optional guard for page-indexed collection; `None` means the sentinel alone decides.
    pub max_pages: Option<usize>,
    pub locale_path: Option<PathBuf>,
    pub log_level: String,
}

impl RunConfig {
    #[must_use]
    pub fn scroll_wait(&self) -> Duration {
        Duration::from_millis(self.scroll_wait_ms)
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn inter_page_delay(&self) -> Duration {
        Duration::from_millis(self.inter_page_delay_ms)
    }
}
