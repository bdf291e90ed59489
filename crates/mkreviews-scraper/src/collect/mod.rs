//! Incremental collection of raw review markup.
//!
//! Two drivers share one cursor type:
//!
//! - [`collect_paged`] walks numbered pages until the adapter stops seeing its
//!   "more" sentinel.
//! - [`collect_scrolling`] scrolls one growing document until its height has
//!   stopped growing for `no_growth_confirmations` consecutive readings.
//!
//! Both are plain futures, so a caller cancels a run by dropping it (for
//! example through `tokio::time::timeout`). Every provider call is bounded by
//! the fetch timeout and retried on transient failure.

mod paged;
mod retry;
mod scroll;

use std::time::Duration;

use mkreviews_core::RunConfig;

use crate::error::ScraperError;
use crate::types::PageRequest;

pub use paged::collect_paged;
pub use retry::RetryPolicy;
pub use scroll::{collect_scrolling, ScrollMachine, ScrollStep};

/// Yields the markup of one numbered page.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// # Errors
    ///
    /// Returns [`ScraperError::Transport`] (retried) or any other error
    /// (returned as-is) when the page cannot be produced.
    async fn fetch(&mut self, request: &PageRequest) -> Result<String, ScraperError>;
}

/// A single document that loads more content as it is scrolled.
#[allow(async_fn_in_trait)]
pub trait ScrollSource {
    /// # Errors
    ///
    /// Returns [`ScraperError::Transport`] if the document cannot be opened.
    async fn open(&mut self, request: &PageRequest) -> Result<(), ScraperError>;

    /// # Errors
    ///
    /// Returns [`ScraperError::Transport`] if the height cannot be measured.
    async fn scroll_height(&mut self) -> Result<u64, ScraperError>;

    /// Scrolls to the bottom and waits `wait` for lazy content to load.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Transport`] if the scroll fails.
    async fn scroll_and_wait(&mut self, wait: Duration) -> Result<(), ScraperError>;

    /// # Errors
    ///
    /// Returns [`ScraperError::Transport`] if the markup cannot be read.
    async fn page_source(&mut self) -> Result<String, ScraperError>;
}

/// Knobs for both drivers.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Upper bound on any single provider call.
    pub fetch_timeout: Duration,
    pub retry: RetryPolicy,
    /// Pause before each page after the first.
    pub inter_page_delay: Duration,
    /// Paged driver fails with `PaginationLimit` past this many pages.
    pub max_pages: Option<usize>,
    pub scroll_wait: Duration,
    /// Consecutive no-growth readings that end a scroll; at least 1.
    pub no_growth_confirmations: u32,
    /// Scroll driver fails with `PaginationLimit` past this many cycles.
    pub max_cycles: Option<usize>,
}

impl CollectOptions {
    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            fetch_timeout: config.fetch_timeout(),
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff_base_ms: config.retry_backoff_base_ms,
            },
            inter_page_delay: config.inter_page_delay(),
            max_pages: config.max_pages,
            scroll_wait: config.scroll_wait(),
            no_growth_confirmations: config.no_growth_confirmations.max(1),
            max_cycles: config.max_pages,
        }
    }
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            inter_page_delay: Duration::ZERO,
            max_pages: None,
            scroll_wait: Duration::from_millis(1000),
            no_growth_confirmations: 2,
            max_cycles: None,
        }
    }
}

/// States visited by the two drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectState {
    Fetching { page: u32 },
    Inspecting { page: u32 },
    Scrolling,
    MeasuringHeight,
    ConfirmWait,
    Done,
}

/// Per-run mutable state. Only the markup survives termination.
#[derive(Debug)]
pub struct CollectionCursor {
    /// Page index (paged) or last scroll height (scroll).
    pub position: u64,
    pub no_growth: u32,
    pub cycles: usize,
    buffer: String,
    trace: Vec<CollectState>,
}

impl CollectionCursor {
    fn new(position: u64) -> Self {
        Self {
            position,
            no_growth: 0,
            cycles: 0,
            buffer: String::new(),
            trace: Vec::new(),
        }
    }

    fn enter(&mut self, state: CollectState) {
        tracing::trace!(?state, cycles = self.cycles, "collection state");
        self.trace.push(state);
    }

    fn append(&mut self, markup: &str) {
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.buffer.push_str(markup);
    }

    fn finish(self) -> Collected {
        Collected {
            markup: self.buffer,
            cycles: self.cycles,
            trace: self.trace,
        }
    }
}

/// Output of a finished collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    /// Concatenated raw markup, ready to persist or extract.
    pub markup: String,
    /// Fetches (paged) or scroll cycles (scroll) performed.
    pub cycles: usize,
    /// Every state entered, in order; always ends in [`CollectState::Done`].
    pub trace: Vec<CollectState>,
}

impl Collected {
    #[must_use]
    pub fn final_state(&self) -> Option<CollectState> {
        self.trace.last().copied()
    }
}
