use crate::adapters::SiteAdapter;
use crate::error::ScraperError;

use super::retry::{retry_with_backoff, with_timeout};
use super::{CollectOptions, CollectState, Collected, CollectionCursor, ScrollSource};

/// Outcome of one height reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStep {
    /// Height grew; keep scrolling.
    Growth,
    /// Height did not grow but confirmations are still outstanding.
    NoGrowth,
    Done,
}

/// Decides when a growing document has stopped growing.
///
/// A run ends only after `confirmations` consecutive readings without growth;
/// any growth resets the count. A shrinking height counts as no growth.
#[derive(Debug, Clone)]
pub struct ScrollMachine {
    last_height: u64,
    no_growth: u32,
    confirmations: u32,
}

impl ScrollMachine {
    #[must_use]
    pub fn new(initial_height: u64, confirmations: u32) -> Self {
        Self {
            last_height: initial_height,
            no_growth: 0,
            confirmations: confirmations.max(1),
        }
    }

    pub fn observe(&mut self, height: u64) -> ScrollStep {
        if height > self.last_height {
            self.last_height = height;
            self.no_growth = 0;
            return ScrollStep::Growth;
        }
        self.no_growth += 1;
        if self.no_growth >= self.confirmations {
            ScrollStep::Done
        } else {
            ScrollStep::NoGrowth
        }
    }

    #[must_use]
    pub fn last_height(&self) -> u64 {
        self.last_height
    }

    #[must_use]
    pub fn no_growth(&self) -> u32 {
        self.no_growth
    }
}

/// Scrolls one document until its height stops growing, then captures it.
///
/// ```text
/// Scrolling -> MeasuringHeight -+- growth ----> Scrolling
///                                +- no growth -> ConfirmWait -> Scrolling (re-check)
///                                +- confirmed -> Done
/// ```
///
/// # Errors
///
/// - [`ScraperError::PaginationLimit`] when `max_cycles` would be exceeded.
/// - [`ScraperError::InvalidRequest`] when the adapter cannot address `base`.
/// - The provider's final error once retries are exhausted.
pub async fn collect_scrolling<A, S>(
    adapter: &A,
    source: &mut S,
    base: &str,
    options: &CollectOptions,
) -> Result<Collected, ScraperError>
where
    A: SiteAdapter + ?Sized,
    S: ScrollSource,
{
    let request = adapter.request_for_page(base, 1)?;
    let target = request.url.clone();
    let limit = options.fetch_timeout;

    retry_with_backoff(options.retry, &target, async || {
        with_timeout(&target, limit, source.open(&request)).await
    })
    .await?;
    let initial = retry_with_backoff(options.retry, &target, async || {
        with_timeout(&target, limit, source.scroll_height()).await
    })
    .await?;

    let mut machine = ScrollMachine::new(initial, options.no_growth_confirmations);
    let mut cursor = CollectionCursor::new(initial);

    loop {
        if let Some(max_cycles) = options.max_cycles {
            if cursor.cycles >= max_cycles {
                return Err(ScraperError::PaginationLimit {
                    base: base.to_owned(),
                    max_pages: max_cycles,
                });
            }
        }

        cursor.enter(CollectState::Scrolling);
        // Timeout covers the scroll plus its wait.
        let wait = options.scroll_wait;
        retry_with_backoff(options.retry, &target, async || {
            with_timeout(&target, limit.saturating_add(wait), source.scroll_and_wait(wait)).await
        })
        .await?;

        cursor.enter(CollectState::MeasuringHeight);
        let height = retry_with_backoff(options.retry, &target, async || {
            with_timeout(&target, limit, source.scroll_height()).await
        })
        .await?;
        cursor.cycles += 1;

        let step = machine.observe(height);
        cursor.position = machine.last_height();
        cursor.no_growth = machine.no_growth();
        tracing::debug!(
            site = adapter.name(),
            cycle = cursor.cycles,
            height,
            no_growth = cursor.no_growth,
            ?step,
            "measured scroll height"
        );

        match step {
            ScrollStep::Growth => {}
            ScrollStep::NoGrowth => cursor.enter(CollectState::ConfirmWait),
            ScrollStep::Done => {
                cursor.enter(CollectState::Done);
                break;
            }
        }
    }

    let markup = retry_with_backoff(options.retry, &target, async || {
        with_timeout(&target, limit, source.page_source()).await
    })
    .await?;
    cursor.append(&markup);

    tracing::info!(
        site = adapter.name(),
        cycles = cursor.cycles,
        height = cursor.position,
        "scroll collection finished"
    );
    Ok(cursor.finish())
}
