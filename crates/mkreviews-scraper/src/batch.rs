//! Whole-buffer extraction with per-record isolation.
//!
//! One bad review never sinks the batch: malformed records are logged,
//! counted by reason, and left out.

use std::collections::BTreeMap;

use scraper::Html;

use crate::adapters::{ExtractContext, SiteAdapter};
use crate::error::ScraperError;
use crate::types::ReviewRecord;

/// Skipped-record counts keyed by [`ScraperError::reason_label`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipCounts {
    by_reason: BTreeMap<&'static str, usize>,
}

impl SkipCounts {
    pub fn record(&mut self, err: &ScraperError) {
        *self.by_reason.entry(err.reason_label()).or_insert(0) += 1;
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.by_reason.values().sum()
    }

    #[must_use]
    pub fn get(&self, reason: &str) -> usize {
        self.by_reason.get(reason).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.by_reason.iter().map(|(k, v)| (*k, *v))
    }

    pub fn merge(&mut self, other: &SkipCounts) {
        for (reason, count) in other.iter() {
            *self.by_reason.entry(reason).or_insert(0) += count;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Well-formed records in document order.
    pub records: Vec<ReviewRecord>,
    /// Review units located, well-formed or not.
    pub seen: usize,
    pub skipped: SkipCounts,
}

impl BatchOutcome {
    fn absorb(&mut self, other: BatchOutcome) {
        self.records.extend(other.records);
        self.seen += other.seen;
        self.skipped.merge(&other.skipped);
    }
}

/// Extracts every review unit in `markup`.
///
/// # Errors
///
/// Only a non-malformed error from the adapter aborts the batch; malformed
/// records are skipped and counted.
pub fn extract_batch<A>(
    adapter: &A,
    markup: &str,
    ctx: &ExtractContext,
) -> Result<BatchOutcome, ScraperError>
where
    A: SiteAdapter + ?Sized,
{
    let document = Html::parse_document(markup);
    let units = adapter.locate_units(&document);
    let mut outcome = BatchOutcome {
        seen: units.len(),
        ..BatchOutcome::default()
    };

    for (index, unit) in units.into_iter().enumerate() {
        match adapter.extract(unit, ctx) {
            Ok(record) => outcome.records.push(record),
            Err(err) if err.is_malformed() => {
                tracing::warn!(
                    site = adapter.name(),
                    unit = index,
                    reason = err.reason_label(),
                    error = %err,
                    "skipping malformed review"
                );
                outcome.skipped.record(&err);
            }
            Err(err) => return Err(err),
        }
    }

    tracing::debug!(
        site = adapter.name(),
        seen = outcome.seen,
        kept = outcome.records.len(),
        skipped = outcome.skipped.total(),
        "extracted batch"
    );
    Ok(outcome)
}

/// Extracts several buffers in the given order, concatenating the results.
///
/// # Errors
///
/// See [`extract_batch`].
pub fn extract_pages<A, S>(
    adapter: &A,
    pages: &[S],
    ctx: &ExtractContext,
) -> Result<BatchOutcome, ScraperError>
where
    A: SiteAdapter + ?Sized,
    S: AsRef<str>,
{
    let mut outcome = BatchOutcome::default();
    for page in pages {
        outcome.absorb(extract_batch(adapter, page.as_ref(), ctx)?);
    }
    Ok(outcome)
}
