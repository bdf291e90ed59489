//! Raw buffer in, tabular file out.

use std::fmt;
use std::path::Path;

use crate::adapters::{ExtractContext, SiteAdapter};
use crate::batch::{extract_batch, BatchOutcome, SkipCounts};
use crate::dataset::{assemble, Dataset};
use crate::error::ScraperError;
use crate::export::{export, ExportFormat};

/// Summary of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub records_seen: usize,
    pub skipped: SkipCounts,
    pub columns: usize,
    pub rows_written: usize,
}

impl RunReport {
    #[must_use]
    pub fn records_skipped(&self) -> usize {
        self.skipped.total()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} reviews seen, {} skipped",
            self.records_seen,
            self.records_skipped()
        )?;
        let reasons: Vec<String> = self
            .skipped
            .iter()
            .map(|(reason, count)| format!("{reason}: {count}"))
            .collect();
        if !reasons.is_empty() {
            write!(f, " ({})", reasons.join(", "))?;
        }
        write!(
            f,
            ", {} columns, {} rows written",
            self.columns, self.rows_written
        )
    }
}

/// Extracts and assembles without touching the filesystem.
///
/// # Errors
///
/// See [`extract_batch`].
pub fn build_dataset<A>(
    adapter: &A,
    markup: &str,
    ctx: &ExtractContext,
) -> Result<(Dataset, BatchOutcome), ScraperError>
where
    A: SiteAdapter + ?Sized,
{
    let mut outcome = extract_batch(adapter, markup, ctx)?;
    let dataset = assemble(std::mem::take(&mut outcome.records));
    Ok((dataset, outcome))
}

/// Extracts every review in `markup` and exports the resulting table.
///
/// # Errors
///
/// Returns the first non-malformed extraction error, or
/// [`ScraperError::IoWrite`] if the export fails.
pub fn run_extraction<A>(
    adapter: &A,
    markup: &str,
    ctx: &ExtractContext,
    target: &Path,
    format: ExportFormat,
) -> Result<RunReport, ScraperError>
where
    A: SiteAdapter + ?Sized,
{
    let (dataset, outcome) = build_dataset(adapter, markup, ctx)?;
    let rows_written = export(&dataset, target, format)?;

    let report = RunReport {
        records_seen: outcome.seen,
        skipped: outcome.skipped,
        columns: dataset.column_count(),
        rows_written,
    };
    tracing::info!(
        site = adapter.name(),
        seen = report.records_seen,
        skipped = report.records_skipped(),
        columns = report.columns,
        rows = report.rows_written,
        "extraction run finished"
    );
    Ok(report)
}
