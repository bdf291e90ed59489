//! Command handlers for the CLI.
//!
//! Called from `main` once the run config is loaded. Library errors are
//! wrapped with the path or URL they concern and propagated; nothing here
//! retries on its own.

use std::path::Path;

use anyhow::Context;
use mkreviews_core::{Locale, RunConfig};
use mkreviews_scraper::{
    collect_paged, collect_scrolling, run_extraction, CollectOptions, ExportFormat,
    ExtractContext, Pagination, ReplayPages, ReplayScroll, RunReport, Site,
};

/// Locale table for this run: the configured file, or the built-in Russian one.
pub(crate) fn resolve_locale(config: &RunConfig) -> anyhow::Result<Locale> {
    match &config.locale_path {
        Some(path) => mkreviews_core::load_locale(path)
            .with_context(|| format!("failed to load locale from {}", path.display())),
        None => Ok(Locale::russian()),
    }
}

fn extract_to_file(
    config: &RunConfig,
    site: Site,
    markup: &str,
    output: &Path,
    format: ExportFormat,
) -> anyhow::Result<RunReport> {
    let ctx = ExtractContext::from_config(config, resolve_locale(config)?);
    let adapter = site.adapter();
    let report = run_extraction(adapter.as_ref(), markup, &ctx, output, format)?;
    println!("{site}: {report} -> {}", output.display());
    Ok(report)
}

/// Extract reviews from a previously persisted raw buffer.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the locale file is invalid,
/// extraction fails outright, or the table cannot be written.
pub(crate) fn run_convert(
    config: &RunConfig,
    site: Site,
    input: &Path,
    output: &Path,
    format: ExportFormat,
) -> anyhow::Result<RunReport> {
    let markup = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read raw buffer {}", input.display()))?;
    tracing::info!(site = %site, input = %input.display(), bytes = markup.len(), "converting raw buffer");
    extract_to_file(config, site, &markup, output, format)
}

/// Collect a raw buffer from replay snapshots with the driver the site's
/// pagination calls for, optionally persist it, then extract.
///
/// # Errors
///
/// Returns an error if the snapshots cannot be loaded, the driver fails
/// (pagination guard, missing snapshot, invalid URL), or extraction/export
/// fails.
pub(crate) async fn run_collect(
    config: &RunConfig,
    site: Site,
    url: &str,
    replay_dir: &Path,
    raw_out: Option<&Path>,
    output: &Path,
    format: ExportFormat,
) -> anyhow::Result<RunReport> {
    let adapter = site.adapter();
    let options = CollectOptions::from_config(config);

    let collected = match adapter.pagination() {
        Pagination::Paged => {
            let mut source = ReplayPages::from_dir(replay_dir)?;
            collect_paged(adapter.as_ref(), &mut source, url, &options).await
        }
        Pagination::Scroll => {
            let mut source = ReplayScroll::from_dir(replay_dir)?;
            collect_scrolling(adapter.as_ref(), &mut source, url, &options).await
        }
    }
    .with_context(|| format!("collection failed for {url}"))?;

    tracing::info!(
        site = %site,
        cycles = collected.cycles,
        bytes = collected.markup.len(),
        "collection finished"
    );

    if let Some(path) = raw_out {
        std::fs::write(path, &collected.markup)
            .with_context(|| format!("failed to write raw buffer {}", path.display()))?;
    }

    extract_to_file(config, site, &collected.markup, output, format)
}
