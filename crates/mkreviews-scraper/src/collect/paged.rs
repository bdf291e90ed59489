use crate::adapters::SiteAdapter;
use crate::error::ScraperError;

use super::retry::{retry_with_backoff, with_timeout};
use super::{CollectOptions, CollectState, Collected, CollectionCursor, PageSource};

/// Fetches numbered pages until one no longer carries the adapter's sentinel.
///
/// ```text
/// Fetching{1} -> Inspecting{1} -> Fetching{2} -> ... -> Inspecting{n} -> Done
/// ```
///
/// Every fetched page is appended, including the last one. There is no page
/// cap unless [`CollectOptions::max_pages`] is set.
///
/// # Errors
///
/// - [`ScraperError::PaginationLimit`] when `max_pages` would be exceeded.
/// - [`ScraperError::InvalidRequest`] when the adapter cannot address `base`.
/// - The provider's final error once retries are exhausted.
pub async fn collect_paged<A, P>(
    adapter: &A,
    source: &mut P,
    base: &str,
    options: &CollectOptions,
) -> Result<Collected, ScraperError>
where
    A: SiteAdapter + ?Sized,
    P: PageSource,
{
    let mut cursor = CollectionCursor::new(1);
    let mut state = CollectState::Fetching { page: 1 };
    let mut latest = String::new();

    loop {
        cursor.enter(state);
        state = match state {
            CollectState::Fetching { page } => {
                if let Some(max_pages) = options.max_pages {
                    if usize::try_from(page).map_or(true, |page| page > max_pages) {
                        return Err(ScraperError::PaginationLimit {
                            base: base.to_owned(),
                            max_pages,
                        });
                    }
                }
                if page > 1 && !options.inter_page_delay.is_zero() {
                    tokio::time::sleep(options.inter_page_delay).await;
                }

                let request = adapter.request_for_page(base, page)?;
                let target = request.url.clone();
                latest = retry_with_backoff(options.retry, &target, async || {
                    with_timeout(&target, options.fetch_timeout, source.fetch(&request)).await
                })
                .await?;

                cursor.position = u64::from(page);
                cursor.cycles += 1;
                cursor.append(&latest);
                tracing::debug!(
                    site = adapter.name(),
                    page,
                    bytes = latest.len(),
                    "fetched review page"
                );
                CollectState::Inspecting { page }
            }
            CollectState::Inspecting { page } => {
                if adapter.has_more(&latest) {
                    CollectState::Fetching { page: page + 1 }
                } else {
                    CollectState::Done
                }
            }
            _ => break,
        };
    }

    tracing::info!(
        site = adapter.name(),
        pages = cursor.cycles,
        "page-indexed collection finished"
    );
    Ok(cursor.finish())
}
