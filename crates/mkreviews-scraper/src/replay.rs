//! Offline page-source providers backed by saved snapshots.
//!
//! A replay directory holds `page-1.html`, `page-2.html`, ... for page-indexed
//! marketplaces and `scroll-0.html`, `scroll-1.html`, ... for scroll-based
//! ones, where `scroll-N.html` is the document after N scrolls. The height of
//! a scroll snapshot is its byte length, so a repeated snapshot reads as "no
//! growth".

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collect::{PageSource, ScrollSource};
use crate::error::ScraperError;
use crate::types::PageRequest;

/// Serves `page-N.html` for page `N`.
#[derive(Debug, Clone, Default)]
pub struct ReplayPages {
    pages: Vec<String>,
    fetches: usize,
}

impl ReplayPages {
    #[must_use]
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self { pages, fetches: 0 }
    }

    /// Loads consecutive `page-N.html` files starting at 1.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::IoRead`] if a snapshot exists but is unreadable.
    pub fn from_dir(dir: &Path) -> Result<Self, ScraperError> {
        Ok(Self::from_pages(read_series(dir, "page", 1)?))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of `fetch` calls served so far.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}

impl PageSource for ReplayPages {
    async fn fetch(&mut self, request: &PageRequest) -> Result<String, ScraperError> {
        self.fetches += 1;
        usize::try_from(request.page)
            .ok()
            .and_then(|page| page.checked_sub(1))
            .and_then(|index| self.pages.get(index))
            .cloned()
            .ok_or_else(|| ScraperError::Transport {
                target: request.to_string(),
                reason: format!("no snapshot for page {}", request.page),
            })
    }
}

/// Steps through `scroll-N.html` snapshots, one per scroll.
#[derive(Debug, Clone, Default)]
pub struct ReplayScroll {
    snapshots: Vec<String>,
    index: usize,
    opened: bool,
    scrolls: usize,
}

impl ReplayScroll {
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<String>) -> Self {
        Self {
            snapshots,
            ..Self::default()
        }
    }

    /// Loads consecutive `scroll-N.html` files starting at 0.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::IoRead`] if a snapshot exists but is unreadable.
    pub fn from_dir(dir: &Path) -> Result<Self, ScraperError> {
        Ok(Self::from_snapshots(read_series(dir, "scroll", 0)?))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Number of `scroll_and_wait` calls served so far.
    #[must_use]
    pub fn scrolls(&self) -> usize {
        self.scrolls
    }

    fn current(&self) -> Result<&str, ScraperError> {
        if !self.opened {
            return Err(ScraperError::Transport {
                target: "replay".to_owned(),
                reason: "document was not opened".to_owned(),
            });
        }
        self.snapshots
            .get(self.index)
            .map(String::as_str)
            .ok_or_else(|| ScraperError::Transport {
                target: "replay".to_owned(),
                reason: "no scroll snapshots".to_owned(),
            })
    }
}

impl ScrollSource for ReplayScroll {
    async fn open(&mut self, request: &PageRequest) -> Result<(), ScraperError> {
        if self.snapshots.is_empty() {
            return Err(ScraperError::Transport {
                target: request.to_string(),
                reason: "no scroll snapshots".to_owned(),
            });
        }
        self.opened = true;
        self.index = 0;
        Ok(())
    }

    async fn scroll_height(&mut self) -> Result<u64, ScraperError> {
        let snapshot = self.current()?;
        Ok(u64::try_from(snapshot.len()).unwrap_or(u64::MAX))
    }

    /// Advances to the next snapshot; the last one repeats. Does not sleep.
    async fn scroll_and_wait(&mut self, _wait: Duration) -> Result<(), ScraperError> {
        self.current()?;
        self.scrolls += 1;
        if self.index + 1 < self.snapshots.len() {
            self.index += 1;
        }
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, ScraperError> {
        self.current().map(str::to_owned)
    }
}

fn read_series(dir: &Path, stem: &str, first: usize) -> Result<Vec<String>, ScraperError> {
    let mut snapshots = Vec::new();
    for n in first.. {
        let path: PathBuf = dir.join(format!("{stem}-{n}.html"));
        if !path.is_file() {
            break;
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|source| ScraperError::IoRead { path, source })?;
        snapshots.push(content);
    }
    tracing::debug!(dir = %dir.display(), stem, count = snapshots.len(), "loaded replay snapshots");
    Ok(snapshots)
}
