//! Marketplace adapters.
//!
//! Each marketplace wraps its reviews in different markup, so every one gets
//! its own [`SiteAdapter`] implementation that knows where the fields live.
//! The rest of the engine only talks to the trait and never branches on which
//! marketplace it is running against, only on [`SiteAdapter::pagination`].

pub mod ozon;
pub mod wildberries;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use mkreviews_core::{Locale, RunConfig};
use scraper::{ElementRef, Html};

use crate::error::ScraperError;
use crate::types::{PageRequest, Pagination, ReviewRecord};

pub use ozon::OzonAdapter;
pub use wildberries::WildberriesAdapter;

/// One review's subtree inside a parsed buffer. Borrowed from the document,
/// so it cannot outlive the parse.
pub type ReviewUnit<'a> = ElementRef<'a>;

/// Per-run inputs every extraction needs.
#[derive(Debug, Clone)]
pub struct ExtractContext {
    /// Reference instant for relative dates.
    pub now: NaiveDateTime,
    pub locale: Locale,
    pub required_fields: Vec<String>,
}

impl ExtractContext {
    #[must_use]
    pub fn from_config(config: &RunConfig, locale: Locale) -> Self {
        Self {
            now: config.now,
            locale,
            required_fields: config.required_fields.clone(),
        }
    }
}

pub trait SiteAdapter {
    /// Short lowercase name used in logs and reports.
    fn name(&self) -> &'static str;

    fn pagination(&self) -> Pagination;

    /// Every review unit in `document`, in document order.
    fn locate_units<'a>(&self, document: &'a Html) -> Vec<ReviewUnit<'a>>;

    /// Pulls one review's fields out of `unit`.
    ///
    /// # Errors
    ///
    /// Returns a malformed-class [`ScraperError`] when a present field cannot
    /// be decoded or a required field is absent.
    fn extract(
        &self,
        unit: ReviewUnit<'_>,
        ctx: &ExtractContext,
    ) -> Result<ReviewRecord, ScraperError>;

    /// Whether `markup` (one fetched page) signals that another page exists.
    fn has_more(&self, markup: &str) -> bool;

    /// Builds the fetch target for `page` (1-based) of the product at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidRequest`] if `base` does not identify a
    /// product or `page` is not valid for this marketplace.
    fn request_for_page(&self, base: &str, page: u32) -> Result<PageRequest, ScraperError>;
}

/// Supported marketplaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    Ozon,
    Wildberries,
}

impl Site {
    pub const ALL: [Site; 2] = [Site::Ozon, Site::Wildberries];

    #[must_use]
    pub fn adapter(self) -> Box<dyn SiteAdapter> {
        match self {
            Site::Ozon => Box::new(OzonAdapter),
            Site::Wildberries => Box::new(WildberriesAdapter),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Site::Ozon => "ozon",
            Site::Wildberries => "wildberries",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ozon" => Ok(Site::Ozon),
            "wildberries" | "wb" => Ok(Site::Wildberries),
            other => Err(format!(
                "unknown site \"{other}\"; expected one of: ozon, wildberries"
            )),
        }
    }
}
