//! Review extraction for marketplace pages.
//!
//! Raw markup goes through a [`SiteAdapter`] that finds review units and
//! normalizes their fields into [`ReviewRecord`]s; [`assemble`] unions those
//! into a [`Dataset`] and [`export`] writes it out. The [`collect`] drivers
//! produce the raw markup from a page-source provider.

pub mod adapters;
pub mod batch;
pub mod collect;
pub mod dataset;
mod dom;
pub mod error;
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod replay;
pub mod types;

pub use adapters::{ExtractContext, ReviewUnit, Site, SiteAdapter};
pub use batch::{extract_batch, extract_pages, BatchOutcome, SkipCounts};
pub use collect::{
    collect_paged, collect_scrolling, CollectOptions, CollectState, Collected, PageSource,
    RetryPolicy, ScrollSource,
};
pub use dataset::{assemble, Cell, Dataset};
pub use error::ScraperError;
pub use export::{export, read_delimited, ExportFormat};
pub use pipeline::{build_dataset, run_extraction, RunReport};
pub use record::RecordBuilder;
pub use replay::{ReplayPages, ReplayScroll};
pub use types::{FieldValue, PageRequest, Pagination, Rating, ReviewRecord};
