use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("malformed field {field}: {reason}")]
    MalformedField { field: String, reason: String },

    #[error("unknown month \"{token}\" in date field")]
    UnknownMonth { token: String },

    #[error("required field {field} is missing")]
    MissingRequired { field: String },

    #[error("timed out after {timeout_ms}ms waiting for {target}")]
    Timeout { target: String, timeout_ms: u64 },

    #[error("page source failed for {target}: {reason}")]
    Transport { target: String, reason: String },

    #[error("pagination limit reached for {base}: exceeded {max_pages} pages")]
    PaginationLimit { base: String, max_pages: usize },

    #[error("cannot build a page request from \"{base}\": {reason}")]
    InvalidRequest { base: String, reason: String },

    #[error("failed to write {}: {source}", .path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScraperError {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }

    /// `true` for record-local failures that are counted and skipped rather
    /// than aborting a run. An unknown month is a malformed date field.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedField { .. } | Self::UnknownMonth { .. } | Self::MissingRequired { .. }
        )
    }

    /// Short label used to bucket skipped records in the run report.
    #[must_use]
    pub fn reason_label(&self) -> &'static str {
        match self {
            Self::MalformedField { .. } => "malformed_field",
            Self::UnknownMonth { .. } => "unknown_month",
            Self::MissingRequired { .. } => "missing_required",
            Self::Timeout { .. } => "timeout",
            Self::Transport { .. } => "transport",
            Self::PaginationLimit { .. } => "pagination_limit",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::IoWrite { .. } => "io_write",
            Self::IoRead { .. } => "io_read",
        }
    }
}
