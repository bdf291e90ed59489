//! Accumulates one review's fields before they are frozen into a
//! [`ReviewRecord`].

use indexmap::IndexMap;

use crate::error::ScraperError;
use crate::normalize::canonical_key;
use crate::types::{FieldValue, ReviewRecord};

/// Key used for a free-text block that carries no label of its own.
pub const UNLABELED_SECTION_KEY: &str = "comment";

#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: IndexMap<String, FieldValue>,
}

impl RecordBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under the canonical form of `key`.
    ///
    /// A repeated key keeps its original position and takes the newer value.
    /// Keys that canonicalize to nothing are dropped.
    pub fn set(&mut self, key: &str, value: FieldValue) -> &mut Self {
        let key = canonical_key(key);
        if key.is_empty() {
            tracing::warn!("dropping field with blank key");
            return self;
        }
        self.fields.insert(key, value);
        self
    }

    pub fn set_opt(&mut self, key: &str, value: Option<FieldValue>) -> &mut Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    /// Stores a text section under its label, or under
    /// [`UNLABELED_SECTION_KEY`] when the label is absent or blank.
    pub fn set_section(&mut self, label: Option<&str>, text: &str) -> &mut Self {
        let key = label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(UNLABELED_SECTION_KEY);
        self.set(key, FieldValue::Text(text.trim().to_owned()))
    }

    /// Writes `photos_count` followed by one `photo_{i}` slot per URL.
    pub fn set_photos<I>(&mut self, urls: I) -> &mut Self
    where
        I: IntoIterator<Item = String>,
    {
        let urls: Vec<String> = urls.into_iter().collect();
        self.set(
            "photos_count",
            FieldValue::Integer(i64::try_from(urls.len()).unwrap_or(i64::MAX)),
        );
        for (i, url) in urls.into_iter().enumerate() {
            self.set(&format!("photo_{i}"), FieldValue::PhotoRef(url));
        }
        self
    }

    pub fn extend<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        for (key, value) in entries {
            self.set(&key, value);
        }
        self
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(&canonical_key(key))
    }

    /// Freezes the record once every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingRequired`] naming the first absent field.
    pub fn finalize<S: AsRef<str>>(self, required: &[S]) -> Result<ReviewRecord, ScraperError> {
        if let Some(missing) = required
            .iter()
            .map(|field| canonical_key(field.as_ref()))
            .find(|field| !self.fields.contains_key(field))
        {
            return Err(ScraperError::MissingRequired { field: missing });
        }
        Ok(ReviewRecord::from_fields(self.fields))
    }
}
