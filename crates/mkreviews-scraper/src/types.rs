//! Domain types shared by the normalizer, adapters, and dataset assembler.

use std::fmt;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;

/// Star rating; cannot hold a value outside `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    #[must_use]
    pub fn new(stars: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&stars).then_some(Self(stars))
    }

    #[must_use]
    pub fn stars(self) -> u8 {
        self.0
    }
}

/// A typed review attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Rating(Rating),
    /// Fully resolved; relative terms never survive normalization.
    Date(NaiveDateTime),
    Boolean(bool),
    PhotoRef(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) | FieldValue::PhotoRef(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Rating(r) => write!(f, "{}", r.stars()),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            FieldValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// One review's fields keyed by canonical name, in insertion order.
///
/// Built through [`crate::record::RecordBuilder`], which canonicalizes keys
/// and enforces the required-field set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReviewRecord {
    fields: IndexMap<String, FieldValue>,
}

impl ReviewRecord {
    pub(crate) fn from_fields(fields: IndexMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn into_fields(self) -> IndexMap<String, FieldValue> {
        self.fields
    }
}

/// Which collection strategy a marketplace needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Numbered pages; a sentinel in each page says whether another exists.
    Paged,
    /// One document that grows as it is scrolled.
    Scroll,
}

/// Fetch target handed to a page-source provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    /// 1-based page index; always 1 for scroll-based marketplaces.
    pub page: u32,
    /// CSS selector of the element whose inner markup the provider should
    /// capture, or `None` for the whole document.
    pub capture_selector: Option<String>,
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (page {})", self.url, self.page)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn rating_accepts_one_through_five() {
        for stars in 1..=5 {
            assert_eq!(Rating::new(stars).map(Rating::stars), Some(stars));
        }
    }

    #[test]
    fn rating_rejects_zero_and_six() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
    }

    #[test]
    fn field_value_display_formats_dates_without_fraction() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(FieldValue::Date(date).to_string(), "2024-03-05 10:00:00");
    }

    #[test]
    fn field_value_display_renders_rating_as_star_count() {
        let rating = Rating::new(4).unwrap();
        assert_eq!(FieldValue::Rating(rating).to_string(), "4");
    }

    #[test]
    fn field_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            FieldValue::Text("ok".to_owned()),
            FieldValue::Integer(3),
            FieldValue::Rating(Rating::new(5).unwrap()),
            FieldValue::Boolean(true),
        ])
        .unwrap();
        assert_eq!(json, r#"["ok",3,5,true]"#);
    }

    #[test]
    fn page_request_display_includes_page() {
        let request = PageRequest {
            url: "https://www.ozon.ru/reviews/42/?page=2".to_owned(),
            page: 2,
            capture_selector: None,
        };
        assert_eq!(
            request.to_string(),
            "https://www.ozon.ru/reviews/42/?page=2 (page 2)"
        );
    }
}
