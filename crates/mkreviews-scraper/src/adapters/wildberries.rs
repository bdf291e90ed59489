//! Wildberries feedback feed.
//!
//! The feed is one document that grows as it is scrolled, so there is no page
//! index and no "load more" marker: completion is decided by the scroll
//! driver from document height alone.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{ExtractContext, ReviewUnit, SiteAdapter};
use crate::dom::{attr_at, css, text_at, text_of};
use crate::error::ScraperError;
use crate::normalize::{parse_date, parse_dynamic_params, parse_rating_class, parse_vote_pair};
use crate::record::RecordBuilder;
use crate::types::{FieldValue, PageRequest, Pagination, ReviewRecord};

const COUNTRY_CLASS_PREFIX: &str = "flag-";
const RATING_CLASS_PREFIX: &str = "star";

static UNIT: LazyLock<Selector> = LazyLock::new(|| css(".comments__item"));
static AUTHOR: LazyLock<Selector> = LazyLock::new(|| css(".feedback__header"));
static COUNTRY: LazyLock<Selector> = LazyLock::new(|| css(".feedback__country"));
static STARS: LazyLock<Selector> = LazyLock::new(|| css(".stars-line"));
static TEXT: LazyLock<Selector> = LazyLock::new(|| css(".feedback__text"));
static DATE: LazyLock<Selector> = LazyLock::new(|| css(".feedback__date"));
static VOTES: LazyLock<Selector> = LazyLock::new(|| css(".vote__wrap span"));
static PARAM_ROW: LazyLock<Selector> = LazyLock::new(|| css(".feedback__params-item"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| css("span"));
static PHOTO: LazyLock<Selector> = LazyLock::new(|| css(".j-feedback-photo"));

#[derive(Debug, Clone, Copy, Default)]
pub struct WildberriesAdapter;

impl SiteAdapter for WildberriesAdapter {
    fn name(&self) -> &'static str {
        "wildberries"
    }

    fn pagination(&self) -> Pagination {
        Pagination::Scroll
    }

    fn locate_units<'a>(&self, document: &'a Html) -> Vec<ReviewUnit<'a>> {
        document.select(&UNIT).collect()
    }

    fn extract(
        &self,
        unit: ReviewUnit<'_>,
        ctx: &ExtractContext,
    ) -> Result<ReviewRecord, ScraperError> {
        let mut record = RecordBuilder::new();

        record.set_opt("author", text_at(unit, &AUTHOR).map(FieldValue::Text));

        let country = attr_at(unit, &COUNTRY, "class").and_then(|classes| {
            classes
                .split_whitespace()
                .find_map(|class| class.strip_prefix(COUNTRY_CLASS_PREFIX))
                .filter(|code| !code.is_empty())
        });
        record.set_opt("country", country.map(|c| FieldValue::Text(c.to_owned())));

        if let Some(classes) = attr_at(unit, &STARS, "class") {
            let rating = parse_rating_class(classes, RATING_CLASS_PREFIX)?;
            record.set("rate", FieldValue::Rating(rating));
        }

        if let Some(text) = text_at(unit, &TEXT) {
            record.set_section(None, &text);
        }

        if let Some(raw_date) = text_at(unit, &DATE) {
            let date = parse_date(&raw_date, ctx.now, &ctx.locale)?;
            record.set("date", FieldValue::Date(date));
        }

        let votes: Vec<String> = unit.select(&VOTES).take(2).map(text_of).collect();
        if let [yes, no] = votes.as_slice() {
            let (up, down) = parse_vote_pair(yes, no, &ctx.locale)?;
            record
                .set("upvote", FieldValue::Integer(i64::from(up)))
                .set("downvote", FieldValue::Integer(i64::from(down)));
        }

        for row in unit.select(&PARAM_ROW) {
            let spans: Vec<String> = row.select(&SPAN).map(text_of).collect();
            if let Some((label, values)) = spans.split_first() {
                record.extend(parse_dynamic_params(Some(label.as_str()), values));
            }
        }

        let photos: Vec<String> = unit
            .select(&PHOTO)
            .filter_map(|img| img.value().attr("src"))
            .map(str::to_owned)
            .collect();
        record.set_photos(photos);

        record.finalize(ctx.required_fields.as_slice())
    }

    fn has_more(&self, _markup: &str) -> bool {
        false
    }

    fn request_for_page(&self, base: &str, page: u32) -> Result<PageRequest, ScraperError> {
        if page != 1 {
            return Err(ScraperError::InvalidRequest {
                base: base.to_owned(),
                reason: format!("the feedback feed is a single scrolled page, not page {page}"),
            });
        }
        let url = base.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ScraperError::InvalidRequest {
                base: base.to_owned(),
                reason: "expected an http(s) product URL".to_owned(),
            });
        }
        Ok(PageRequest {
            url: url.to_owned(),
            page,
            capture_selector: None,
        })
    }
}
