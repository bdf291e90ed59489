//! Ozon review pages.
//!
//! Reviews are served as numbered pages under `/reviews/{product_id}/`. Each
//! review is an element carrying a non-empty `data-review-uuid`, laid out
//! positionally:
//!
//! ```text
//! [data-review-uuid]
//!   div  header   div > div[1] > div = author, last div > div = date
//!   div  body     div[0] a = "Цвет: черный, Размер: M"
//!                 div[1] > div* = sections (label row + text row, or text only)
//!   .aa5-a6[style="width:80%;"]   star bar
//!   ._4-e3 ×2                     "Да N" / "Нет N"
//! ```
//!
//! A page that still offers more reviews has an element whose own text is exactly
//! [`MORE_REVIEWS_SENTINEL`].

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{ExtractContext, ReviewUnit, SiteAdapter};
use crate::dom::{child_elements, css, first_match, text_of};
use crate::error::ScraperError;
use crate::normalize::{parse_date, parse_feature_list, parse_rating, parse_vote_pair};
use crate::record::RecordBuilder;
use crate::types::{FieldValue, PageRequest, Pagination, ReviewRecord};

pub const MORE_REVIEWS_SENTINEL: &str = "Показать больше отзывов";
pub const REVIEWS_CONTAINER: &str = "div[data-widget='webListReviews']";
const REVIEWS_URL: &str = "https://www.ozon.ru/reviews";

static UNIT: LazyLock<Selector> = LazyLock::new(|| css("[data-review-uuid]"));
static DIV: LazyLock<Selector> = LazyLock::new(|| css("div"));
static FEATURE_LINK: LazyLock<Selector> = LazyLock::new(|| css("a"));
static STAR_BAR: LazyLock<Selector> = LazyLock::new(|| css(".aa5-a6"));
static VOTE: LazyLock<Selector> = LazyLock::new(|| css("._4-e3"));

#[derive(Debug, Clone, Copy, Default)]
pub struct OzonAdapter;

impl SiteAdapter for OzonAdapter {
    fn name(&self) -> &'static str {
        "ozon"
    }

    fn pagination(&self) -> Pagination {
        Pagination::Paged
    }

    fn locate_units<'a>(&self, document: &'a Html) -> Vec<ReviewUnit<'a>> {
        document
            .select(&UNIT)
            .filter(|el| {
                el.value()
                    .attr("data-review-uuid")
                    .is_some_and(|uuid| !uuid.trim().is_empty())
            })
            .collect()
    }

    fn extract(
        &self,
        unit: ReviewUnit<'_>,
        ctx: &ExtractContext,
    ) -> Result<ReviewRecord, ScraperError> {
        let blocks = child_elements(unit, "div");
        let mut record = RecordBuilder::new();

        if let Some(header) = blocks.first().copied() {
            record.set_opt("author", author(header).map(FieldValue::Text));
            if let Some(raw_date) = date_text(header) {
                let date = parse_date(&raw_date, ctx.now, &ctx.locale)?;
                record.set("date", FieldValue::Date(date));
            }
        }

        if let Some(body) = blocks.get(1).copied() {
            let body_blocks = child_elements(body, "div");
            if let Some(features) = body_blocks
                .first()
                .and_then(|block| first_match(*block, &FEATURE_LINK))
            {
                for (name, value) in parse_feature_list(&text_of(features)) {
                    record.set(&name, FieldValue::Text(value));
                }
            }
            if let Some(sections) = body_blocks.get(1) {
                for section in child_elements(*sections, "div") {
                    let rows = child_elements(section, "div");
                    let Some(last) = rows.last() else { continue };
                    let label = (rows.len() == 2).then(|| text_of(rows[0]));
                    record.set_section(label.as_deref(), &text_of(*last));
                }
            }
        }

        if let Some(style) = first_match(unit, &STAR_BAR).and_then(|el| el.value().attr("style")) {
            record.set("rate", FieldValue::Rating(parse_rating(style)?));
        }

        let votes: Vec<String> = unit.select(&VOTE).take(2).map(text_of).collect();
        if let [yes, no] = votes.as_slice() {
            let (up, down) = parse_vote_pair(yes, no, &ctx.locale)?;
            record
                .set("upvote", FieldValue::Integer(i64::from(up)))
                .set("downvote", FieldValue::Integer(i64::from(down)));
        }

        record.finalize(ctx.required_fields.as_slice())
    }

    fn has_more(&self, markup: &str) -> bool {
        // Exact text-node match; attributes, comments and quoting reviews do not count.
        if !markup.contains(MORE_REVIEWS_SENTINEL) {
            return false;
        }
        let document = Html::parse_document(markup);
        document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .any(|el| own_text(el) == MORE_REVIEWS_SENTINEL)
    }

    fn request_for_page(&self, base: &str, page: u32) -> Result<PageRequest, ScraperError> {
        if page == 0 {
            return Err(ScraperError::InvalidRequest {
                base: base.to_owned(),
                reason: "pages are numbered from 1".to_owned(),
            });
        }
        let product_id = product_id(base).ok_or_else(|| ScraperError::InvalidRequest {
            base: base.to_owned(),
            reason: "no numeric product id at the end of the path".to_owned(),
        })?;
        Ok(PageRequest {
            url: format!("{REVIEWS_URL}/{product_id}/?page={page}"),
            page,
            capture_selector: Some(REVIEWS_CONTAINER.to_owned()),
        })
    }
}

/// Direct text children only, whitespace-trimmed.
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect::<String>()
        .trim()
        .to_owned()
}

/// `header > div > div[1] > div`
fn author(header: ElementRef<'_>) -> Option<String> {
    let inner = first_match(header, &DIV)?;
    let name_block = child_elements(inner, "div").get(1).copied()?;
    let name = first_match(name_block, &DIV).map_or_else(|| text_of(name_block), text_of);
    (!name.is_empty()).then_some(name)
}

/// `header > div[last] > div`
fn date_text(header: ElementRef<'_>) -> Option<String> {
    let last = child_elements(header, "div").last().copied()?;
    let text = first_match(last, &DIV).map_or_else(|| text_of(last), text_of);
    (!text.is_empty()).then_some(text)
}

/// Product id from a product URL such as
/// `https://www.ozon.ru/product/futbolka-bazovaya-123456789/`, or a bare id.
fn product_id(base: &str) -> Option<&str> {
    let trimmed = base.trim();
    let path = trimmed.split(['?', '#']).next()?.trim_end_matches('/');
    let segment = path.rsplit('/').next()?;
    let id = segment.rsplit('-').next()?;
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then_some(id)
}
