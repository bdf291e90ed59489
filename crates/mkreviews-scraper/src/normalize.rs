//! Pure conversions from raw marketplace strings to typed [`FieldValue`]s.
//!
//! Nothing here reads the clock: relative dates resolve against the `now`
//! carried by the run configuration, and month names come from the injected
//! [`Locale`].

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use mkreviews_core::Locale;
use regex::Regex;

use crate::error::ScraperError;
use crate::types::{FieldValue, Rating};

/// Width of one star in the percentage-encoded rating bar.
const STAR_WIDTH_PERCENT: f64 = 20.0;

static PERCENT_WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("valid regex"));

/// Decodes a percentage-width rating such as `width:80%;` into stars.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedField`] when no percentage is present or
/// when it is not a whole number of stars between 1 and 5.
pub fn parse_rating(raw: &str) -> Result<Rating, ScraperError> {
    let caps = PERCENT_WIDTH
        .captures(raw)
        .ok_or_else(|| ScraperError::malformed("rate", format!("no percentage in \"{raw}\"")))?;
    let percent: f64 = caps[1]
        .parse()
        .map_err(|_| ScraperError::malformed("rate", format!("bad percentage in \"{raw}\"")))?;

    let stars = percent / STAR_WIDTH_PERCENT;
    let whole = stars.round();
    if (stars - whole).abs() > 1e-6 {
        return Err(ScraperError::malformed(
            "rate",
            format!("{percent}% is not a whole number of stars"),
        ));
    }
    if !(f64::from(Rating::MIN)..=f64::from(Rating::MAX)).contains(&whole) {
        return Err(ScraperError::malformed(
            "rate",
            format!("{percent}% is outside 1..=5 stars"),
        ));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let stars = whole as u8;
    Rating::new(stars)
        .ok_or_else(|| ScraperError::malformed("rate", format!("{stars} stars is out of range")))
}

/// Decodes a class-suffix rating such as `stars-line star4`.
///
/// The first class token made of `prefix` followed by a single digit wins.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedField`] when no such token exists or the
/// digit is outside 1..=5.
pub fn parse_rating_class(class_attr: &str, prefix: &str) -> Result<Rating, ScraperError> {
    let digit = class_attr
        .split_whitespace()
        .filter_map(|token| token.strip_prefix(prefix))
        .find_map(|rest| {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c.to_digit(10),
                _ => None,
            }
        })
        .ok_or_else(|| {
            ScraperError::malformed("rate", format!("no {prefix}N class in \"{class_attr}\""))
        })?;

    u8::try_from(digit)
        .ok()
        .and_then(Rating::new)
        .ok_or_else(|| ScraperError::malformed("rate", format!("{digit} stars is out of range")))
}

/// Parses the helpful/unhelpful vote counters, e.g. `("Да 12", "Нет 3")`.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedField`] if either counter is not a
/// non-negative integer once its label is removed.
pub fn parse_vote_pair(
    raw_yes: &str,
    raw_no: &str,
    locale: &Locale,
) -> Result<(u32, u32), ScraperError> {
    let yes = parse_vote(raw_yes, &locale.vote_yes, "upvote")?;
    let no = parse_vote(raw_no, &locale.vote_no, "downvote")?;
    Ok((yes, no))
}

fn parse_vote(raw: &str, label: &str, field: &str) -> Result<u32, ScraperError> {
    let trimmed = raw.trim();
    let count = strip_prefix_ignore_case(trimmed, label)
        .unwrap_or(trimmed)
        .trim();
    count
        .parse::<u32>()
        .map_err(|_| ScraperError::malformed(field, format!("\"{raw}\" is not a vote count")))
}

/// Resolves a review date to an absolute timestamp.
///
/// Accepted forms, after an optional leading "edited" tag:
///
/// | input              | result (`now` = 2024-03-10)  |
/// |--------------------|------------------------------|
/// | `Сегодня, 14:05`   | 2024-03-10 14:05             |
/// | `Вчера, 09:00`     | 2024-03-09 09:00             |
/// | `5 марта, 10:00`   | 2024-03-05 10:00             |
/// | `12 марта 2023`    | 2023-03-12 00:00             |
///
/// # Errors
///
/// - [`ScraperError::UnknownMonth`] if the month token is not in the locale.
/// - [`ScraperError::MalformedField`] for a non-numeric or out-of-range day,
///   year, hour, or minute.
pub fn parse_date(
    raw: &str,
    now: NaiveDateTime,
    locale: &Locale,
) -> Result<NaiveDateTime, ScraperError> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = strip_prefix_ignore_case(&collapsed, locale.edited_prefix.trim())
        .unwrap_or(&collapsed)
        .trim();
    if text.is_empty() {
        return Err(ScraperError::malformed("date", "empty date"));
    }

    let (date_part, time_part) = split_time(text);
    let time = match time_part {
        Some(t) => parse_time(t)?,
        None => NaiveTime::MIN,
    };

    let keyword = date_part.to_lowercase();
    let date = if keyword == locale.today {
        now.date()
    } else if keyword == locale.yesterday {
        now.date()
            .pred_opt()
            .ok_or_else(|| ScraperError::malformed("date", "no day before the reference date"))?
    } else {
        parse_calendar_date(date_part, now.year(), locale)?
    };

    Ok(date.and_time(time))
}

/// Separates `"<date>, HH:MM"` or `"<date> HH:MM"` into its two halves.
fn split_time(text: &str) -> (&str, Option<&str>) {
    if let Some((date, time)) = text.split_once(',') {
        return (date.trim(), Some(time.trim()));
    }
    match text.rsplit_once(' ') {
        Some((date, time)) if time.contains(':') => (date.trim(), Some(time)),
        _ => (text, None),
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, ScraperError> {
    let (hour, minute) = raw
        .split_once(':')
        .ok_or_else(|| ScraperError::malformed("date", format!("time \"{raw}\" is not HH:MM")))?;
    let hour: u32 = hour
        .trim()
        .parse()
        .map_err(|_| ScraperError::malformed("date", format!("hour \"{hour}\" is not a number")))?;
    let minute: u32 = minute.trim().parse().map_err(|_| {
        ScraperError::malformed("date", format!("minute \"{minute}\" is not a number"))
    })?;
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| ScraperError::malformed("date", format!("time {hour}:{minute} is out of range")))
}

/// Parses `"D <month> [YYYY]"`; trailing tokens such as `г.` are ignored.
fn parse_calendar_date(
    raw: &str,
    default_year: i32,
    locale: &Locale,
) -> Result<NaiveDate, ScraperError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let (day, month) = match tokens.as_slice() {
        [day, month, ..] => (*day, *month),
        _ => {
            return Err(ScraperError::malformed(
                "date",
                format!("\"{raw}\" is not a day-month date"),
            ))
        }
    };

    let day: u32 = day
        .parse()
        .map_err(|_| ScraperError::malformed("date", format!("day \"{day}\" is not a number")))?;
    let month_number = locale.month(month).ok_or_else(|| ScraperError::UnknownMonth {
        token: month.to_owned(),
    })?;
    let year = match tokens.get(2) {
        Some(token) => {
            let digits: String = token.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<i32>().map_err(|_| {
                ScraperError::malformed("date", format!("year \"{token}\" is not a number"))
            })?
        }
        None => default_year,
    };

    NaiveDate::from_ymd_opt(year, month_number, day).ok_or_else(|| {
        ScraperError::malformed(
            "date",
            format!("day {day} is out of range for {month} {year}"),
        )
    })
}

/// Expands one labeled parameter row into `param_{label}_{index}` entries.
///
/// Values that parse as integers are stored as [`FieldValue::Integer`]. An
/// absent or blank label yields an empty map.
#[must_use]
pub fn parse_dynamic_params<S: AsRef<str>>(
    label: Option<&str>,
    values: &[S],
) -> IndexMap<String, FieldValue> {
    let Some(label) = label
        .map(|l| canonical_key(l.trim().trim_end_matches(':')))
        .filter(|l| !l.is_empty())
    else {
        return IndexMap::new();
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let value = value.as_ref().trim();
            let typed = value.parse::<i64>().map_or_else(
                |_| FieldValue::Text(value.to_owned()),
                FieldValue::Integer,
            );
            (format!("param_{label}_{index}"), typed)
        })
        .collect()
}

/// Splits a product feature line such as `Цвет: черный, Размер: M`.
///
/// A comma-separated piece without a `:` continues the previous value, so
/// `Цвет: черный, белый` keeps both colors.
#[must_use]
pub fn parse_feature_list(raw: &str) -> Vec<(String, String)> {
    let mut features: Vec<(String, String)> = Vec::new();
    for piece in raw.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        match piece.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                features.push((canonical_key(name), value.trim().to_owned()));
            }
            _ => {
                if let Some((_, value)) = features.last_mut() {
                    value.push_str(", ");
                    value.push_str(piece);
                }
            }
        }
    }
    features
}

/// Lowercases a raw label and joins its words with underscores.
#[must_use]
pub fn canonical_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Case-insensitive `strip_prefix` that respects char boundaries.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let mut rest = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = rest.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    let offset = rest.next().map_or(text.len(), |(i, _)| i);
    Some(&text[offset..])
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
