use chrono::NaiveDate;

use super::*;

fn reference_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

// -----------------------------------------------------------------------
// parse_rating
// -----------------------------------------------------------------------

#[test]
fn parse_rating_maps_every_star_width() {
    for (width, stars) in [(20, 1), (40, 2), (60, 3), (80, 4), (100, 5)] {
        let raw = format!("width:{width}%;");
        assert_eq!(parse_rating(&raw).unwrap().stars(), stars, "width {width}%");
    }
}

#[test]
fn parse_rating_rejects_zero_width() {
    let err = parse_rating("width:0%;").unwrap_err();
    assert!(matches!(err, ScraperError::MalformedField { ref field, .. } if field == "rate"));
}

#[test]
fn parse_rating_rejects_width_above_five_stars() {
    assert!(parse_rating("width:120%;").unwrap_err().is_malformed());
}

#[test]
fn parse_rating_rejects_fractional_stars() {
    assert!(parse_rating("width:50%;").is_err());
    assert!(parse_rating("width:79.5%").is_err());
}

#[test]
fn parse_rating_accepts_decimal_whole_star() {
    assert_eq!(parse_rating("width: 60.0%").unwrap().stars(), 3);
}

#[test]
fn parse_rating_rejects_missing_percentage() {
    assert!(parse_rating("width:80px").is_err());
    assert!(parse_rating("").is_err());
}

// -----------------------------------------------------------------------
// parse_rating_class
// -----------------------------------------------------------------------

#[test]
fn parse_rating_class_reads_suffix_digit() {
    assert_eq!(
        parse_rating_class("stars-line star4", "star").unwrap().stars(),
        4
    );
}

#[test]
fn parse_rating_class_skips_similar_tokens() {
    assert_eq!(
        parse_rating_class("stars-line feedback__rating star5", "star")
            .unwrap()
            .stars(),
        5
    );
}

#[test]
fn parse_rating_class_rejects_zero_and_missing() {
    assert!(parse_rating_class("stars-line star0", "star").is_err());
    assert!(parse_rating_class("stars-line", "star").is_err());
}

// -----------------------------------------------------------------------
// parse_vote_pair
// -----------------------------------------------------------------------

#[test]
fn parse_vote_pair_strips_labels() {
    let locale = Locale::russian();
    assert_eq!(parse_vote_pair("Да 12", "Нет 3", &locale).unwrap(), (12, 3));
}

#[test]
fn parse_vote_pair_accepts_bare_numbers() {
    let locale = Locale::russian();
    assert_eq!(parse_vote_pair(" 7 ", "0", &locale).unwrap(), (7, 0));
}

#[test]
fn parse_vote_pair_label_match_is_case_insensitive() {
    let locale = Locale::english();
    assert_eq!(parse_vote_pair("yes 4", "NO 1", &locale).unwrap(), (4, 1));
}

#[test]
fn parse_vote_pair_rejects_negative_and_text() {
    let locale = Locale::russian();
    let err = parse_vote_pair("Да -1", "Нет 2", &locale).unwrap_err();
    assert!(matches!(err, ScraperError::MalformedField { ref field, .. } if field == "upvote"));

    let err = parse_vote_pair("Да 1", "Нет много", &locale).unwrap_err();
    assert!(matches!(err, ScraperError::MalformedField { ref field, .. } if field == "downvote"));
}

// -----------------------------------------------------------------------
// parse_date
// -----------------------------------------------------------------------

#[test]
fn parse_date_resolves_today() {
    let got = parse_date("Сегодня, 14:05", reference_now(), &Locale::russian()).unwrap();
    assert_eq!(got, at(2024, 3, 10, 14, 5));
}

#[test]
fn parse_date_resolves_yesterday() {
    let got = parse_date("Вчера, 09:00", reference_now(), &Locale::russian()).unwrap();
    assert_eq!(got, at(2024, 3, 9, 9, 0));
}

#[test]
fn parse_date_defaults_year_to_reference() {
    let got = parse_date("5 марта, 10:00", reference_now(), &Locale::russian()).unwrap();
    assert_eq!(got, at(2024, 3, 5, 10, 0));
}

#[test]
fn parse_date_reads_explicit_year() {
    let got = parse_date("5 марта 2023, 10:00", reference_now(), &Locale::russian()).unwrap();
    assert_eq!(got, at(2023, 3, 5, 10, 0));
}

#[test]
fn parse_date_strips_edited_tag_and_defaults_midnight() {
    let got = parse_date("изменен 12 марта 2023", reference_now(), &Locale::russian()).unwrap();
    assert_eq!(got, at(2023, 3, 12, 0, 0));
}

#[test]
fn parse_date_accepts_time_without_comma() {
    let got = parse_date("1 января 09:30", reference_now(), &Locale::russian()).unwrap();
    assert_eq!(got, at(2024, 1, 1, 9, 30));
}

#[test]
fn parse_date_yesterday_crosses_year_boundary() {
    let new_year = at(2024, 1, 1, 8, 0);
    let got = parse_date("вчера, 23:59", new_year, &Locale::russian()).unwrap();
    assert_eq!(got, at(2023, 12, 31, 23, 59));
}

#[test]
fn parse_date_collapses_non_breaking_spaces() {
    let got = parse_date("5\u{a0}марта,\u{a0}10:00", reference_now(), &Locale::russian()).unwrap();
    assert_eq!(got, at(2024, 3, 5, 10, 0));
}

#[test]
fn parse_date_rejects_unknown_month() {
    let err = parse_date("5 мартобря, 10:00", reference_now(), &Locale::russian()).unwrap_err();
    assert!(
        matches!(err, ScraperError::UnknownMonth { ref token } if token == "мартобря"),
        "expected UnknownMonth, got: {err:?}"
    );
    assert!(err.is_malformed());
}

#[test]
fn parse_date_rejects_out_of_range_day() {
    let err = parse_date("31 февраля", reference_now(), &Locale::russian()).unwrap_err();
    assert!(matches!(err, ScraperError::MalformedField { .. }));
}

#[test]
fn parse_date_rejects_out_of_range_time() {
    assert!(parse_date("Сегодня, 25:00", reference_now(), &Locale::russian()).is_err());
    assert!(parse_date("Сегодня, 10:61", reference_now(), &Locale::russian()).is_err());
}

#[test]
fn parse_date_rejects_non_numeric_day() {
    let err = parse_date("пятое марта", reference_now(), &Locale::russian()).unwrap_err();
    assert!(matches!(err, ScraperError::MalformedField { .. }));
}

#[test]
fn parse_date_rejects_empty_input() {
    assert!(parse_date("  ", reference_now(), &Locale::russian()).is_err());
}

#[test]
fn parse_date_uses_injected_locale() {
    let got = parse_date("edited 2 March 2022", reference_now(), &Locale::english()).unwrap();
    assert_eq!(got, at(2022, 3, 2, 0, 0));
}

// -----------------------------------------------------------------------
// parse_dynamic_params
// -----------------------------------------------------------------------

#[test]
fn parse_dynamic_params_indexes_values() {
    let params = parse_dynamic_params(Some("Размер:"), &["M", "L"]);
    let keys: Vec<&str> = params.keys().map(String::as_str).collect();
    assert_eq!(keys, ["param_размер_0", "param_размер_1"]);
    assert_eq!(params["param_размер_1"], FieldValue::Text("L".to_owned()));
}

#[test]
fn parse_dynamic_params_types_integers() {
    let params = parse_dynamic_params(Some("Рост"), &["170"]);
    assert_eq!(params["param_рост_0"], FieldValue::Integer(170));
}

#[test]
fn parse_dynamic_params_without_label_is_empty() {
    assert!(parse_dynamic_params(None, &["x"]).is_empty());
    assert!(parse_dynamic_params(Some(" : "), &["x"]).is_empty());
}

// -----------------------------------------------------------------------
// parse_feature_list / canonical_key
// -----------------------------------------------------------------------

#[test]
fn parse_feature_list_splits_pairs() {
    let features = parse_feature_list("Цвет: черный, Размер: M");
    assert_eq!(
        features,
        vec![
            ("цвет".to_owned(), "черный".to_owned()),
            ("размер".to_owned(), "M".to_owned()),
        ]
    );
}

#[test]
fn parse_feature_list_keeps_commas_inside_values() {
    let features = parse_feature_list("Цвет: черный, белый");
    assert_eq!(features, vec![("цвет".to_owned(), "черный, белый".to_owned())]);
}

#[test]
fn parse_feature_list_ignores_leading_orphan() {
    assert!(parse_feature_list("без названия").is_empty());
}

#[test]
fn canonical_key_joins_words() {
    assert_eq!(canonical_key("  Срок   Использования "), "срок_использования");
    assert_eq!(canonical_key("author"), "author");
}
