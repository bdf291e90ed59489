use super::*;

use chrono::NaiveDate;
use mkreviews_core::RunConfig;

fn config() -> RunConfig {
    RunConfig {
        now: NaiveDate::from_ymd_opt(2024, 3, 10)
            .and_then(|d| d.and_hms_opt(18, 30, 0))
            .expect("valid reference instant"),
        scroll_wait_ms: 0,
        fetch_timeout_secs: 5,
        no_growth_confirmations: 2,
        required_fields: vec!["author".into(), "rate".into(), "date".into()],
        max_retries: 0,
        retry_backoff_base_ms: 0,
        inter_page_delay_ms: 0,
        max_pages: Some(10),
        locale_path: None,
        log_level: "info".into(),
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mkreviews-cli-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("expected scratch dir");
    dir
}

const WB_FEED: &str = r#"<ul>
<li class="comments__item"><p class="feedback__header">Ирина</p>
<span class="stars-line star5"></span><p class="feedback__text">Хорошо</p>
<span class="feedback__date">Сегодня, 09:05</span></li>
<li class="comments__item"><p class="feedback__header">Олег</p>
<span class="stars-line star2"></span>
<span class="feedback__date">2 марта, 11:40</span></li>
</ul>"#;

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["mkreviews"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_convert_with_default_format() {
    let cli = Cli::try_parse_from([
        "mkreviews", "convert", "--site", "wb", "--input", "raw.html", "--output", "out.csv",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Convert {
            site: Site::Wildberries,
            format: ExportFormat::Csv,
            ..
        })
    ));
}

#[test]
fn parses_collect_with_raw_out() {
    let cli = Cli::try_parse_from([
        "mkreviews",
        "collect",
        "--site",
        "ozon",
        "--url",
        "https://www.ozon.ru/product/chaynik-123456/",
        "--replay-dir",
        "snapshots",
        "--raw-out",
        "raw.html",
        "--output",
        "out.jsonl",
        "--format",
        "jsonl",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Collect {
            site,
            raw_out,
            format,
            ..
        }) => {
            assert_eq!(site, Site::Ozon);
            assert_eq!(raw_out, Some(PathBuf::from("raw.html")));
            assert_eq!(format, ExportFormat::JsonLines);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn help_is_answered_by_the_parser_alone() {
    let err = Cli::try_parse_from(["mkreviews", "--help"]).expect_err("expected help output");
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

    let err = Cli::try_parse_from(["mkreviews", "collect", "--help"])
        .expect_err("expected help output");
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn rejects_unknown_site() {
    let result = Cli::try_parse_from([
        "mkreviews", "convert", "--site", "avito", "--input", "a", "--output", "b",
    ]);
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[test]
fn convert_writes_table_from_raw_buffer() {
    let dir = scratch_dir("convert");
    let input = dir.join("raw.html");
    let output = dir.join("reviews.tsv");
    std::fs::write(&input, WB_FEED).expect("expected raw buffer written");

    let report = commands::run_convert(
        &config(),
        Site::Wildberries,
        &input,
        &output,
        ExportFormat::Tsv,
    )
    .expect("expected conversion to succeed");

    assert_eq!(report.records_seen, 2);
    assert_eq!(report.rows_written, 2);
    let written = std::fs::read_to_string(&output).expect("expected table");
    assert!(written.contains("2024-03-10 09:05:00"));
    assert!(written.contains("2024-03-02 11:40:00"));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn convert_reports_missing_input() {
    let dir = scratch_dir("missing");
    let err = commands::run_convert(
        &config(),
        Site::Ozon,
        &dir.join("absent.html"),
        &dir.join("out.csv"),
        ExportFormat::Csv,
    )
    .expect_err("expected missing input to fail");
    assert!(err.to_string().contains("failed to read raw buffer"));
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn collect_replays_scroll_snapshots_and_persists_buffer() {
    let dir = scratch_dir("collect");
    std::fs::write(dir.join("scroll-0.html"), "<ul></ul>").expect("snapshot");
    std::fs::write(dir.join("scroll-1.html"), WB_FEED).expect("snapshot");
    let raw = dir.join("raw.html");
    let output = dir.join("reviews.csv");

    let report = commands::run_collect(
        &config(),
        Site::Wildberries,
        "https://www.wildberries.ru/catalog/123/feedbacks",
        &dir,
        Some(raw.as_path()),
        &output,
        ExportFormat::Csv,
    )
    .await
    .expect("expected collection to succeed");

    assert_eq!(report.records_seen, 2);
    assert_eq!(
        std::fs::read_to_string(&raw).expect("expected raw buffer"),
        WB_FEED
    );
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn default_locale_is_russian() {
    let locale = commands::resolve_locale(&config()).expect("expected built-in locale");
    assert_eq!(locale.month("марта"), Some(3));
}
