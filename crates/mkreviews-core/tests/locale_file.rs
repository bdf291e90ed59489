//! Loads the locale tables shipped under `config/`.

use std::path::Path;

use mkreviews_core::{load_locale, Locale};

#[test]
fn shipped_english_locale_matches_builtin_table() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/locale.en.yaml");
    let locale = load_locale(&path).expect("config/locale.en.yaml should load");
    assert_eq!(locale, Locale::english());
}
