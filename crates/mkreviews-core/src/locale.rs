//! Locale tables consumed by the field normalizer.
//!
//! A [`Locale`] is injected per run rather than read from module state, so a
//! run against an English storefront only needs a different YAML file:
//!
//! ```yaml
//! months:
//!   january: 1
//!   february: 2
//! today: today
//! yesterday: yesterday
//! edited_prefix: "edited "
//! vote_yes: "Yes"
//! vote_no: "No"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Month names, relative-date keywords, and vote labels for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Month token (as it appears in review dates) to month number 1..=12.
    pub months: HashMap<String, u32>,
    pub today: String,
    pub yesterday: String,
    /// Tag prefixed to dates of edited reviews, including its trailing space.
    pub edited_prefix: String,
    pub vote_yes: String,
    pub vote_no: String,
}

impl Locale {
    /// Russian table used by Ozon and Wildberries (genitive month names).
    #[must_use]
    pub fn russian() -> Self {
        let months = [
            "января",
            "февраля",
            "марта",
            "апреля",
            "мая",
            "июня",
            "июля",
            "августа",
            "сентября",
            "октября",
            "ноября",
            "декабря",
        ];
        Self {
            months: month_table(&months),
            today: "сегодня".to_string(),
            yesterday: "вчера".to_string(),
            edited_prefix: "изменен ".to_string(),
            vote_yes: "Да".to_string(),
            vote_no: "Нет".to_string(),
        }
    }

    #[must_use]
    pub fn english() -> Self {
        let months = [
            "january",
            "february",
            "march",
            "april",
            "may",
            "june",
            "july",
            "august",
            "september",
            "october",
            "november",
            "december",
        ];
        Self {
            months: month_table(&months),
            today: "today".to_string(),
            yesterday: "yesterday".to_string(),
            edited_prefix: "edited ".to_string(),
            vote_yes: "Yes".to_string(),
            vote_no: "No".to_string(),
        }
    }

    /// Looks up a month token case-insensitively, ignoring a trailing `.`.
    #[must_use]
    pub fn month(&self, token: &str) -> Option<u32> {
        let key = token.trim().trim_end_matches('.').to_lowercase();
        self.months.get(&key).copied()
    }

    /// Lowercases every lookup key so table entries match case-insensitively.
    fn normalized(mut self) -> Self {
        self.months = self
            .months
            .into_iter()
            .map(|(name, number)| (name.trim().to_lowercase(), number))
            .collect();
        self.today = self.today.trim().to_lowercase();
        self.yesterday = self.yesterday.trim().to_lowercase();
        self
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::russian()
    }
}

fn month_table(names: &[&str; 12]) -> HashMap<String, u32> {
    names
        .iter()
        .zip(1u32..)
        .map(|(name, number)| ((*name).to_string(), number))
        .collect()
}

/// Load and validate a locale table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_locale(path: &Path) -> Result<Locale, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LocaleFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_locale(&content)
}

/// Parse and validate a locale table from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML does not parse or fails validation.
pub fn parse_locale(yaml: &str) -> Result<Locale, ConfigError> {
    let locale: Locale = serde_yaml::from_str(yaml)?;
    let locale = locale.normalized();
    validate_locale(&locale)?;
    Ok(locale)
}

fn validate_locale(locale: &Locale) -> Result<(), ConfigError> {
    if locale.months.is_empty() {
        return Err(ConfigError::Validation(
            "month table must not be empty".to_string(),
        ));
    }

    for (name, number) in &locale.months {
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "month names must be non-empty".to_string(),
            ));
        }
        if !(1..=12).contains(number) {
            return Err(ConfigError::Validation(format!(
                "month '{name}' maps to {number}; must be 1 through 12"
            )));
        }
    }

    if locale.today.is_empty() || locale.yesterday.is_empty() {
        return Err(ConfigError::Validation(
            "today/yesterday keywords must be non-empty".to_string(),
        ));
    }

    if locale.today == locale.yesterday {
        return Err(ConfigError::Validation(format!(
            "today and yesterday share the keyword '{}'",
            locale.today
        )));
    }

    Ok(())
}
