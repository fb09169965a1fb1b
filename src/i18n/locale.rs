//! Locale type: validated locale code.
//!
//! A locale is a lowercase language code optionally followed by an
//! underscore and an uppercase region code (e.g., "en", "de_DE").

use anyhow::{bail, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// German (Germany), the locale the German localization fixture seeds.
pub const GERMAN_LOCALE: &str = "de_DE";

static LOCALE_REGEX: OnceLock<Regex> = OnceLock::new();

fn locale_regex() -> &'static Regex {
    LOCALE_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}(?:_[A-Z]{2})?$").expect("locale pattern is valid")
    })
}

/// A validated locale code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    code: String,
}

impl Locale {
    /// Create a Locale from a code string.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code has the `ll` or `ll_RR` shape
    /// * `Err` otherwise
    ///
    /// # Example
    /// ```ignore
    /// let german = Locale::parse("de_DE")?;
    /// assert_eq!(german.language(), "de");
    /// ```
    pub fn parse(code: &str) -> Result<Locale> {
        if !locale_regex().is_match(code) {
            bail!("Invalid locale code: '{}'", code);
        }

        Ok(Locale {
            code: code.to_string(),
        })
    }

    /// The German (Germany) locale.
    pub fn german() -> Locale {
        Locale {
            code: GERMAN_LOCALE.to_string(),
        }
    }

    /// Full locale code (e.g., "de_DE").
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Language part of the code (e.g., "de").
    pub fn language(&self) -> &str {
        self.code.split('_').next().unwrap_or(&self.code)
    }

    /// Region part of the code, if any (e.g., "DE").
    pub fn region(&self) -> Option<&str> {
        self.code.split_once('_').map(|(_, region)| region)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
