//! Locale registry: Single source of truth for locale display names.
//!
//! This module provides the locale-name resolution used when a localization
//! record is created, plus the currency each locale defaults to. It uses a
//! singleton pattern with `OnceLock` to ensure thread-safe initialization
//! and access.

use crate::i18n::Locale;
use std::sync::OnceLock;

/// Metadata for a known locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Locale code (e.g., "de_DE", "en")
    pub code: &'static str,

    /// English name of the locale (e.g., "German (Germany)")
    pub name: &'static str,

    /// Name of the locale in its own language (e.g., "Deutsch (Deutschland)")
    pub native_name: &'static str,

    /// ISO 4217 currency used by default in this locale, if it has a region
    pub currency: Option<&'static str>,
}

/// Global locale registry singleton.
///
/// Initialized once on first access and immutable thereafter.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get a locale configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the locale is known
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all known locales.
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Resolve the display name of `locale` as written in `in_locale`.
    ///
    /// When both share a language the native name is returned
    /// (`de_DE` in `de_DE` is "Deutsch (Deutschland)"), otherwise the
    /// English name. Unknown locales resolve to `None`.
    pub fn display_name(&self, locale: &Locale, in_locale: &Locale) -> Option<&'static str> {
        let config = self.get_by_code(locale.code())?;

        if locale.language() == in_locale.language() {
            Some(config.native_name)
        } else {
            Some(config.name)
        }
    }

    /// Default currency for a locale.
    ///
    /// Falls back to the bare language entry's currency when the exact
    /// locale is unknown, which is `None` for every bare language today.
    pub fn currency_for(&self, locale: &Locale) -> Option<&'static str> {
        self.get_by_code(locale.code())
            .or_else(|| self.get_by_code(locale.language()))
            .and_then(|config| config.currency)
    }
}

fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            currency: None,
        },
        LocaleConfig {
            code: "en_US",
            name: "English (United States)",
            native_name: "English (United States)",
            currency: Some("USD"),
        },
        LocaleConfig {
            code: "en_GB",
            name: "English (United Kingdom)",
            native_name: "English (United Kingdom)",
            currency: Some("GBP"),
        },
        LocaleConfig {
            code: "de",
            name: "German",
            native_name: "Deutsch",
            currency: None,
        },
        LocaleConfig {
            code: "de_DE",
            name: "German (Germany)",
            native_name: "Deutsch (Deutschland)",
            currency: Some("EUR"),
        },
        LocaleConfig {
            code: "de_AT",
            name: "German (Austria)",
            native_name: "Deutsch (Österreich)",
            currency: Some("EUR"),
        },
        LocaleConfig {
            code: "de_CH",
            name: "German (Switzerland)",
            native_name: "Deutsch (Schweiz)",
            currency: Some("CHF"),
        },
        LocaleConfig {
            code: "fr",
            name: "French",
            native_name: "français",
            currency: None,
        },
        LocaleConfig {
            code: "fr_FR",
            name: "French (France)",
            native_name: "français (France)",
            currency: Some("EUR"),
        },
        LocaleConfig {
            code: "es",
            name: "Spanish",
            native_name: "español",
            currency: None,
        },
        LocaleConfig {
            code: "es_ES",
            name: "Spanish (Spain)",
            native_name: "español (España)",
            currency: Some("EUR"),
        },
    ]
}
