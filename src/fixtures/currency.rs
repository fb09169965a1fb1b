use super::{Fixture, FixtureContext, BASE_LOCALE};
use crate::i18n::{Locale, LocaleRegistry};
use crate::repository::ConfigStore;
use crate::settings::{self, merge_unique, ALLOWED_CURRENCIES, DEFAULT_CURRENCY, LOCALE};
use anyhow::Result;
use serde_json::{json, Value};
use tracing::info;

/// Used when the configured locale has no known currency
pub const FALLBACK_CURRENCY: &str = "USD";

/// Derives the default currency from the configured locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCurrencyFixture;

impl DefaultCurrencyFixture {
    pub const NAME: &'static str = "default_currency";
}

impl Fixture for DefaultCurrencyFixture {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["base_localization"]
    }

    fn load(&self, ctx: &mut FixtureContext<'_>) -> Result<()> {
        let locale = match ctx.settings.get(&settings::locale_key(LOCALE))? {
            Some(Value::String(code)) => Locale::parse(&code)?,
            _ => Locale::parse(BASE_LOCALE)?,
        };

        let currency = LocaleRegistry::get()
            .currency_for(&locale)
            .unwrap_or(FALLBACK_CURRENCY);
        info!("Default currency for {} is {}", locale, currency);

        ctx.settings
            .set(&settings::currency_key(DEFAULT_CURRENCY), json!(currency));

        let allowed_key = settings::currency_key(ALLOWED_CURRENCIES);
        let allowed = ctx.settings.get(&allowed_key)?;
        ctx.settings
            .set(&allowed_key, merge_unique(allowed, json!(currency)));

        ctx.settings.flush()
    }
}
