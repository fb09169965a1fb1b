use super::{Fixture, FixtureContext};
use crate::i18n::Locale;
use crate::repository::ConfigStore;
use crate::seeder::{LocalizationSeeder, SeedTarget};
use crate::settings::{self, DEFAULT_LOCALIZATION, LOCALE};
use anyhow::Result;
use serde_json::{json, Value};
use tracing::info;

/// Language every installation starts with
pub const BASE_LANGUAGE: &str = "en";
/// Locale of the base localization, and the default locale until another is chosen
pub const BASE_LOCALE: &str = "en_US";

/// English language plus the `en_US` localization.
///
/// Makes `en_US` the default locale and its localization the default
/// localization, but only where nothing is configured yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseLocalizationFixture;

impl BaseLocalizationFixture {
    pub const NAME: &'static str = "base_localization";
}

impl Fixture for BaseLocalizationFixture {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn load(&self, ctx: &mut FixtureContext<'_>) -> Result<()> {
        let target = SeedTarget::locale(Locale::parse(BASE_LOCALE)?)
            .with_language_code(BASE_LANGUAGE)
            .keep_default_locale();

        let report = LocalizationSeeder::new(ctx.db, &mut *ctx.settings, ctx.db)
            .with_target(target)
            .with_admin_role(ctx.admin_role)
            .run()?;

        let locale_key = settings::locale_key(LOCALE);
        if is_unset(ctx.settings.get(&locale_key)?) {
            ctx.settings.set(&locale_key, json!(BASE_LOCALE));
        }

        if let Some(id) = report.localization_id {
            let default_key = settings::locale_key(DEFAULT_LOCALIZATION);
            if is_unset(ctx.settings.get(&default_key)?) {
                info!("Default localization set to {}", id);
                ctx.settings.set(&default_key, json!(id));
            }
        }

        ctx.settings.flush()
    }
}

fn is_unset(value: Option<Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}
