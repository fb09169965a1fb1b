use super::{Fixture, FixtureContext};
use crate::seeder::{LocalizationSeeder, SeedTarget};
use anyhow::Result;

/// Adds German (Germany) and makes it the active locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct GermanLocalizationFixture;

impl GermanLocalizationFixture {
    pub const NAME: &'static str = "german_localization";
}

impl Fixture for GermanLocalizationFixture {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["base_localization", "default_currency"]
    }

    fn load(&self, ctx: &mut FixtureContext<'_>) -> Result<()> {
        LocalizationSeeder::new(ctx.db, &mut *ctx.settings, ctx.db)
            .with_target(SeedTarget::german())
            .with_admin_role(ctx.admin_role)
            .run()?;
        Ok(())
    }
}
