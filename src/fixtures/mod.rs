//! Data fixtures and the pipeline that runs them.
//!
//! A fixture is a named seeding step that may depend on other fixtures.
//! The pipeline orders registered fixtures by their dependencies, skips the
//! ones the database ledger already lists, and records each one that loads.

mod base;
mod currency;
mod german;

pub use base::{BaseLocalizationFixture, BASE_LANGUAGE, BASE_LOCALE};
pub use currency::{DefaultCurrencyFixture, FALLBACK_CURRENCY};
pub use german::GermanLocalizationFixture;

use crate::db::Database;
use crate::error::FixtureError;
use crate::seeder::ADMINISTRATOR_ROLE;
use crate::settings::GlobalSettings;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Everything a fixture may read or write while loading.
pub struct FixtureContext<'a> {
    pub db: &'a Database,
    pub settings: &'a mut GlobalSettings,
    /// Role whose first user owns created records
    pub admin_role: &'a str,
}

pub trait Fixture {
    /// Unique name, recorded in the ledger once loaded
    fn name(&self) -> &'static str;

    /// Names of fixtures that must load first
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn load(&self, ctx: &mut FixtureContext<'_>) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub loaded: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

pub struct FixturePipeline {
    db: Database,
    admin_role: String,
    fixtures: Vec<Box<dyn Fixture>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl FixturePipeline {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            admin_role: ADMINISTRATOR_ROLE.to_string(),
            fixtures: Vec::new(),
        }
    }

    /// Pipeline with the German localization and the fixtures it depends on.
    pub fn localization(db: Database) -> Result<Self> {
        let mut pipeline = Self::new(db);
        pipeline.register(BaseLocalizationFixture)?;
        pipeline.register(DefaultCurrencyFixture)?;
        pipeline.register(GermanLocalizationFixture)?;
        Ok(pipeline)
    }

    pub fn with_admin_role(mut self, role: impl Into<String>) -> Self {
        self.admin_role = role.into();
        self
    }

    pub fn register(&mut self, fixture: impl Fixture + 'static) -> Result<()> {
        let name = fixture.name();
        if self.fixtures.iter().any(|f| f.name() == name) {
            return Err(FixtureError::DuplicateFixture(name.to_string()).into());
        }
        self.fixtures.push(Box::new(fixture));
        Ok(())
    }

    /// Registered fixture names, dependencies first.
    ///
    /// Independent fixtures keep their registration order. A dependency that
    /// is not registered is accepted only if the ledger already lists it.
    pub fn execution_order(&self) -> Result<Vec<&'static str>> {
        let index: HashMap<&str, usize> = self
            .fixtures
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name(), i))
            .collect();

        let mut marks: HashMap<&'static str, Mark> = HashMap::new();
        let mut order = Vec::with_capacity(self.fixtures.len());

        for fixture in &self.fixtures {
            self.visit(fixture.as_ref(), &index, &mut marks, &mut order)?;
        }

        Ok(order)
    }

    fn visit(
        &self,
        fixture: &dyn Fixture,
        index: &HashMap<&str, usize>,
        marks: &mut HashMap<&'static str, Mark>,
        order: &mut Vec<&'static str>,
    ) -> Result<()> {
        let name = fixture.name();
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(FixtureError::DependencyCycle {
                    fixture: name.to_string(),
                }
                .into())
            }
            None => {}
        }

        marks.insert(name, Mark::Visiting);
        for dependency in fixture.dependencies() {
            match index.get(dependency) {
                Some(&i) => self.visit(self.fixtures[i].as_ref(), index, marks, order)?,
                None if self.db.is_fixture_loaded(dependency)? => {
                    debug!("{} depends on {}, already loaded", name, dependency);
                }
                None => {
                    return Err(FixtureError::UnknownDependency {
                        fixture: name.to_string(),
                        dependency: dependency.to_string(),
                    }
                    .into())
                }
            }
        }
        marks.insert(name, Mark::Done);
        order.push(name);
        Ok(())
    }

    /// Load every registered fixture that has not been loaded yet.
    ///
    /// Stops at the first failing fixture; fixtures loaded before it stay recorded.
    pub fn run(&self) -> Result<PipelineReport> {
        let order = self.execution_order()?;
        let mut settings = GlobalSettings::new(self.db.clone());
        let mut report = PipelineReport::default();

        for name in order {
            if self.db.is_fixture_loaded(name)? {
                debug!("Fixture {} already loaded, skipping", name);
                report.skipped.push(name);
                continue;
            }

            let fixture = self
                .fixtures
                .iter()
                .find(|f| f.name() == name)
                .context(format!("Fixture '{}' vanished from pipeline", name))?;

            info!("Loading fixture {}", name);
            let mut ctx = FixtureContext {
                db: &self.db,
                settings: &mut settings,
                admin_role: &self.admin_role,
            };
            fixture
                .load(&mut ctx)
                .with_context(|| format!("Fixture '{}' failed to load", name))?;

            self.db.record_fixture(name)?;
            report.loaded.push(name);
        }

        info!(
            "Fixtures done: {} loaded, {} skipped",
            report.loaded.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}
