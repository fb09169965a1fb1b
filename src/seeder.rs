use crate::error::ConfigurationError;
use crate::i18n::{Locale, LocaleRegistry};
use crate::repository::{
    ConfigStore, IdentityProvider, Language, LanguageCriteria, Localization,
    LocalizationCriteria, NewLanguage, NewLocalization, Repository, User,
};
use crate::settings::{self, merge_unique};
use anyhow::Result;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Role whose first user owns languages created during seeding
pub const ADMINISTRATOR_ROLE: &str = "ROLE_ADMINISTRATOR";

/// What a seeding run should guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTarget {
    /// Code of the Language record (also merged into `locale.languages`)
    pub language_code: String,
    /// Formatting code of the Localization record
    pub locale: Locale,
    /// Overwrite `locale.locale` with `locale`
    pub set_default_locale: bool,
}

impl SeedTarget {
    /// Language code and formatting code both equal to `locale`, made the default locale.
    pub fn locale(locale: Locale) -> Self {
        Self {
            language_code: locale.code().to_string(),
            locale,
            set_default_locale: true,
        }
    }

    pub fn german() -> Self {
        Self::locale(Locale::german())
    }

    pub fn with_language_code(mut self, code: impl Into<String>) -> Self {
        self.language_code = code.into();
        self
    }

    /// Leave `locale.locale` untouched.
    pub fn keep_default_locale(mut self) -> Self {
        self.set_default_locale = false;
        self
    }
}

impl Default for SeedTarget {
    fn default() -> Self {
        Self::german()
    }
}

/// Outcome of one seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub language_id: i64,
    pub language_created: bool,
    /// `None` when the language was not enabled and no localization could be created
    pub localization_id: Option<i64>,
    pub localization_created: bool,
}

impl SeedReport {
    /// Number of records inserted by the run
    pub fn inserts(&self) -> usize {
        usize::from(self.language_created) + usize::from(self.localization_created)
    }
}

/// Idempotently creates a language and its localization and activates them
/// in global configuration.
pub struct LocalizationSeeder<'a, R, C, I> {
    repository: &'a R,
    config: &'a mut C,
    identity: &'a I,
    target: SeedTarget,
    admin_role: String,
}

impl<'a, R, C, I> LocalizationSeeder<'a, R, C, I>
where
    R: Repository,
    C: ConfigStore,
    I: IdentityProvider,
{
    /// Seeder for German (Germany) owned by the first administrator.
    pub fn new(repository: &'a R, config: &'a mut C, identity: &'a I) -> Self {
        Self {
            repository,
            config,
            identity,
            target: SeedTarget::german(),
            admin_role: ADMINISTRATOR_ROLE.to_string(),
        }
    }

    pub fn with_target(mut self, target: SeedTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_admin_role(mut self, role: impl Into<String>) -> Self {
        self.admin_role = role.into();
        self
    }

    pub fn run(&mut self) -> Result<SeedReport> {
        info!(
            "Seeding localization {} (language {})",
            self.target.locale, self.target.language_code
        );

        let (language, language_created) = self.ensure_language()?;
        let (localization, localization_created) = self.ensure_localization(&language)?;

        self.activate(localization.as_ref())?;

        let report = SeedReport {
            language_id: language.id,
            language_created,
            localization_id: localization.map(|l| l.id),
            localization_created,
        };
        info!(
            "Localization {} seeded ({} insert(s))",
            self.target.locale,
            report.inserts()
        );
        Ok(report)
    }

    fn ensure_language(&self) -> Result<(Language, bool)> {
        let criteria = LanguageCriteria::by_code(&self.target.language_code);
        if let Some(language) = self.repository.find_language(&criteria)? {
            debug!("Language {} already exists (id {})", language.code, language.id);
            return Ok((language, false));
        }

        let owner = self.resolve_admin()?;
        let language = self.repository.create_language(NewLanguage {
            code: self.target.language_code.clone(),
            enabled: true,
            organization_id: Some(owner.organization_id),
            owner_id: Some(owner.id),
        })?;
        info!(
            "Created language {} owned by {}",
            language.code, owner.username
        );
        Ok((language, true))
    }

    fn resolve_admin(&self) -> Result<User> {
        let role = self.identity.find_role(&self.admin_role)?.ok_or_else(|| {
            ConfigurationError::RoleMissing {
                role: self.admin_role.clone(),
            }
        })?;

        let user = self.identity.first_user_with_role(&role)?.ok_or_else(|| {
            ConfigurationError::NoUserWithRole {
                role: self.admin_role.clone(),
            }
        })?;

        Ok(user)
    }

    fn ensure_localization(&self, language: &Language) -> Result<(Option<Localization>, bool)> {
        let criteria = LocalizationCriteria {
            language_id: language.id,
            formatting_code: self.target.locale.code().to_string(),
        };
        if let Some(localization) = self.repository.find_localization(&criteria)? {
            debug!(
                "Localization {} already exists (id {})",
                localization.formatting_code, localization.id
            );
            return Ok((Some(localization), false));
        }

        let localization = self.create_localization()?;
        let created = localization.is_some();
        Ok((localization, created))
    }

    /// Only an enabled language gets a localization; otherwise this is a no-op.
    fn create_localization(&self) -> Result<Option<Localization>> {
        let criteria = LanguageCriteria::by_code(&self.target.language_code).enabled(true);
        let Some(language) = self.repository.find_language(&criteria)? else {
            warn!(
                "Language {} is not enabled, skipping localization {}",
                self.target.language_code, self.target.locale
            );
            return Ok(None);
        };

        let locale = &self.target.locale;
        let title = LocaleRegistry::get()
            .display_name(locale, locale)
            .map(str::to_string)
            .unwrap_or_else(|| locale.code().to_string());

        let localization = self.repository.create_localization(NewLocalization {
            language_id: language.id,
            formatting_code: locale.code().to_string(),
            name: title.clone(),
            default_title: title,
        })?;
        info!(
            "Created localization {} \"{}\" (id {})",
            localization.formatting_code, localization.name, localization.id
        );
        Ok(Some(localization))
    }

    fn activate(&mut self, localization: Option<&Localization>) -> Result<()> {
        let languages_key = settings::locale_key(settings::LANGUAGES);
        let languages = self.config.get(&languages_key)?;
        self.config.set(
            &languages_key,
            merge_unique(languages, Value::String(self.target.language_code.clone())),
        );

        if self.target.set_default_locale {
            self.config.set(
                &settings::locale_key(settings::LOCALE),
                Value::String(self.target.locale.code().to_string()),
            );
        }

        match localization {
            Some(localization) => {
                let key = settings::locale_key(settings::ENABLED_LOCALIZATIONS);
                let enabled = self.config.get(&key)?;
                self.config.set(&key, merge_unique(enabled, json!(localization.id)));
            }
            None => warn!(
                "No localization for {}, enabled localizations left unchanged",
                self.target.locale
            ),
        }

        self.config.flush()
    }
}
