//! Collaborator seams used by the seeder.
//!
//! The seeder only talks to these traits. `db::Database` implements
//! `Repository` and `IdentityProvider`; `settings::GlobalSettings`
//! implements `ConfigStore`.

use anyhow::Result;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: i64,
    pub code: String,
    pub enabled: bool,
    pub organization_id: Option<i64>,
    pub owner_id: Option<i64>,
}

/// Language fields before the backend assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLanguage {
    pub code: String,
    pub enabled: bool,
    pub organization_id: Option<i64>,
    pub owner_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    pub id: i64,
    pub language_id: i64,
    pub formatting_code: String,
    pub name: String,
    pub default_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocalization {
    pub language_id: i64,
    pub formatting_code: String,
    pub name: String,
    pub default_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub role: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub organization_id: i64,
}

/// Field-equality filter for languages. `None` fields are not filtered on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCriteria {
    pub code: String,
    pub enabled: Option<bool>,
}

impl LanguageCriteria {
    pub fn by_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            enabled: None,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

/// Field-equality filter for localizations, keyed by (language, formatting code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationCriteria {
    pub language_id: i64,
    pub formatting_code: String,
}

/// Persisted languages and localizations.
///
/// `create_*` persist and commit in one step; the returned record carries
/// the id the backend assigned.
pub trait Repository {
    fn find_language(&self, criteria: &LanguageCriteria) -> Result<Option<Language>>;

    fn create_language(&self, language: NewLanguage) -> Result<Language>;

    fn find_localization(&self, criteria: &LocalizationCriteria) -> Result<Option<Localization>>;

    fn create_localization(&self, localization: NewLocalization) -> Result<Localization>;
}

/// Global key-value configuration.
///
/// `set` only stages a value; nothing is durable until `flush`.
pub trait ConfigStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&mut self, key: &str, value: Value);

    fn flush(&mut self) -> Result<()>;
}

/// Role and user lookups used to find a record owner.
pub trait IdentityProvider {
    fn find_role(&self, role: &str) -> Result<Option<Role>>;

    /// First user (lowest id) holding `role`.
    fn first_user_with_role(&self, role: &Role) -> Result<Option<User>>;
}
