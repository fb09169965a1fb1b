//! Global settings: a staged `ConfigStore` on top of the database.
//!
//! Values written with `set` are kept in memory and read back by `get`
//! until `flush` commits them all in one transaction.

use crate::db::Database;
use crate::repository::ConfigStore;
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub const LOCALE_SECTION: &str = "locale";
pub const CURRENCY_SECTION: &str = "currency";

/// Enabled language codes
pub const LANGUAGES: &str = "languages";
/// The single active locale
pub const LOCALE: &str = "locale";
/// Ids of localizations offered to users
pub const ENABLED_LOCALIZATIONS: &str = "enabled_localizations";
/// Localization used when nothing else is selected
pub const DEFAULT_LOCALIZATION: &str = "default_localization";

pub const DEFAULT_CURRENCY: &str = "default_currency";
pub const ALLOWED_CURRENCIES: &str = "allowed_currencies";

/// Fully qualified key of a localization setting, e.g. `locale.languages`.
pub fn locale_key(name: &str) -> String {
    format!("{}.{}", LOCALE_SECTION, name)
}

/// Fully qualified key of a currency setting, e.g. `currency.default_currency`.
pub fn currency_key(name: &str) -> String {
    format!("{}.{}", CURRENCY_SECTION, name)
}

/// Add `item` to a list-valued setting.
///
/// The result keeps the first occurrence of every element, existing order
/// first, so duplicates already stored are dropped too. An absent or null
/// value counts as an empty list and any other scalar as a one-element list.
pub fn merge_unique(existing: Option<Value>, item: Value) -> Value {
    let values = match existing {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values,
        Some(other) => vec![other],
    };

    let mut merged: Vec<Value> = Vec::with_capacity(values.len() + 1);
    for value in values.into_iter().chain(std::iter::once(item)) {
        if !merged.contains(&value) {
            merged.push(value);
        }
    }

    Value::Array(merged)
}

pub struct GlobalSettings {
    db: Database,
    pending: BTreeMap<String, Value>,
}

impl GlobalSettings {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            pending: BTreeMap::new(),
        }
    }

    /// Whether any value is staged but not yet flushed
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl ConfigStore for GlobalSettings {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        if let Some(value) = self.pending.get(key) {
            return Ok(Some(value.clone()));
        }
        self.db.get_config_value(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        debug!("Staging setting {} = {}", key, value);
        self.pending.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let values: Vec<(&str, &Value)> = self
            .pending
            .iter()
            .map(|(key, value)| (key.as_str(), value))
            .collect();
        self.db.save_config_values(&values)?;

        self.pending.clear();
        Ok(())
    }
}
