use crate::repository::{
    IdentityProvider, Language, LanguageCriteria, Localization, LocalizationCriteria,
    NewLanguage, NewLocalization, Repository, Role, User,
};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS organizations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        organization_id INTEGER NOT NULL REFERENCES organizations(id),
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS roles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        role TEXT NOT NULL UNIQUE,
        label TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS user_roles (
        user_id INTEGER NOT NULL REFERENCES users(id),
        role_id INTEGER NOT NULL REFERENCES roles(id),
        PRIMARY KEY (user_id, role_id)
    );

    CREATE TABLE IF NOT EXISTS languages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL UNIQUE,
        enabled INTEGER NOT NULL DEFAULT 0,
        organization_id INTEGER REFERENCES organizations(id),
        owner_id INTEGER REFERENCES users(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS localizations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        language_id INTEGER NOT NULL REFERENCES languages(id),
        formatting_code TEXT NOT NULL,
        name TEXT NOT NULL,
        default_title TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (language_id, formatting_code)
    );

    CREATE TABLE IF NOT EXISTS config_values (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS loaded_fixtures (
        name TEXT PRIMARY KEY,
        loaded_at TEXT NOT NULL
    );
";

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database and ensure all tables exist
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        conn.execute_batch(SCHEMA)
            .context("Failed to create tables")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Database connection mutex poisoned"))
    }

    // ==================== Identity ====================

    pub fn create_organization(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO organizations (name) VALUES (?1)", params![name])
            .context("Failed to create organization")?;
        Ok(conn.last_insert_rowid())
    }

    pub fn create_role(&self, role: &str, label: &str) -> Result<Role> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO roles (role, label) VALUES (?1, ?2)",
            params![role, label],
        )
        .context("Failed to create role")?;

        Ok(Role {
            id: conn.last_insert_rowid(),
            role: role.to_string(),
            label: label.to_string(),
        })
    }

    pub fn create_user(&self, username: &str, organization_id: i64) -> Result<User> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (username, organization_id, created_at) VALUES (?1, ?2, ?3)",
            params![username, organization_id, Utc::now().to_rfc3339()],
        )
        .context("Failed to create user")?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            organization_id,
        })
    }

    pub fn assign_role(&self, user_id: i64, role_id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?1, ?2)",
            params![user_id, role_id],
        )
        .context("Failed to assign role")?;
        Ok(())
    }

    // ==================== Languages & Localizations ====================

    /// Enable or disable a language. Returns false if no language has that code.
    pub fn set_language_enabled(&self, code: &str, enabled: bool) -> Result<bool> {
        let conn = self.conn()?;
        let rows_affected = conn
            .execute(
                "UPDATE languages SET enabled = ?1, updated_at = ?2 WHERE code = ?3",
                params![enabled, Utc::now().to_rfc3339(), code],
            )
            .context("Failed to update language")?;
        Ok(rows_affected > 0)
    }

    pub fn language_count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM languages", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn localization_count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM localizations", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ==================== Configuration Values ====================

    pub fn get_config_value(&self, key: &str) -> Result<Option<Value>> {
        let conn = self.conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM config_values WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|text| {
            serde_json::from_str::<Value>(&text)
                .context(format!("Stored value for '{}' is not valid JSON", key))
        })
        .transpose()
    }

    /// Write all values in a single transaction; either every key is stored or none is.
    pub fn save_config_values(&self, values: &[(&str, &Value)]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().context("Failed to begin transaction")?;
        let now = Utc::now().to_rfc3339();

        for (key, value) in values {
            tx.execute(
                "INSERT INTO config_values (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value.to_string(), now],
            )
            .context(format!("Failed to save config value '{}'", key))?;
        }

        tx.commit().context("Failed to commit config values")?;
        debug!("Committed {} config value(s)", values.len());
        Ok(())
    }

    // ==================== Fixture Ledger ====================

    pub fn is_fixture_loaded(&self, name: &str) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM loaded_fixtures WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn record_fixture(&self, name: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO loaded_fixtures (name, loaded_at) VALUES (?1, ?2)",
            params![name, Utc::now().to_rfc3339()],
        )
        .context("Failed to record loaded fixture")?;
        Ok(())
    }

    /// Names of loaded fixtures in load order
    pub fn loaded_fixtures(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM loaded_fixtures ORDER BY rowid")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

fn language_from_row(row: &Row<'_>) -> rusqlite::Result<Language> {
    Ok(Language {
        id: row.get(0)?,
        code: row.get(1)?,
        enabled: row.get::<_, i64>(2)? != 0,
        organization_id: row.get(3)?,
        owner_id: row.get(4)?,
    })
}

fn localization_from_row(row: &Row<'_>) -> rusqlite::Result<Localization> {
    Ok(Localization {
        id: row.get(0)?,
        language_id: row.get(1)?,
        formatting_code: row.get(2)?,
        name: row.get(3)?,
        default_title: row.get(4)?,
    })
}

impl Repository for Database {
    fn find_language(&self, criteria: &LanguageCriteria) -> Result<Option<Language>> {
        let conn = self.conn()?;
        let language = conn
            .query_row(
                "SELECT id, code, enabled, organization_id, owner_id FROM languages
                 WHERE code = ?1 AND (?2 IS NULL OR enabled = ?2)",
                params![criteria.code, criteria.enabled],
                language_from_row,
            )
            .optional()
            .context("Failed to look up language")?;
        Ok(language)
    }

    fn create_language(&self, language: NewLanguage) -> Result<Language> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO languages (code, enabled, organization_id, owner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                language.code,
                language.enabled,
                language.organization_id,
                language.owner_id,
                now
            ],
        )
        .context(format!("Failed to create language '{}'", language.code))?;

        Ok(Language {
            id: conn.last_insert_rowid(),
            code: language.code,
            enabled: language.enabled,
            organization_id: language.organization_id,
            owner_id: language.owner_id,
        })
    }

    fn find_localization(&self, criteria: &LocalizationCriteria) -> Result<Option<Localization>> {
        let conn = self.conn()?;
        let localization = conn
            .query_row(
                "SELECT id, language_id, formatting_code, name, default_title FROM localizations
                 WHERE language_id = ?1 AND formatting_code = ?2
                 ORDER BY id LIMIT 1",
                params![criteria.language_id, criteria.formatting_code],
                localization_from_row,
            )
            .optional()
            .context("Failed to look up localization")?;
        Ok(localization)
    }

    fn create_localization(&self, localization: NewLocalization) -> Result<Localization> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO localizations (language_id, formatting_code, name, default_title, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                localization.language_id,
                localization.formatting_code,
                localization.name,
                localization.default_title,
                now
            ],
        )
        .context(format!(
            "Failed to create localization '{}'",
            localization.formatting_code
        ))?;

        Ok(Localization {
            id: conn.last_insert_rowid(),
            language_id: localization.language_id,
            formatting_code: localization.formatting_code,
            name: localization.name,
            default_title: localization.default_title,
        })
    }
}

impl IdentityProvider for Database {
    fn find_role(&self, role: &str) -> Result<Option<Role>> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                "SELECT id, role, label FROM roles WHERE role = ?1",
                params![role],
                |row| {
                    Ok(Role {
                        id: row.get(0)?,
                        role: row.get(1)?,
                        label: row.get(2)?,
                    })
                },
            )
            .optional()
            .context("Failed to look up role")?;
        Ok(found)
    }

    fn first_user_with_role(&self, role: &Role) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT u.id, u.username, u.organization_id FROM users u
                 JOIN user_roles ur ON ur.user_id = u.id
                 WHERE ur.role_id = ?1
                 ORDER BY u.id LIMIT 1",
                params![role.id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        organization_id: row.get(2)?,
                    })
                },
            )
            .optional()
            .context("Failed to look up user by role")?;
        Ok(user)
    }
}
