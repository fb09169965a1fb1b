//! Integration tests for localization seeding
//!
//! These tests run the seeder and the fixture pipeline against a real
//! SQLite database through the public API only.

use localization_seed::{
    db::Database,
    fixtures::FixturePipeline,
    repository::{
        ConfigStore, LanguageCriteria, LocalizationCriteria, NewLanguage, NewLocalization,
        Repository,
    },
    seeder::ADMINISTRATOR_ROLE,
    settings::GlobalSettings,
    ConfigurationError, LocalizationSeeder, SeedReport,
};
use serde_json::json;
use tempfile::TempDir;

// ==================== Test Helpers ====================

fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("integration.db");
    let db = Database::new(db_path.to_str().unwrap()).expect("Failed to create database");
    (db, temp_dir)
}

/// Organization, administrator role and one admin user. Returns the admin's user id.
fn seed_admin(db: &Database) -> i64 {
    let org = db.create_organization("Default").expect("organization");
    let role = db
        .create_role(ADMINISTRATOR_ROLE, "Administrator")
        .expect("role");
    let admin = db.create_user("admin", org).expect("user");
    db.assign_role(admin.id, role.id).expect("assignment");
    admin.id
}

fn run_seeder(db: &Database) -> anyhow::Result<SeedReport> {
    let mut settings = GlobalSettings::new(db.clone());
    LocalizationSeeder::new(db, &mut settings, db).run()
}

// ==================== Seeder Scenarios ====================

#[test]
fn test_fresh_database_is_fully_seeded() {
    let (db, _temp_dir) = create_test_db();
    let admin_id = seed_admin(&db);

    let report = run_seeder(&db).expect("seeding should succeed");

    let language = db
        .find_language(&LanguageCriteria::by_code("de_DE"))
        .unwrap()
        .expect("German language should exist");
    assert!(language.enabled);
    assert_eq!(language.owner_id, Some(admin_id));

    let localization = db
        .find_localization(&LocalizationCriteria {
            language_id: language.id,
            formatting_code: "de_DE".to_string(),
        })
        .unwrap()
        .expect("German localization should exist");
    assert_eq!(localization.name, "Deutsch (Deutschland)");
    assert_eq!(report.localization_id, Some(localization.id));

    assert_eq!(db.get_config_value("locale.languages").unwrap(), Some(json!(["de_DE"])));
    assert_eq!(db.get_config_value("locale.locale").unwrap(), Some(json!("de_DE")));
    assert_eq!(
        db.get_config_value("locale.enabled_localizations").unwrap(),
        Some(json!([localization.id]))
    );
}

#[test]
fn test_running_twice_is_idempotent() {
    let (db, _temp_dir) = create_test_db();
    seed_admin(&db);

    let first = run_seeder(&db).unwrap();
    let second = run_seeder(&db).unwrap();

    assert_eq!(first.inserts(), 2);
    assert_eq!(second.inserts(), 0);
    assert_eq!(db.language_count().unwrap(), 1);
    assert_eq!(db.localization_count().unwrap(), 1);
    assert_eq!(db.get_config_value("locale.languages").unwrap(), Some(json!(["de_DE"])));
    assert_eq!(
        db.get_config_value("locale.enabled_localizations").unwrap(),
        Some(json!([first.localization_id.unwrap()]))
    );
}

#[test]
fn test_existing_languages_are_preserved() {
    let (db, _temp_dir) = create_test_db();
    seed_admin(&db);
    db.save_config_values(&[
        ("locale.languages", &json!(["en", "fr_FR", "en"])),
        ("locale.locale", &json!("en_US")),
    ])
    .unwrap();

    run_seeder(&db).unwrap();

    assert_eq!(
        db.get_config_value("locale.languages").unwrap(),
        Some(json!(["en", "fr_FR", "de_DE"]))
    );
    assert_eq!(db.get_config_value("locale.locale").unwrap(), Some(json!("de_DE")));
}

#[test]
fn test_missing_admin_role_fails_without_records() {
    let (db, _temp_dir) = create_test_db();

    let err = run_seeder(&db).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::RoleMissing { .. })
    ));
    assert_eq!(err.to_string(), "ROLE_ADMINISTRATOR role should exist.");
    assert_eq!(db.language_count().unwrap(), 0);
    assert_eq!(db.localization_count().unwrap(), 0);
    assert!(db.get_config_value("locale.locale").unwrap().is_none());
}

#[test]
fn test_admin_role_without_user_fails() {
    let (db, _temp_dir) = create_test_db();
    db.create_role(ADMINISTRATOR_ROLE, "Administrator").unwrap();

    let err = run_seeder(&db).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigurationError>(),
        Some(ConfigurationError::NoUserWithRole { .. })
    ));
    assert_eq!(db.language_count().unwrap(), 0);
}

#[test]
fn test_disabled_language_gets_no_localization() {
    let (db, _temp_dir) = create_test_db();
    seed_admin(&db);
    let mut settings = GlobalSettings::new(db.clone());
    db.create_language(NewLanguage {
        code: "de_DE".to_string(),
        enabled: false,
        organization_id: None,
        owner_id: None,
    })
    .unwrap();

    let report = LocalizationSeeder::new(&db, &mut settings, &db)
        .run()
        .expect("disabled language must not raise");

    assert!(report.localization_id.is_none());
    assert_eq!(db.localization_count().unwrap(), 0);
    assert_eq!(settings.get("locale.locale").unwrap(), Some(json!("de_DE")));
    assert!(db
        .get_config_value("locale.enabled_localizations")
        .unwrap()
        .is_none());
}

#[test]
fn test_same_title_under_other_language_does_not_block_seeding() {
    let (db, _temp_dir) = create_test_db();
    seed_admin(&db);
    let bare = db
        .create_language(NewLanguage {
            code: "de".to_string(),
            enabled: true,
            organization_id: None,
            owner_id: None,
        })
        .unwrap();
    db.create_localization(NewLocalization {
        language_id: bare.id,
        formatting_code: "de_DE".to_string(),
        name: "Deutsch (Deutschland)".to_string(),
        default_title: "Deutsch (Deutschland)".to_string(),
    })
    .unwrap();

    let report = run_seeder(&db).expect("seeding should succeed");

    assert!(report.language_created);
    assert!(report.localization_created);
    assert_eq!(db.language_count().unwrap(), 2);
    assert_eq!(db.localization_count().unwrap(), 2);
    assert_eq!(db.get_config_value("locale.locale").unwrap(), Some(json!("de_DE")));
    assert_eq!(
        db.get_config_value("locale.enabled_localizations").unwrap(),
        Some(json!([report.localization_id.unwrap()]))
    );
}

// ==================== Pipeline Scenarios ====================

#[test]
fn test_pipeline_seeds_everything_in_order() {
    let (db, _temp_dir) = create_test_db();
    seed_admin(&db);

    let report = FixturePipeline::localization(db.clone())
        .unwrap()
        .run()
        .expect("pipeline should succeed");

    assert_eq!(
        report.loaded,
        vec!["base_localization", "default_currency", "german_localization"]
    );
    assert_eq!(db.language_count().unwrap(), 2);
    assert_eq!(db.localization_count().unwrap(), 2);

    // Currency ran before German took over the locale
    assert_eq!(
        db.get_config_value("currency.default_currency").unwrap(),
        Some(json!("USD"))
    );
    assert_eq!(db.get_config_value("locale.locale").unwrap(), Some(json!("de_DE")));
    assert_eq!(
        db.get_config_value("locale.languages").unwrap(),
        Some(json!(["en", "de_DE"]))
    );

    let enabled = db
        .get_config_value("locale.enabled_localizations")
        .unwrap()
        .expect("enabled localizations");
    assert_eq!(enabled.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_pipeline_rerun_skips_everything() {
    let (db, _temp_dir) = create_test_db();
    seed_admin(&db);

    let pipeline = FixturePipeline::localization(db.clone()).unwrap();
    pipeline.run().unwrap();
    let report = pipeline.run().unwrap();

    assert!(report.loaded.is_empty());
    assert_eq!(report.skipped.len(), 3);
    assert_eq!(db.language_count().unwrap(), 2);
}

#[test]
fn test_pipeline_without_admin_stops_at_first_fixture() {
    let (db, _temp_dir) = create_test_db();

    let err = FixturePipeline::localization(db.clone())
        .unwrap()
        .run()
        .unwrap_err();

    assert!(err.downcast_ref::<ConfigurationError>().is_some());
    assert!(format!("{:#}", err).contains("base_localization"));
    assert!(db.loaded_fixtures().unwrap().is_empty());
}

#[test]
fn test_pipeline_custom_admin_role() {
    let (db, _temp_dir) = create_test_db();
    let org = db.create_organization("Default").unwrap();
    let role = db.create_role("ROLE_OWNER", "Owner").unwrap();
    let owner = db.create_user("owner", org).unwrap();
    db.assign_role(owner.id, role.id).unwrap();

    FixturePipeline::localization(db.clone())
        .unwrap()
        .with_admin_role("ROLE_OWNER")
        .run()
        .unwrap();

    let german = db
        .find_language(&LanguageCriteria::by_code("de_DE"))
        .unwrap()
        .unwrap();
    assert_eq!(german.owner_id, Some(owner.id));
}

#[test]
fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("reopen.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::new(path).unwrap();
        seed_admin(&db);
        FixturePipeline::localization(db).unwrap().run().unwrap();
    }

    let db = Database::new(path).unwrap();
    let report = FixturePipeline::localization(db.clone()).unwrap().run().unwrap();
    assert!(report.loaded.is_empty());
    assert_eq!(db.get_config_value("locale.locale").unwrap(), Some(json!("de_DE")));
}
