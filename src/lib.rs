pub mod config;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod i18n;
pub mod repository;
pub mod seeder;
pub mod settings;

pub use error::{ConfigurationError, FixtureError};
pub use seeder::{LocalizationSeeder, SeedReport, SeedTarget};
