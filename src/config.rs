use crate::seeder::ADMINISTRATOR_ROLE;
use anyhow::{bail, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_path: String,

    // Ownership of seeded records
    pub admin_role: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/localization.db".to_string()),

            admin_role: std::env::var("ADMIN_ROLE")
                .unwrap_or_else(|_| ADMINISTRATOR_ROLE.to_string()),
        };

        if config.database_path.trim().is_empty() {
            bail!("DATABASE_PATH must not be empty");
        }
        if config.admin_role.trim().is_empty() {
            bail!("ADMIN_ROLE must not be empty");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("DATABASE_PATH");
        std::env::remove_var("ADMIN_ROLE");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().expect("Should load defaults");
        assert_eq!(config.database_path, "data/localization.db");
        assert_eq!(config.admin_role, "ROLE_ADMINISTRATOR");
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("DATABASE_PATH", "/tmp/seed.db");
        std::env::set_var("ADMIN_ROLE", "ROLE_OWNER");

        let config = Config::from_env().expect("Should load overrides");
        assert_eq!(config.database_path, "/tmp/seed.db");
        assert_eq!(config.admin_role, "ROLE_OWNER");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_database_path_rejected() {
        clear_env();
        std::env::set_var("DATABASE_PATH", "  ");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("DATABASE_PATH"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_admin_role_rejected() {
        clear_env();
        std::env::set_var("ADMIN_ROLE", "");

        assert!(Config::from_env().is_err());
        clear_env();
    }
}
