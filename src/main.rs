use anyhow::{Context, Result};
use localization_seed::{config::Config, db::Database, fixtures::FixturePipeline};
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("localization_seed=info".parse()?),
        )
        .init();

    info!("Starting localization seeding");

    let config = Config::from_env()?;

    if let Some(parent) = Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create {}", parent.display()))?;
        }
    }

    info!("Opening database at {}", config.database_path);
    let db = Database::new(&config.database_path)?;

    let pipeline = FixturePipeline::localization(db)?.with_admin_role(config.admin_role);
    let report = pipeline.run()?;

    for name in &report.loaded {
        info!("✓ {}", name);
    }
    for name in &report.skipped {
        info!("- {} (already loaded)", name);
    }

    info!(
        "Localization seeding finished: {}",
        serde_json::to_string(&report)?
    );
    Ok(())
}
