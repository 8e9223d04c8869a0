//! Seed script - creates the marketplace schema and fills it with fixture data
//!
//! Run with:
//! ```
//! cargo run -p test-data --bin seed
//! ```
//!
//! Settings come from the environment (or a `.env` file): `DATABASE_URL`,
//! `SEED_SCENARIO` (`legacy` or `demo`), `SEED_RNG_SEED`, `SEED_RESET`,
//! `SEED_IMAGE_WIDTH` and `SEED_IMAGE_HEIGHT`.

use marketplace::Database;
use rand::SeedableRng;
use rand::rngs::StdRng;
use test_data::builders::{LegacyFixture, ScenarioBuilder};
use test_data::config::{ScenarioKind, SeedConfig};
use test_data::db::Seeder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SeedConfig::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    tracing::info!("Schema ready");

    let mut rng = StdRng::seed_from_u64(config.rng_seed);

    let result = match config.scenario {
        ScenarioKind::Legacy => LegacyFixture::new()
            .with_image_size(config.image_size)
            .build_data(&mut rng)?,
        ScenarioKind::Demo => ScenarioBuilder::storefront_demo()
            .with_image_size(config.image_size)
            .build_data(&mut rng)?,
    };

    let report = Seeder::new(db.pool().clone())
        .with_reset(config.reset)
        .seed(&result)
        .await?;

    // Summary output
    tracing::info!("Seed completed! ({:?} scenario, rng seed {})", config.scenario, config.rng_seed);
    for (table, count) in db.table_counts().await? {
        tracing::info!("  {}: {}", table.as_str(), count);
    }
    tracing::info!("  Placeholder bytes: {}", result.placeholder_bytes());
    if report.skipped() > 0 {
        tracing::warn!(
            "  {} rows already existed and were kept; set SEED_RESET=true to replace them",
            report.skipped()
        );
    }

    if let Some(metrics) = &result.metrics {
        tracing::info!("  Generation time: {}ms", metrics.generation_time_ms);
    }

    Ok(())
}
