//! Seeds the dashboard database with the placeholder dataset.
//!
//! Run with:
//! ```
//! DATABASE_URL=postgres://... cargo run -p seed-data --bin seed
//! ```

use seed_data::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SeedConfig::from_env()?;
    let dataset = Dataset::placeholder();
    let mut orchestrator = Orchestrator::new();

    let report = match orchestrator.seed(&config, &dataset).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Seed failed: {e}");
            return Err(e.into());
        }
    };

    // Summary output
    tracing::info!("Seed completed!");
    for table in &report.tables {
        tracing::info!(
            "  {}: {} inserted, {} skipped",
            table.table,
            table.inserted,
            table.skipped
        );
    }

    Ok(())
}
