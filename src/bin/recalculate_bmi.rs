//! Recompute the stored BMI of every entry from its height and weight
//! Usage: cargo run --bin recalculate_bmi

use tracing_subscriber::EnvFilter;

use bmitrack::config;
use bmitrack::db::{migrations, Database};
use bmitrack::models::BmiEntry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config::DEFAULT_LOG_DIRECTIVE.parse()?))
        .init();

    let db_path = config::database_path();
    tracing::info!(path = %db_path.display(), "Opening database");

    let database = Database::new(&db_path)?;
    database.with_conn(|conn| migrations::run_migrations(conn))?;

    let changed = database.with_conn_mut(|conn| BmiEntry::recalculate_all(conn))?;
    tracing::info!(changed, "Recalculated BMI entries");

    Ok(())
}
