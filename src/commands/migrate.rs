//! Database migration command.

use crate::output;
use gemhub_core::error::AppError;
use gemhub_database::DatabasePool;

/// Run all pending migrations
pub async fn execute(pool: &DatabasePool) -> Result<(), AppError> {
    println!("Running database migrations...");
    gemhub_database::migration::run_migrations(pool.pool()).await?;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
