//! Catalog dashboard command.

use crate::commands::Runtime;
use crate::output::{self, OutputFormat};
use gemhub_core::error::AppError;
use gemhub_service::RequestContext;

/// Print product counts by moderation status
pub async fn execute(
    runtime: &Runtime,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stats = runtime.catalog.stats(ctx).await?;

    match format {
        OutputFormat::Json => output::print_json(&stats),
        OutputFormat::Table => {
            println!("Catalog");
            output::print_kv("Products", &stats.total_products.to_string());
            output::print_kv("Pending review", &stats.pending.to_string());
            output::print_kv("Approved", &stats.approved.to_string());
            output::print_kv("Rejected", &stats.rejected.to_string());
            output::print_kv("Needs revision", &stats.needs_revision.to_string());
            output::print_kv("Active categories", &stats.active_categories.to_string());
        }
    }
    Ok(())
}
