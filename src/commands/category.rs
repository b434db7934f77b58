//! Category management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::commands::Runtime;
use crate::output::{self, OutputFormat};
use gemhub_core::error::AppError;
use gemhub_core::types::{CategoryId, Outcome};
use gemhub_database::query::{CategoryFilter, ParentFilter};
use gemhub_entity::category::CategoryView;
use gemhub_service::RequestContext;

/// Arguments for category commands
#[derive(Debug, Args)]
pub struct CategoryArgs {
    /// Category subcommand
    #[command(subcommand)]
    pub command: CategoryCommand,
}

/// Category subcommands
#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List categories sorted by name
    List {
        /// Include inactive categories
        #[arg(short, long)]
        all: bool,
        /// Only top-level categories
        #[arg(long, conflicts_with = "parent")]
        top_level: bool,
        /// Only children of this category
        #[arg(long)]
        parent: Option<Uuid>,
    },
    /// Delete a category without subcategories
    Delete {
        /// Category ID
        id: Uuid,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Category display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CategoryRow {
    /// Category ID
    id: String,
    /// Name
    name: String,
    /// Slug
    slug: String,
    /// Parent name
    parent: String,
    /// Active flag
    active: bool,
}

impl From<&CategoryView> for CategoryRow {
    fn from(view: &CategoryView) -> Self {
        Self {
            id: view.category.id.to_string(),
            name: view.category.name.clone(),
            slug: view.category.slug.clone(),
            parent: view
                .parent
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "-".to_string()),
            active: view.category.is_active,
        }
    }
}

/// Execute category commands
pub async fn execute(
    args: &CategoryArgs,
    runtime: &Runtime,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        CategoryCommand::List {
            all,
            top_level,
            parent,
        } => {
            let parent = match (top_level, parent) {
                (true, _) => ParentFilter::TopLevel,
                (false, Some(id)) => ParentFilter::ChildrenOf(CategoryId::from_uuid(*id)),
                (false, None) => ParentFilter::Any,
            };
            let filter = CategoryFilter {
                include_inactive: *all,
                parent,
            };
            let views = runtime.categories.list(ctx, &filter).await?;
            match format {
                OutputFormat::Json => output::print_json(&views),
                OutputFormat::Table => {
                    let rows: Vec<CategoryRow> = views.iter().map(CategoryRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
        CategoryCommand::Delete { id, force } => {
            let id = CategoryId::from_uuid(*id);
            let view = runtime.categories.get(id).await?;
            if !force && !super::confirm(&format!("Delete category '{}'?", view.category.name))? {
                println!("Cancelled.");
                return Ok(());
            }
            runtime.categories.delete(ctx, id).await?;
            output::print_outcome(
                &Outcome::ok(id),
                &format!("Category '{}' deleted", view.category.name),
                format,
            );
        }
    }

    Ok(())
}
