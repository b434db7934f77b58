//! Product management and moderation CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::commands::Runtime;
use crate::output::{self, OutputFormat};
use gemhub_core::error::AppError;
use gemhub_core::types::{Outcome, ProductId};
use gemhub_entity::product::{AvailabilityStatus, ModerationStatus, Product};
use gemhub_service::{OperatorListParams, RequestContext};

/// Arguments for product commands
#[derive(Debug, Args)]
pub struct ProductArgs {
    /// Product subcommand
    #[command(subcommand)]
    pub command: ProductCommand,
}

/// Product subcommands
#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List products, newest first
    List {
        /// Only products awaiting review
        #[arg(long)]
        pending: bool,
        /// Filter by availability status
        #[arg(long)]
        status: Option<AvailabilityStatus>,
        /// Free-text search over name, descriptions, SKU and tags
        #[arg(short, long)]
        search: Option<String>,
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Page size
        #[arg(long)]
        page_size: Option<u64>,
    },
    /// Show a product by ID or by public SKU
    Show {
        /// Product ID
        #[arg(required_unless_present = "sku")]
        id: Option<Uuid>,
        /// Look up a storefront product by SKU instead
        #[arg(long, conflicts_with = "id")]
        sku: Option<String>,
    },
    /// Approve a product for sale
    Approve {
        /// Product ID
        id: Uuid,
    },
    /// Reject a product
    Reject {
        /// Product ID
        id: Uuid,
        /// Reason shown to the operator
        #[arg(short, long)]
        reason: String,
    },
    /// Send a product back for revision
    Revise {
        /// Product ID
        id: Uuid,
        /// Note for the operator
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Override availability
    Availability {
        /// Product ID
        id: Uuid,
        /// New availability status
        status: AvailabilityStatus,
    },
    /// Delete a product and its media
    Delete {
        /// Product ID
        id: Uuid,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Product display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ProductRow {
    /// SKU
    sku: String,
    /// Name
    name: String,
    /// Category name
    category: String,
    /// Carat weight
    carat: String,
    /// Price
    price: String,
    /// Moderation status
    moderation: String,
    /// Availability
    status: String,
    /// Created at
    created_at: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            sku: p.sku.clone(),
            name: p.name.clone(),
            category: p.category_name.clone(),
            carat: format!("{:.2}", p.carat),
            price: format!("{:.2} {}", p.price.amount, p.price.currency),
            moderation: p.moderation.status.to_string(),
            status: p.status.to_string(),
            created_at: p.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute product commands
pub async fn execute(
    args: &ProductArgs,
    runtime: &Runtime,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ProductCommand::List {
            pending,
            status,
            search,
            page,
            page_size,
        } => {
            let params = OperatorListParams {
                status: *status,
                moderation_status: pending.then_some(ModerationStatus::Pending),
                search: search.clone(),
                page: Some(*page),
                page_size: *page_size,
                ..OperatorListParams::default()
            };
            let result = runtime.catalog.list_operator(ctx, &params).await?;
            match format {
                OutputFormat::Json => output::print_json(&result),
                OutputFormat::Table => {
                    let rows: Vec<ProductRow> = result.items.iter().map(ProductRow::from).collect();
                    output::print_list(&rows, format);
                    output::print_page(result.page, result.total_pages, result.total_items);
                }
            }
        }
        ProductCommand::Show { id, sku } => {
            let product = match (id, sku) {
                (_, Some(sku)) => runtime.products.get_public_by_sku(sku).await?,
                (Some(id), None) => runtime.products.get(ctx, ProductId::from_uuid(*id)).await?,
                (None, None) => return Err(AppError::validation("Give a product ID or --sku")),
            };
            print_product(&product, format);
        }
        ProductCommand::Approve { id } => {
            let product = runtime
                .products
                .approve(ctx, ProductId::from_uuid(*id))
                .await?;
            let message = format!("Product {} approved", product.sku);
            output::print_outcome(&Outcome::ok(&product), &message, format);
        }
        ProductCommand::Reject { id, reason } => {
            let product = runtime
                .products
                .reject(ctx, ProductId::from_uuid(*id), reason)
                .await?;
            let message = format!("Product {} rejected", product.sku);
            output::print_outcome(&Outcome::ok(&product), &message, format);
        }
        ProductCommand::Revise { id, note } => {
            let product = runtime
                .products
                .request_revision(ctx, ProductId::from_uuid(*id), note.clone())
                .await?;
            let message = format!("Product {} sent back for revision", product.sku);
            output::print_outcome(&Outcome::ok(&product), &message, format);
        }
        ProductCommand::Availability { id, status } => {
            let product = runtime
                .products
                .set_availability(ctx, ProductId::from_uuid(*id), *status)
                .await?;
            let message = format!("Product {} is now {}", product.sku, product.status);
            output::print_outcome(&Outcome::ok(&product), &message, format);
        }
        ProductCommand::Delete { id, force } => {
            let id = ProductId::from_uuid(*id);
            let product = runtime.products.get(ctx, id).await?;
            if !force && !super::confirm(&format!("Delete product {}?", product.sku))? {
                println!("Cancelled.");
                return Ok(());
            }
            let done = runtime.products.delete(ctx, id).await?;
            output::print_outcome(
                &Outcome::from_completion(Ok(done)),
                &format!("Product {} deleted", product.sku),
                format,
            );
        }
    }

    Ok(())
}

fn print_product(product: &Product, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(product),
        OutputFormat::Table => {
            println!("{}", product.name);
            output::print_kv("ID", &product.id.to_string());
            output::print_kv("SKU", &product.sku);
            output::print_kv("Slug", &product.slug);
            output::print_kv("Category", &product.category_name);
            output::print_kv("Shape", product.shape.as_str());
            output::print_kv("Carat", &format!("{:.2}", product.carat));
            output::print_kv("Color", product.color.grade.as_str());
            output::print_kv("Clarity", product.clarity.grade.as_str());
            output::print_kv("Origin", product.origin.country.as_str());
            output::print_kv("Heated", &product.treatment.heated.to_string());
            output::print_kv(
                "Price",
                &format!("{:.2} {}", product.price.amount, product.price.currency),
            );
            if let Some(ppc) = product.price.price_per_carat {
                output::print_kv("Price per carat", &format!("{ppc:.2}"));
            }
            output::print_kv("Moderation", product.moderation.status.as_str());
            if let Some(reason) = &product.moderation.rejection_reason {
                output::print_kv("Rejection reason", reason);
            }
            output::print_kv("Availability", product.status.as_str());
            output::print_kv("Premium", &product.is_premium().to_string());
            output::print_kv("Images", &product.images.len().to_string());
            output::print_kv("Videos", &product.videos.len().to_string());
        }
    }
}
