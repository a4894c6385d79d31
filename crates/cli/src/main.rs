//! Parcelwise CLI - offline packing and planning from JSON files.
//!
//! # Usage
//!
//! ```bash
//! # Pack line items into boxes
//! parcelwise pack --items items.json --boxes boxes.json
//!
//! # Pick one box for all line items
//! parcelwise select-box --items items.json --boxes boxes.json
//!
//! # Plan a shipment against a saved capability catalog
//! parcelwise plan --items items.json --boxes boxes.json --catalog catalog.json --product PARCEL
//! ```
//!
//! Results are written to stdout as JSON; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "parcelwise")]
#[command(author, version, about = "Parcelwise packing tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack line items into boxes (First-Fit-Decreasing)
    Pack {
        /// JSON array of line items
        #[arg(short, long)]
        items: PathBuf,

        /// JSON array of box templates
        #[arg(short, long)]
        boxes: PathBuf,
    },
    /// Pick the smallest single box for all line items
    SelectBox {
        /// JSON array of line items
        #[arg(short, long)]
        items: PathBuf,

        /// JSON array of box templates
        #[arg(short, long)]
        boxes: PathBuf,
    },
    /// Plan a shipment against a capability catalog snapshot
    Plan {
        /// JSON array of line items
        #[arg(short, long)]
        items: PathBuf,

        /// JSON array of box templates
        #[arg(short, long)]
        boxes: PathBuf,

        /// JSON array of capability entries
        #[arg(short, long)]
        catalog: PathBuf,

        /// Shipping product to restrict tiers to
        #[arg(short, long)]
        product: Option<String>,

        /// Parcel type used when no catalog tier fits
        #[arg(long, default_value = "PARCEL")]
        default_parcel_type: String,
    },
}

#[tokio::main]
async fn main() {
    // Logs on stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parcelwise_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Pack { items, boxes } => commands::pack::pack(&items, &boxes).await,
        Commands::SelectBox { items, boxes } => commands::pack::select_box(&items, &boxes).await,
        Commands::Plan {
            items,
            boxes,
            catalog,
            product,
            default_parcel_type,
        } => {
            commands::plan::plan(commands::plan::PlanArgs {
                items: &items,
                boxes: &boxes,
                catalog: &catalog,
                product: product.as_deref(),
                default_parcel_type: &default_parcel_type,
            })
            .await
        }
    }
}
