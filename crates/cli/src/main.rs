//! `catalog-bulk`: seed an in-memory catalog from a fixture and apply a bulk
//! variant update to it, printing the result as JSON.
//!
//! Environment:
//! - `CATALOG_FIXTURE`, `CATALOG_LOG_FORMAT` (same as the flags)
//! - `CATALOG_DEFAULT_PAGE_SIZE`, `CATALOG_MAX_PAGE_SIZE`, `CATALOG_MAX_BULK_ITEMS`
//! - `RUST_LOG` (log filter, default `info`)

mod fixture;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;

use catalog_core::UserId;
use catalog_events::{BusEventPublisher, EventBus, EventEnvelope, InMemoryEventBus};
use catalog_infra::repository::{
    InMemoryBaseProductRepository, InMemoryUnitOfMeasureRepository, InMemoryVariantRepository,
};
use catalog_infra::{BulkUpdateVariants, CatalogConfig, CatalogService, CommandContext};
use catalog_observability::LogFormat;

use crate::fixture::Fixture;

type Bus = InMemoryEventBus<EventEnvelope<JsonValue>>;

/// Seed an in-memory catalog and apply a bulk variant update to it.
#[derive(clap::Parser, Debug)]
#[command(name = "catalog-bulk", version)]
struct Args {
    /// JSON fixture with `units`, `baseProducts` and `variants` to seed
    #[arg(long, env = "CATALOG_FIXTURE")]
    fixture: PathBuf,

    /// JSON batch of the form `{"updates": [...]}`
    #[arg(long)]
    batch: PathBuf,

    /// Acting user id; a fresh one is generated when omitted
    #[arg(long)]
    user: Option<UserId>,

    #[arg(long, env = "CATALOG_LOG_FORMAT", default_value = "json")]
    log_format: LogFormat,

    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    catalog_observability::init_with(args.log_format, "info");

    let config = CatalogConfig::from_env().context("invalid catalog configuration")?;
    let fixture: Fixture = read_json(&args.fixture)?;
    let batch: BulkUpdateVariants = read_json(&args.batch)?;

    let bus = Arc::new(Bus::new());
    let events = bus.subscribe();
    let service = in_memory_service(bus, config);
    let ctx = CommandContext::now(args.user.unwrap_or_default());
    let cancel = CancellationToken::new();

    let seeded = fixture
        .seed(&service, &ctx, &cancel)
        .await
        .context("failed to seed fixture")?;
    tracing::info!(
        units = seeded.units,
        base_products = seeded.base_products,
        variants = seeded.variants,
        "fixture seeded"
    );
    // Only the batch's own events are reported below.
    events.drain();

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, remaining items will be skipped");
            interrupt.cancel();
        }
    });

    let result = service.bulk_update_variants(&ctx, batch, &cancel).await?;
    tracing::info!(events_published = events.drain().len(), "batch complete");

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");

    Ok(())
}

fn in_memory_service(bus: Arc<Bus>, config: CatalogConfig) -> CatalogService {
    CatalogService::new(
        Arc::new(InMemoryVariantRepository::new()),
        Arc::new(InMemoryBaseProductRepository::new()),
        Arc::new(InMemoryUnitOfMeasureRepository::new()),
        Arc::new(BusEventPublisher::new(bus)),
        config,
    )
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("could not parse {}", path.display()))
}
