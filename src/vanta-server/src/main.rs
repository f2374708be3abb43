//! VANTA — perks marketplace backend.
//!
//! Main entry point: wires the stores, the redemption engine, and the
//! advisory model client, then serves the REST API.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing::{info, warn};
use vanta_advisor::{Advisor, DisabledAdvisor, GenerativeAdvisor};
use vanta_api::{ApiServer, AppState};
use vanta_core::config::AppConfig;
use vanta_engine::RedemptionEngine;
use vanta_store::{seed, MemoryPerkCatalog, MemoryProfileStore, MemoryPurchaseLedger};

#[derive(Parser, Debug)]
#[command(name = "vanta-server")]
#[command(about = "Perks marketplace backend: catalog, redemptions, tiers, analytics")]
#[command(version)]
struct Cli {
    /// Bind host (overrides config)
    #[arg(long, env = "VANTA__API__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "VANTA__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "VANTA__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Load the demo catalog on startup
    #[arg(long, default_value_t = false)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vanta=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("VANTA server starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }

    info!(
        host = %config.api.host,
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        "Configuration loaded"
    );

    let profiles = Arc::new(MemoryProfileStore::new());
    let catalog = Arc::new(MemoryPerkCatalog::new());
    let ledger = Arc::new(MemoryPurchaseLedger::new());

    if cli.seed {
        let seeded = seed::seed_catalog(catalog.as_ref()).await?;
        info!(seeded, "Demo catalog loaded");
    }

    let advisor: Arc<dyn Advisor> = if config.advisor.enabled && !config.advisor.api_key.is_empty()
    {
        info!(
            match_model = %config.advisor.match_model,
            chat_model = %config.advisor.chat_model,
            "Generative advisor enabled"
        );
        Arc::new(GenerativeAdvisor::new(&config.advisor)?)
    } else {
        info!("Advisor disabled (no API key configured), serving fallbacks");
        Arc::new(DisabledAdvisor)
    };

    let engine = Arc::new(RedemptionEngine::new(
        &config.engine,
        profiles.clone(),
        catalog.clone(),
        ledger.clone(),
    ));

    let state = AppState {
        engine,
        profiles,
        catalog,
        ledger,
        advisor,
        start_time: Instant::now(),
    };

    let server = ApiServer::new(config, state);
    server.start_metrics()?;
    server.start_http().await
}
