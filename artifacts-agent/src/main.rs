use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod artifacts;
mod bank;
mod config;
mod engine;
mod error;
mod session;
mod world;

use crate::artifacts::HttpTransport;
use crate::bank::Bank;
use crate::config::load_config;
use crate::engine::handle::run_farm_orders;
use crate::engine::{Attacker, Shared};
use crate::session::CharacterSession;
use crate::world::WorldData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("Starting Artifacts agent v{}", env!("CARGO_PKG_VERSION"));

    // File first, then ARTIFACTS__* environment overrides
    let config = load_config()?;
    info!(
        host = %config.api.host,
        characters = config.characters.len(),
        "Configuration loaded"
    );

    if let Some(addr) = config.metrics.listen {
        PrometheusBuilder::new().with_http_listener(addr).install()?;
        info!(%addr, "Prometheus exporter listening");
    }

    let transport = Arc::new(HttpTransport::new(
        &config.api.host,
        &config.api.token,
        config.api.timeout_secs,
    )?);

    // Static game data is loaded once and shared by every character
    let world = Arc::new(WorldData::load(transport.as_ref(), config.api.page_size).await?);
    let shared = Shared {
        world,
        bank: Arc::new(Bank::new(config.api.page_size)),
        page_size: config.api.page_size,
    };

    let cancel = CancellationToken::new();
    let mut tasks = Vec::new();

    for character in &config.characters {
        let session = CharacterSession::connect(transport.clone(), &character.name).await?;
        let (engine, handle) = Attacker::new(
            session,
            shared.clone(),
            config.engine.clone(),
            character.crafter,
        );
        tasks.push(tokio::spawn(engine.run(cancel.clone())));

        if !character.farm_orders.is_empty() {
            tasks.push(tokio::spawn(run_farm_orders(
                handle,
                character.farm_orders.clone(),
                config.engine.clone(),
                cancel.clone(),
            )));
        }
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    cancel.cancel();

    for result in futures::future::join_all(tasks).await {
        if let Err(e) = result {
            tracing::warn!(error = %e, "Character task ended abnormally");
        }
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("artifacts_agent=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}
