//! Crypto Signal Bot
//!
//! Polls recent candles on a fixed delay, asks an LLM for a trade plan and
//! relays it to Telegram. A small axum server answers liveness checks and an
//! optional loop pings the public URL so the host does not idle the process.

mod bootstrap;
mod config;
mod handlers;
mod scheduler;
mod state;

use std::sync::Arc;

use agent_core::LlmProvider;
use crypto_advisor::exchange::ExchangeClient;
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;
use crate::scheduler::Scheduler;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Nothing below runs without a complete configuration
    let settings = Settings::from_env().context("invalid configuration")?;
    tracing::info!(?settings, "Configuration loaded");

    let http = reqwest::Client::new();
    let exchange = bootstrap::build_exchange(&settings, &http);
    let provider = bootstrap::build_provider(&settings, &http);

    if exchange.health_check().await {
        tracing::info!("✓ Connected to {}", exchange.name());
    } else {
        tracing::warn!("⚠ {} not reachable - cycles will fail until it is", exchange.name());
    }

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to Groq"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Groq not reachable - cycles will fail until it is");
        }
    }

    let cycle = Arc::new(bootstrap::build_cycle(&settings, &http, exchange, provider));

    let keep_alive = settings
        .self_ping_url
        .clone()
        .map(|url| (http.clone(), url, settings.keep_alive_interval));
    let scheduler = Scheduler::start(cycle, settings.cycle_interval, keep_alive);

    if !scheduler.has_keep_alive() {
        tracing::info!("SELF_PING_URL not set - keep-alive loop disabled");
    }

    let app = handlers::router(AppState::new(settings.market.clone(), scheduler.has_keep_alive()));

    let addr = format!("0.0.0.0:{}", settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 signal-bot watching {} on http://{}", settings.market, addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /        - Liveness check");
    tracing::info!("  GET  /health  - Health check");

    let served = axum::serve(listener, app).await;
    scheduler.abort();
    served?;

    Ok(())
}
