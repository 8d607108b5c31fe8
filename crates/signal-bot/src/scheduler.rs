//! Background Loops
//!
//! Two independent fixed-delay loops with no shared mutable state: the
//! trading loop and the optional keep-alive pinger. Neither is aligned to
//! wall-clock time; each sleeps after its iteration returns.

use std::sync::Arc;
use std::time::Duration;

use crypto_advisor::TradingCycle;
use reqwest::Client;
use tokio::task::JoinHandle;

/// Handles to the spawned loops
pub struct Scheduler {
    trading: JoinHandle<()>,
    keep_alive: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawn the trading loop, and the keep-alive loop when a URL is given
    pub fn start(
        cycle: Arc<TradingCycle>,
        cycle_interval: Duration,
        keep_alive: Option<(Client, String, Duration)>,
    ) -> Self {
        let trading = spawn_trading_loop(cycle, cycle_interval);
        let keep_alive = keep_alive.map(|(http, url, every)| spawn_keep_alive(http, url, every));
        Self { trading, keep_alive }
    }

    pub const fn has_keep_alive(&self) -> bool {
        self.keep_alive.is_some()
    }

    /// Stop both loops
    pub fn abort(&self) {
        self.trading.abort();
        if let Some(handle) = &self.keep_alive {
            handle.abort();
        }
    }
}

/// Run a cycle, sleep `every`, repeat; the first cycle starts immediately
pub fn spawn_trading_loop(cycle: Arc<TradingCycle>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(
            market = %cycle.market(),
            interval_secs = every.as_secs(),
            "Trading loop started"
        );
        loop {
            let outcome = cycle.run_once().await;
            tracing::debug!(?outcome, "Cycle finished");
            tokio::time::sleep(every).await;
        }
    })
}

/// Ping `url`, sleep `every`, repeat
pub fn spawn_keep_alive(http: Client, url: String, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(%url, interval_secs = every.as_secs(), "Keep-alive loop started");
        loop {
            ping(&http, &url).await;
            tokio::time::sleep(every).await;
        }
    })
}

/// One keep-alive request; returns whether it got a success status
pub async fn ping(http: &Client, url: &str) -> bool {
    match http.get(url).send().await {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!(status = %resp.status(), "Keep-alive ping ok");
            true
        }
        Ok(resp) => {
            tracing::warn!(status = %resp.status(), "Keep-alive ping returned error status");
            false
        }
        Err(e) => {
            tracing::warn!("Keep-alive ping failed: {}", e);
            false
        }
    }
}
