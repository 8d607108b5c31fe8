//! Mock Exchange Client
//!
//! For testing and demo purposes. Produces a deterministic synthetic series.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::ExchangeClient;
use crate::error::{AdvisorError, Result};
use crate::model::{Candle, CandleWindow};

/// Interval length used for synthetic open times
const STEP_MS: i64 = 15 * 60 * 1000;

/// Mock exchange client with synthetic candles
pub struct MockExchangeClient {
    base_price: f64,
    /// When set, every fetch fails with this HTTP status
    fail_status: Option<u16>,
    calls: AtomicUsize,
}

impl Default for MockExchangeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExchangeClient {
    pub const fn new() -> Self {
        Self::with_base_price(50_000.0)
    }

    pub const fn with_base_price(base_price: f64) -> Self {
        Self {
            base_price,
            fail_status: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A client whose every request fails like an exchange outage
    pub const fn failing(status: u16) -> Self {
        Self {
            base_price: 0.0,
            fail_status: Some(status),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Gently oscillating series, oldest first
    pub fn synthetic_window(&self, limit: u16) -> CandleWindow {
        let candles = (0..i64::from(limit))
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let drift = (i % 10) as f64 * 10.0;
                let open = self.base_price + drift;
                Candle {
                    open_time: 1_700_000_000_000 + i * STEP_MS,
                    open,
                    high: open + 25.0,
                    low: open - 25.0,
                    close: open + 5.0,
                    volume: 100.0 + drift,
                }
            })
            .collect();
        CandleWindow::new(candles)
    }
}

#[async_trait]
impl ExchangeClient for MockExchangeClient {
    async fn fetch_candles(&self, symbol: &str, _interval: &str, limit: u16) -> Result<CandleWindow> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = self.fail_status {
            return Err(AdvisorError::ExternalService {
                service: "mock",
                status,
                body: format!("mock outage for {symbol}"),
            });
        }

        Ok(self.synthetic_window(limit))
    }

    async fn health_check(&self) -> bool {
        self.fail_status.is_none()
    }

    fn name(&self) -> &str {
        "MockExchange"
    }
}
