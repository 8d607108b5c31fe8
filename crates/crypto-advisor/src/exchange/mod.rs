//! Exchange Integration
//!
//! Abstractions and implementations for cryptocurrency market data.

mod binance;
mod mock;

pub use binance::{BinanceClient, DEFAULT_BASE_URL as BINANCE_FUTURES_URL};
pub use mock::MockExchangeClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{CandleWindow, Market};

/// Exchange client trait (Strategy pattern)
///
/// Implement this for each exchange: Binance, Bybit, Kraken, etc.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Fetch the most recent `limit` candles, oldest first
    async fn fetch_candles(&self, symbol: &str, interval: &str, limit: u16) -> Result<CandleWindow>;

    /// Fetch the window described by `market`
    async fn fetch_market(&self, market: &Market) -> Result<CandleWindow> {
        self.fetch_candles(&market.symbol, &market.interval, market.limit)
            .await
    }

    /// Check if exchange is available
    async fn health_check(&self) -> bool;

    /// Exchange name
    fn name(&self) -> &str;
}
