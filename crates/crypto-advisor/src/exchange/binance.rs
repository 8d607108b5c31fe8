//! Binance USDⓈ-M futures market data

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::ExchangeClient;
use crate::error::{AdvisorError, Result};
use crate::model::CandleWindow;

/// Public futures REST base
pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com/fapi/v1";

/// Unauthenticated kline client
pub struct BinanceClient {
    http: Client,
    base_url: String,
}

impl Default for BinanceClient {
    fn default() -> Self {
        Self::new(Client::new(), DEFAULT_BASE_URL)
    }
}

impl BinanceClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ExchangeClient for BinanceClient {
    async fn fetch_candles(&self, symbol: &str, interval: &str, limit: u16) -> Result<CandleWindow> {
        let url = format!("{}/klines", self.base_url);
        let limit = limit.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AdvisorError::ExternalService {
                service: "binance",
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<Value> = serde_json::from_str(&body)
            .map_err(|e| AdvisorError::parse(format!("klines response is not a JSON array: {e}")))?;

        CandleWindow::from_rows(&rows)
    }

    async fn health_check(&self) -> bool {
        match self.http.get(format!("{}/ping", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::warn!("Binance health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "Binance"
    }
}
