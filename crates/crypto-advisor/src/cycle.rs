//! Trading Cycle
//!
//! One fetch → analyze → notify pass. `run_once` is the failure boundary:
//! errors from the exchange or the model end the pass early and are logged,
//! never propagated.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::advisor::RecommendationEngine;
use crate::error::{ErrorKind, Result};
use crate::exchange::ExchangeClient;
use crate::model::{Market, Recommendation};
use crate::notify::Notifier;

/// Header placed above every recommendation in the chat message
pub const REPORT_HEADER: &str = "*Auto Trading Result*";

/// Chat message for a recommendation
pub fn format_report(recommendation: &Recommendation) -> String {
    format!("{REPORT_HEADER}\n\n{recommendation}")
}

/// What happened during one pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A recommendation was handed to the notifier
    Delivered { candles: usize },
    /// The pass stopped before notifying
    Skipped { kind: ErrorKind, reason: String },
}

impl CycleOutcome {
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Wires exchange, engine and notifier together
pub struct TradingCycle {
    exchange: Arc<dyn ExchangeClient>,
    engine: RecommendationEngine,
    notifier: Arc<dyn Notifier>,
}

impl TradingCycle {
    pub fn new(
        exchange: Arc<dyn ExchangeClient>,
        engine: RecommendationEngine,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            exchange,
            engine,
            notifier,
        }
    }

    pub const fn market(&self) -> &Market {
        &self.engine.config().market
    }

    /// Fetch and analyze, then notify. Errors before notification propagate.
    pub async fn try_run(&self) -> Result<(usize, Recommendation)> {
        let market = self.market();
        let candles = self.exchange.fetch_market(market).await?;

        tracing::info!(
            count = candles.len(),
            exchange = self.exchange.name(),
            latest = ?candles.latest().and_then(|c| c.opened_at()),
            "Fetched {} candles {}",
            candles.len(),
            market
        );

        let recommendation = self.engine.recommend(&candles).await?;
        tracing::info!(result = %recommendation, "Model recommendation");

        self.notifier.notify(&format_report(&recommendation)).await;

        Ok((candles.len(), recommendation))
    }

    /// Run one pass, containing every failure
    pub async fn run_once(&self) -> CycleOutcome {
        let span = tracing::info_span!("cycle", id = %Uuid::new_v4());

        async {
            match self.try_run().await {
                Ok((candles, _)) => CycleOutcome::Delivered { candles },
                Err(e) => {
                    let kind = e.kind();
                    tracing::error!(%kind, retryable = e.is_transient(), "Cycle failed: {}", e);
                    CycleOutcome::Skipped {
                        kind,
                        reason: e.to_string(),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}
