//! Recommendation Engine
//!
//! Turns a candle window into a single prompt and returns whatever the
//! model answers. The reply is never parsed: a probability threshold is
//! stated in the prompt and the model is trusted to self-filter.

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider};

use crate::error::Result;
use crate::model::{CandleWindow, Market, Recommendation};

/// Hosted model used for analysis
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";

/// Near-deterministic sampling
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Minimum win probability (percent) for the model to propose a trade
pub const DEFAULT_PROBABILITY_THRESHOLD: u8 = 60;

/// Requested reply shape
const REPLY_SHAPE: &str = r#"{"action": "long"|"short", "et": entry price, "sl": stop-loss, "tp1": number, "tp2": number, "tp3": number, "prob": percent, "reason": "one or two sentences"}"#;

/// Engine configuration
#[derive(Clone, Debug)]
pub struct AdvisorConfig {
    /// Instrument and timeframe named in the prompt
    pub market: Market,

    /// Percent; trades below this are to be withheld by the model
    pub probability_threshold: u8,

    /// Model and sampling settings
    pub generation: GenerationOptions,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            market: Market::default(),
            probability_threshold: DEFAULT_PROBABILITY_THRESHOLD,
            generation: GenerationOptions::for_model(DEFAULT_MODEL)
                .with_temperature(DEFAULT_TEMPERATURE),
        }
    }
}

/// Prompt builder plus one completion call
pub struct RecommendationEngine {
    provider: Arc<dyn LlmProvider>,
    config: AdvisorConfig,
}

impl RecommendationEngine {
    pub fn new(provider: Arc<dyn LlmProvider>, config: AdvisorConfig) -> Self {
        Self { provider, config }
    }

    pub const fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Render the analysis prompt for `candles`
    pub fn build_prompt(&self, candles: &CandleWindow) -> Result<String> {
        let market = &self.config.market;
        let threshold = self.config.probability_threshold;
        let candle_json = candles.to_json()?;

        Ok(format!(
            "You are a professional crypto futures trader with 20 years of experience analysing {symbol}.\n\
             Below are the {count} most recent candles on the {interval} timeframe \
             (t = open time in epoch ms, o/h/l/c = open/high/low/close, v = volume), oldest first:\n\
             {candle_json}\n\n\
             Reply in JSON with exactly these fields:\n\
             {REPLY_SHAPE}\n\
             Give entry (et), stop-loss (sl) and three take-profit levels (tp1, tp2, tp3) as prices, \
             prob as your estimated win probability in percent, and reason as a short rationale.\n\
             Only propose a trade if the probability is above {threshold}%. \
             If it is not, do not return a JSON decision; say briefly that there is no setup.",
            symbol = market.symbol,
            count = candles.len(),
            interval = market.interval,
        ))
    }

    /// Ask the model for a recommendation; the text comes back verbatim
    pub async fn recommend(&self, candles: &CandleWindow) -> Result<Recommendation> {
        let prompt = self.build_prompt(candles)?;
        tracing::debug!(
            chars = prompt.len(),
            est_tokens = self.provider.estimate_tokens(&prompt),
            model = %self.config.generation.model,
            "Sending analysis prompt"
        );

        let completion = self.provider.prompt(&prompt, &self.config.generation).await?;

        if completion.truncated() {
            tracing::warn!(model = %completion.model, "Completion hit the token limit");
        }

        Ok(Recommendation::new(completion.content))
    }
}
