//! Environment Configuration
//!
//! Everything is resolved once at startup into an immutable `Settings`
//! that is handed to each component explicitly.

use std::time::Duration;

use agent_runtime::groq::DEFAULT_BASE_URL as GROQ_BASE_URL;
use crypto_advisor::{
    AdvisorError, Market, Result,
    advisor::{DEFAULT_MODEL, DEFAULT_PROBABILITY_THRESHOLD},
    exchange::BINANCE_FUTURES_URL,
    notify::TELEGRAM_API_BASE,
};

const DEFAULT_CYCLE_SECS: u64 = 15 * 60;
const DEFAULT_KEEP_ALIVE_SECS: u64 = 10 * 60;
const DEFAULT_PORT: u16 = 10_000;

/// Process-wide settings
#[derive(Clone)]
pub struct Settings {
    pub groq_api_key: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,

    /// Public address pinged by the keep-alive loop; loop disabled when unset
    pub self_ping_url: Option<String>,

    pub market: Market,
    pub cycle_interval: Duration,
    pub probability_threshold: u8,
    pub port: u16,
    pub keep_alive_interval: Duration,

    pub llm_model: String,
    pub binance_base_url: String,
    pub groq_base_url: String,
    pub telegram_api_base: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("groq_api_key", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("self_ping_url", &self.self_ping_url)
            .field("market", &self.market)
            .field("cycle_interval", &self.cycle_interval)
            .field("probability_threshold", &self.probability_threshold)
            .field("port", &self.port)
            .field("keep_alive_interval", &self.keep_alive_interval)
            .field("llm_model", &self.llm_model)
            .field("binance_base_url", &self.binance_base_url)
            .field("groq_base_url", &self.groq_base_url)
            .field("telegram_api_base", &self.telegram_api_base)
            .finish()
    }
}

impl Settings {
    /// Read from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve through `lookup`; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env(lookup);

        let groq_api_key = env.required("GROQ_API_KEY")?;
        let telegram_token = env.required("TELEGRAM_TOKEN")?;
        let telegram_chat_id = env.required("TELEGRAM_CHAT_ID")?;

        let market = Market::new(
            env.optional("SYMBOL").unwrap_or_else(|| "BTCUSDT".into()),
            env.optional("INTERVAL").unwrap_or_else(|| "15m".into()),
            env.parsed("CANDLE_LIMIT", 100)?,
        )?;

        let probability_threshold = env.parsed("PROB_THRESHOLD", DEFAULT_PROBABILITY_THRESHOLD)?;
        if probability_threshold > 100 {
            return Err(AdvisorError::Config(format!(
                "PROB_THRESHOLD must be a percentage, got {probability_threshold}"
            )));
        }

        Ok(Self {
            groq_api_key,
            telegram_token,
            telegram_chat_id,
            self_ping_url: env.optional("SELF_PING_URL"),
            market,
            cycle_interval: env.seconds("CYCLE_INTERVAL_SECS", DEFAULT_CYCLE_SECS)?,
            probability_threshold,
            port: env.parsed("PORT", DEFAULT_PORT)?,
            keep_alive_interval: env.seconds("KEEP_ALIVE_INTERVAL_SECS", DEFAULT_KEEP_ALIVE_SECS)?,
            llm_model: env.optional("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            binance_base_url: env
                .optional("BINANCE_BASE_URL")
                .unwrap_or_else(|| BINANCE_FUTURES_URL.into()),
            groq_base_url: env.optional("GROQ_BASE_URL").unwrap_or_else(|| GROQ_BASE_URL.into()),
            telegram_api_base: env
                .optional("TELEGRAM_API_BASE")
                .unwrap_or_else(|| TELEGRAM_API_BASE.into()),
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .ok_or_else(|| AdvisorError::Config(format!("missing required environment variable {key}")))
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.parse()
                .map_err(|e| AdvisorError::Config(format!("{key}={raw:?} is invalid: {e}")))
        })
    }

    fn seconds(&self, key: &str, default: u64) -> Result<Duration> {
        match self.parsed(key, default)? {
            0 => Err(AdvisorError::Config(format!("{key} must be greater than zero"))),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}
