//! # crypto-advisor
//!
//! Polls an exchange for recent candles, asks an LLM for a trade plan and
//! relays the answer to a chat channel.
//!
//! ## Flow
//!
//! ```text
//! ┌────────────────┐    ┌──────────────────────┐    ┌────────────────┐
//! │ ExchangeClient │───▶│ RecommendationEngine │───▶│    Notifier    │
//! │  (klines)      │    │ (prompt + LLM call)  │    │  (Telegram)    │
//! └────────────────┘    └──────────────────────┘    └────────────────┘
//!          ▲                                                 │
//!          └──────────────── TradingCycle ───────────────────┘
//! ```
//!
//! Each cycle is stateless. The model's answer is relayed as-is; nothing
//! here parses or enforces the requested JSON shape.

pub mod advisor;
pub mod cycle;
pub mod error;
pub mod exchange;
pub mod model;
pub mod notify;

#[cfg(test)]
mod test_support;

pub use advisor::{AdvisorConfig, RecommendationEngine};
pub use cycle::{CycleOutcome, TradingCycle, format_report};
pub use error::{AdvisorError, ErrorKind, Result};
pub use model::{Candle, CandleWindow, Market, Recommendation};
