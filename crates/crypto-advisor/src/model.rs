//! Domain Models
//!
//! Candles as delivered by the exchange, the market being watched, and the
//! opaque recommendation text returned by the model.
//!
//! Prices are `f64`: candles only travel into a prompt, no money is computed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AdvisorError, Result};

/// Largest page the exchange serves for one kline request
pub const MAX_CANDLE_LIMIT: u16 = 1500;

/// Timeframe codes the exchange accepts
pub const SUPPORTED_INTERVALS: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

/// One OHLCV bucket
///
/// Serializes with the compact keys used inside the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time, epoch milliseconds
    #[serde(rename = "t")]
    pub open_time: i64,

    #[serde(rename = "o")]
    pub open: f64,

    #[serde(rename = "h")]
    pub high: f64,

    #[serde(rename = "l")]
    pub low: f64,

    #[serde(rename = "c")]
    pub close: f64,

    #[serde(rename = "v")]
    pub volume: f64,
}

impl Candle {
    /// Parse one exchange kline row.
    ///
    /// Positions 0..=5 are open time, open, high, low, close, volume; anything
    /// after that is ignored. Numeric fields may be JSON numbers or decimal
    /// strings (the exchange sends strings).
    pub fn from_kline_row(row: &Value) -> Result<Self> {
        let fields = row
            .as_array()
            .ok_or_else(|| AdvisorError::parse(format!("kline row is not an array: {row}")))?;

        if fields.len() < 6 {
            return Err(AdvisorError::parse(format!(
                "kline row has {} fields, expected at least 6",
                fields.len()
            )));
        }

        Ok(Self {
            open_time: int_field(&fields[0], "open time")?,
            open: float_field(&fields[1], "open")?,
            high: float_field(&fields[2], "high")?,
            low: float_field(&fields[3], "low")?,
            close: float_field(&fields[4], "close")?,
            volume: float_field(&fields[5], "volume")?,
        })
    }

    /// Open time as a UTC timestamp, if representable
    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.open_time)
    }
}

fn float_field(value: &Value, name: &str) -> Result<f64> {
    let parsed: f64 = match value {
        Value::String(s) => s
            .parse()
            .map_err(|_| AdvisorError::parse(format!("{name} is not numeric: {s:?}"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AdvisorError::parse(format!("{name} out of range: {n}"))),
        other => Err(AdvisorError::parse(format!("{name} has unexpected type: {other}"))),
    }?;

    // Non-finite values would serialize as null in the prompt
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(AdvisorError::parse(format!("{name} is not finite: {value}")))
    }
}

fn int_field(value: &Value, name: &str) -> Result<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| AdvisorError::parse(format!("{name} is not an integer: {n}"))),
        Value::String(s) => s
            .parse()
            .map_err(|_| AdvisorError::parse(format!("{name} is not an integer: {s:?}"))),
        other => Err(AdvisorError::parse(format!("{name} has unexpected type: {other}"))),
    }
}

/// Candles in exchange order (oldest first)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandleWindow {
    candles: Vec<Candle>,
}

impl CandleWindow {
    pub const fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    /// Parse every row; the first malformed row fails the whole window
    pub fn from_rows(rows: &[Value]) -> Result<Self> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                Candle::from_kline_row(row).map_err(|e| match e {
                    AdvisorError::Parse(msg) => AdvisorError::Parse(format!("row {i}: {msg}")),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    /// Most recent candle
    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Compact JSON array embedded in the prompt
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.candles)
            .map_err(|e| AdvisorError::parse(format!("failed to serialize candles: {e}")))
    }
}

impl<'a> IntoIterator for &'a CandleWindow {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}

/// Instrument and window requested each cycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Trading pair, e.g. "BTCUSDT"
    pub symbol: String,

    /// Timeframe code, e.g. "15m"
    pub interval: String,

    /// Candles per request
    pub limit: u16,
}

impl Default for Market {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".into(),
            interval: "15m".into(),
            limit: 100,
        }
    }
}

impl Market {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, limit: u16) -> Result<Self> {
        let market = Self {
            symbol: symbol.into().trim().to_uppercase(),
            interval: interval.into().trim().to_string(),
            limit,
        };
        market.validate()?;
        Ok(market)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.is_empty() || !self.symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AdvisorError::Config(format!("invalid symbol {:?}", self.symbol)));
        }
        if !SUPPORTED_INTERVALS.contains(&self.interval.as_str()) {
            return Err(AdvisorError::Config(format!(
                "unsupported interval {:?} (expected one of {})",
                self.interval,
                SUPPORTED_INTERVALS.join(", ")
            )));
        }
        if self.limit == 0 || self.limit > MAX_CANDLE_LIMIT {
            return Err(AdvisorError::Config(format!(
                "candle limit {} outside 1..={MAX_CANDLE_LIMIT}",
                self.limit
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.symbol, self.interval)
    }
}

/// Raw model output.
///
/// Expected to resemble a JSON trade plan but never parsed or validated:
/// whoever reads the chat message interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendation(String);

impl Recommendation {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
