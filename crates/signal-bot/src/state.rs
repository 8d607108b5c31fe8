//! Application State

use std::time::Instant;

use crypto_advisor::Market;

/// Read-only state shared with the liveness handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Market the trading loop watches
    pub market: Market,

    /// Process start, for uptime reporting
    pub started_at: Instant,

    /// Whether the keep-alive loop is running
    pub keep_alive: bool,
}

impl AppState {
    pub fn new(market: Market, keep_alive: bool) -> Self {
        Self {
            market,
            started_at: Instant::now(),
            keep_alive,
        }
    }
}
