//! Currency→USD rate table and the decorative market walk
//!
//! Rates here are illustrative display projections only. Nothing in this
//! module feeds settlement: orders carry their own amount and currency, and
//! the server owns all real accounting.

use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::identity::Stats;
use crate::orders::Currency;
use crate::state::Session;

/// TON walk band
const TON_MIN: f64 = 4.5;
const TON_MAX: f64 = 6.5;
const TON_START: f64 = 5.5;

/// Approximate USD rates per settlement currency
#[derive(Debug)]
pub struct RateTable {
    rates: RwLock<HashMap<Currency, f64>>,
}

impl Default for RateTable {
    fn default() -> Self {
        let mut rates = HashMap::new();
        rates.insert(Currency::Rub, 0.011);
        rates.insert(Currency::Usd, 1.0);
        rates.insert(Currency::Eur, 1.09);
        rates.insert(Currency::Kzt, 0.0022);
        rates.insert(Currency::Uah, 0.024);
        rates.insert(Currency::Ton, TON_START);
        rates.insert(Currency::Stars, 0.013);
        Self {
            rates: RwLock::new(rates),
        }
    }
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current USD rate for a currency
    pub async fn rate(&self, currency: Currency) -> f64 {
        self.rates
            .read()
            .await
            .get(&currency)
            .copied()
            .unwrap_or(1.0)
    }

    /// Convert an amount into its USD display value
    pub async fn to_usd(&self, amount: f64, currency: Currency) -> f64 {
        amount * self.rate(currency).await
    }

    /// USD projection of the per-currency cumulative volumes
    pub async fn total_volume_usd(&self, stats: &Stats) -> f64 {
        let rates = self.rates.read().await;
        stats
            .volumes
            .iter()
            .map(|(currency, amount)| amount * rates.get(currency).copied().unwrap_or(1.0))
            .sum()
    }

    /// One tick of the TON random walk: up to ±2%, two decimals, clamped
    pub async fn walk_ton_rate(&self) {
        // Draw outside the lock; thread_rng is not Send across awaits.
        let change = (rand::thread_rng().gen::<f64>() - 0.5) * 0.04;

        let mut rates = self.rates.write().await;
        let current = rates.get(&Currency::Ton).copied().unwrap_or(TON_START);
        let next = ((current * (1.0 + change)) * 100.0).round() / 100.0;
        let next = next.clamp(TON_MIN, TON_MAX);
        rates.insert(Currency::Ton, next);
        tracing::debug!(rate = next, "TON display rate tick");
    }
}

/// Background task nudging the TON display rate on a fixed interval
pub async fn run_rate_walk(session: Arc<Session>, interval: Duration) {
    tracing::info!(interval_secs = interval.as_secs(), "Starting rate walk task");
    loop {
        tokio::time::sleep(interval).await;
        session.rates.walk_ton_rate().await;
    }
}
