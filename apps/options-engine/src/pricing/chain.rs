//! Option chain generation.
//!
//! Prices calls and puts across a strike ladder for one expiry. Strikes are
//! independent, so they are priced in parallel; output order always matches
//! input order.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::black_scholes::{Greeks, PricingError, PricingParameters, price};

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// One strike row of an option chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// Strike price.
    pub strike: f64,
    /// Call premium.
    pub call_price: f64,
    /// Put premium.
    pub put_price: f64,
    /// Call Greeks.
    pub call_greeks: Greeks,
    /// Put Greeks.
    pub put_greeks: Greeks,
    /// Time to expiry in years used for this row.
    pub time_to_expiry: f64,
    /// Volatility used for this row.
    pub volatility: f64,
}

/// Year fraction between `now` and `expiry` (fractional days / 365).
///
/// Negative once `expiry` has passed.
#[must_use]
pub fn time_to_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (expiry - now).num_milliseconds() as f64;
    millis / MILLIS_PER_DAY / DAYS_PER_YEAR
}

/// Symmetric strike ladder: `center ± i * step` for `i` in `0..=steps_each_side`, ascending.
#[must_use]
pub fn strike_ladder(center: f64, step: f64, steps_each_side: u32) -> Vec<f64> {
    let n = i64::from(steps_each_side);
    (-n..=n).map(|i| center + i as f64 * step).collect()
}

/// Generates option chains at a fixed volatility and rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionChainGenerator {
    volatility: f64,
    risk_free_rate: f64,
}

impl Default for OptionChainGenerator {
    fn default() -> Self {
        Self::new(0.3, 0.05)
    }
}

impl OptionChainGenerator {
    /// Create a generator pricing every strike at `volatility` and `risk_free_rate`.
    #[must_use]
    pub const fn new(volatility: f64, risk_free_rate: f64) -> Self {
        Self {
            volatility,
            risk_free_rate,
        }
    }

    /// Volatility applied to every strike.
    #[must_use]
    pub const fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Risk-free rate applied to every strike.
    #[must_use]
    pub const fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Generate a chain measured from the current wall-clock time.
    pub fn generate(
        &self,
        spot: f64,
        expiry: DateTime<Utc>,
        strikes: &[f64],
    ) -> Result<Vec<ChainEntry>, PricingError> {
        self.generate_at(Utc::now(), spot, expiry, strikes)
    }

    /// Generate a chain measured from `now`.
    ///
    /// # Errors
    ///
    /// Fails on the first strike the pricer rejects; an expiry at or before
    /// `now` is rejected for every strike.
    pub fn generate_at(
        &self,
        now: DateTime<Utc>,
        spot: f64,
        expiry: DateTime<Utc>,
        strikes: &[f64],
    ) -> Result<Vec<ChainEntry>, PricingError> {
        let t = time_to_expiry(expiry, now);

        strikes
            .par_iter()
            .map(|&strike| -> Result<ChainEntry, PricingError> {
                let params =
                    PricingParameters::new(spot, strike, t, self.risk_free_rate, self.volatility);
                let prices = price(&params)?;
                Ok(ChainEntry {
                    strike,
                    call_price: prices.call_price,
                    put_price: prices.put_price,
                    call_greeks: prices.call_greeks,
                    put_greeks: prices.put_greeks,
                    time_to_expiry: t,
                    volatility: self.volatility,
                })
            })
            .collect()
    }
}
