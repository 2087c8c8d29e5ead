//! Strategy risk analysis over a sampled price grid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::error::AnalyticsError;
use crate::payoff::{PayoffEngine, PayoutPoint, spot_grid};
use crate::pricing::{Greeks, PricingError, PricingParameters, price, time_to_expiry};
use crate::strategy::{Strategy, validate_strategy};

use super::config::{BreakevenMethod, RiskConfig};

/// Bisection refinements per breakeven bracket.
const BISECTION_ITERATIONS: usize = 60;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from risk analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// The strategy has no legs to sample.
    #[error("Strategy has no legs to analyze")]
    NoLegs,

    /// A leg could not be priced on the grid.
    #[error("Pricing failed during risk sampling: {0}")]
    Pricing(#[from] PricingError),

    /// The sampled P&L is NaN or infinite, typically from a non-finite entry premium.
    #[error("Payoff is not finite at underlying price {spot_price}")]
    NonFinitePayoff {
        /// Grid price where the payoff broke down.
        spot_price: f64,
    },
}

// ============================================================================
// Results
// ============================================================================

/// Risk figures derived from a sampled payoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Largest sampled profit.
    pub max_profit: f64,
    /// Largest sampled loss, as a non-negative magnitude.
    pub max_loss: f64,
    /// Approximate underlying prices where net P&L crosses zero, ascending.
    pub break_even_points: Vec<f64>,
    /// Share of grid points with positive net P&L.
    ///
    /// A density over the sampled grid, not a risk-neutral probability.
    pub probability_of_profit: f64,
}

/// A strategy together with the risk metrics computed from its legs.
///
/// Only [`RiskAnalyzer`] builds these and nothing can change them
/// afterwards, so the metrics always describe the legs they sit next to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedStrategy {
    strategy: Strategy,
    metrics: RiskMetrics,
    as_of: DateTime<Utc>,
}

impl AnalyzedStrategy {
    /// The analysed strategy.
    #[must_use]
    pub const fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// All derived metrics.
    #[must_use]
    pub const fn metrics(&self) -> &RiskMetrics {
        &self.metrics
    }

    /// Valuation instant used for the analysis.
    #[must_use]
    pub const fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    /// Largest sampled profit.
    #[must_use]
    pub const fn max_profit(&self) -> f64 {
        self.metrics.max_profit
    }

    /// Largest sampled loss.
    #[must_use]
    pub const fn max_loss(&self) -> f64 {
        self.metrics.max_loss
    }

    /// Approximate breakeven prices.
    #[must_use]
    pub fn break_even_points(&self) -> &[f64] {
        &self.metrics.break_even_points
    }

    /// Grid-density probability of profit.
    #[must_use]
    pub const fn probability_of_profit(&self) -> f64 {
        self.metrics.probability_of_profit
    }

    /// Give the strategy back, dropping the metrics.
    #[must_use]
    pub fn into_strategy(self) -> Strategy {
        self.strategy
    }
}

// ============================================================================
// Analyzer
// ============================================================================

/// Samples a strategy's payoff and derives risk metrics.
#[derive(Debug, Clone)]
pub struct RiskAnalyzer {
    config: RiskConfig,
    payoff: PayoffEngine,
}

impl RiskAnalyzer {
    /// Analyzer valuing legs as of `as_of`.
    #[must_use]
    pub const fn new(config: RiskConfig, as_of: DateTime<Utc>) -> Self {
        Self {
            config,
            payoff: PayoffEngine::at(as_of),
        }
    }

    /// Analyzer with default settings, valuing legs as of `as_of`.
    #[must_use]
    pub fn with_defaults(as_of: DateTime<Utc>) -> Self {
        Self::new(RiskConfig::default(), as_of)
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Valuation instant.
    #[must_use]
    pub const fn as_of(&self) -> DateTime<Utc> {
        self.payoff.as_of()
    }

    /// Underlying prices sampled for `strategy`.
    ///
    /// Spans `[min_strike - range, max_strike + range]` where `range` is the
    /// strike spread, or `flat_range_fraction * strike` when every leg
    /// shares one strike. The lower bound never drops below `min_spot`.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::NoLegs`] for a strategy without legs.
    pub fn sample_grid(&self, strategy: &Strategy) -> Result<Vec<f64>, RiskError> {
        let (min_strike, max_strike) = strategy.strike_range().ok_or(RiskError::NoLegs)?;
        let mut range = max_strike - min_strike;
        if range == 0.0 {
            range = (self.config.flat_range_fraction * min_strike).abs();
        }
        let low = (min_strike - range).max(self.config.min_spot);
        let high = max_strike + range;
        Ok(spot_grid(low, high, self.config.grid_steps))
    }

    /// Compute risk metrics for `strategy`.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::NoLegs`] for an empty strategy,
    /// [`RiskError::Pricing`] when a live leg cannot be priced, and
    /// [`RiskError::NonFinitePayoff`] when a sampled P&L is NaN or infinite.
    pub fn analyze(&self, strategy: &Strategy) -> Result<RiskMetrics, RiskError> {
        let grid = self.sample_grid(strategy)?;
        let points =
            self.payoff
                .payout(strategy, &grid, self.config.volatility, self.config.risk_free_rate)?;
        if let Some(point) = points.iter().find(|p| !p.net_pnl.is_finite()) {
            return Err(RiskError::NonFinitePayoff {
                spot_price: point.spot_price,
            });
        }

        let max_profit = points.iter().map(|p| p.profit).fold(0.0, f64::max);
        let max_loss = points.iter().map(|p| p.loss).fold(0.0, f64::max);
        let profitable = points.iter().filter(|p| p.net_pnl > 0.0).count();
        let probability_of_profit = profitable as f64 / points.len() as f64;

        let break_even_points = match self.config.breakeven_method {
            BreakevenMethod::SignChange => sign_change_breakevens(&points),
            BreakevenMethod::Bisection => self.bisection_breakevens(strategy, &points)?,
        };

        debug!(
            strategy = strategy.id(),
            points = points.len(),
            max_profit,
            max_loss,
            breakevens = break_even_points.len(),
            probability_of_profit,
            "Risk grid sampled"
        );

        Ok(RiskMetrics {
            max_profit,
            max_loss,
            break_even_points,
            probability_of_profit,
        })
    }

    /// Analyse `strategy` and bind the metrics to it.
    ///
    /// # Errors
    ///
    /// Same as [`analyze`](Self::analyze).
    pub fn evaluate(&self, strategy: Strategy) -> Result<AnalyzedStrategy, RiskError> {
        let metrics = self.analyze(&strategy)?;
        Ok(AnalyzedStrategy {
            strategy,
            metrics,
            as_of: self.as_of(),
        })
    }

    /// Validate the strategy's structure, then evaluate it.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Validation`] with every structural problem,
    /// or [`AnalyticsError::Risk`] when sampling fails.
    pub fn evaluate_validated(&self, strategy: Strategy) -> Result<AnalyzedStrategy, AnalyticsError> {
        validate_strategy(&strategy).map_err(AnalyticsError::Validation)?;
        Ok(self.evaluate(strategy)?)
    }

    /// Position Greeks of `strategy` at `spot`, signed by side and quantity.
    ///
    /// Legs already expired at the valuation instant contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Pricing`] when a live leg cannot be priced.
    pub fn net_greeks(&self, strategy: &Strategy, spot: f64) -> Result<Greeks, RiskError> {
        strategy.legs().iter().try_fold(Greeks::zero(), |net, leg| {
            let t = time_to_expiry(leg.expiry, self.as_of());
            if t <= 0.0 {
                return Ok(net);
            }
            let params = PricingParameters::new(
                spot,
                leg.strike,
                t,
                self.config.risk_free_rate,
                self.config.volatility,
            );
            let quote = price(&params)?;
            let leg_greeks = quote.greeks_of(leg.option_type).scale(leg.position_multiplier());
            Ok(net.add(&leg_greeks))
        })
    }

    fn net_pnl_at(&self, strategy: &Strategy, spot: f64) -> Result<f64, RiskError> {
        let point = self.payoff.payout(
            strategy,
            &[spot],
            self.config.volatility,
            self.config.risk_free_rate,
        )?;
        Ok(point.first().map_or(0.0, |p| p.net_pnl))
    }

    fn bisection_breakevens(
        &self,
        strategy: &Strategy,
        points: &[PayoutPoint],
    ) -> Result<Vec<f64>, RiskError> {
        let mut roots = Vec::new();
        for (i, point) in points.iter().enumerate() {
            if point.net_pnl == 0.0 {
                if i == 0 || points[i - 1].net_pnl != 0.0 {
                    roots.push(point.spot_price);
                }
                continue;
            }
            let Some(prev) = i.checked_sub(1).map(|j| &points[j]) else {
                continue;
            };
            if prev.net_pnl * point.net_pnl < 0.0 {
                roots.push(self.bisect(strategy, prev, point)?);
            }
        }
        Ok(roots)
    }

    fn bisect(
        &self,
        strategy: &Strategy,
        lower: &PayoutPoint,
        upper: &PayoutPoint,
    ) -> Result<f64, RiskError> {
        let (mut a, mut fa) = (lower.spot_price, lower.net_pnl);
        let mut b = upper.spot_price;
        for _ in 0..BISECTION_ITERATIONS {
            let mid = 0.5 * (a + b);
            let f_mid = self.net_pnl_at(strategy, mid)?;
            if f_mid == 0.0 {
                return Ok(mid);
            }
            if fa * f_mid < 0.0 {
                b = mid;
            } else {
                a = mid;
                fa = f_mid;
            }
        }
        trace!(lower = a, upper = b, "Breakeven bracket refined");
        Ok(0.5 * (a + b))
    }
}

/// Later sample of every adjacent pair where one side is `<= 0` and the other `>= 0`.
fn sign_change_breakevens(points: &[PayoutPoint]) -> Vec<f64> {
    points
        .windows(2)
        .filter(|pair| {
            let (prev, cur) = (pair[0].net_pnl, pair[1].net_pnl);
            (prev <= 0.0 && cur >= 0.0) || (prev >= 0.0 && cur <= 0.0)
        })
        .map(|pair| pair[1].spot_price)
        .collect()
}
