//! Payoff Engine
//!
//! Profit and loss of a multi-leg strategy across a grid of underlying
//! prices. Legs that have expired at the valuation instant are valued at
//! intrinsic value; live legs are valued with Black-Scholes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::{PricingError, PricingParameters, intrinsic_value, price, time_to_expiry};
use crate::strategy::{OptionLeg, Strategy};

/// Strategy P&L at one underlying price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutPoint {
    /// Underlying price.
    pub spot_price: f64,
    /// `max(0, net_pnl)`.
    pub profit: f64,
    /// `max(0, -net_pnl)`.
    pub loss: f64,
    /// Sum of per-leg P&L.
    pub net_pnl: f64,
}

impl PayoutPoint {
    fn from_net(spot_price: f64, net_pnl: f64) -> Self {
        Self {
            spot_price,
            profit: net_pnl.max(0.0),
            loss: (-net_pnl).max(0.0),
            net_pnl,
        }
    }
}

/// Evenly spaced inclusive grid of `steps + 1` prices from `low` to `high`.
///
/// `spots[i] = low + i * (high - low) / steps`. A zero `steps` yields `[low]`.
#[must_use]
pub fn spot_grid(low: f64, high: f64, steps: usize) -> Vec<f64> {
    if steps == 0 {
        return vec![low];
    }
    let step = (high - low) / steps as f64;
    (0..=steps).map(|i| low + i as f64 * step).collect()
}

/// Values strategies at a fixed valuation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoffEngine {
    as_of: DateTime<Utc>,
}

impl PayoffEngine {
    /// Engine valuing legs as of `as_of`.
    #[must_use]
    pub const fn at(as_of: DateTime<Utc>) -> Self {
        Self { as_of }
    }

    /// Engine valuing legs as of the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Valuation instant.
    #[must_use]
    pub const fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    /// P&L of one leg at `spot`.
    ///
    /// `side_sign * quantity * (value - entry premium)`, where a missing
    /// premium counts as zero.
    ///
    /// # Errors
    ///
    /// Propagates [`PricingError`] for a live leg the model rejects.
    pub fn leg_pnl(
        &self,
        leg: &OptionLeg,
        spot: f64,
        volatility: f64,
        risk_free_rate: f64,
    ) -> Result<f64, PricingError> {
        let t = time_to_expiry(leg.expiry, self.as_of);
        let value = if t <= 0.0 {
            intrinsic_value(leg.option_type, spot, leg.strike)
        } else {
            let params = PricingParameters::new(spot, leg.strike, t, risk_free_rate, volatility);
            price(&params)?.price_of(leg.option_type)
        };
        Ok(leg.position_multiplier() * (value - leg.market_price.unwrap_or(0.0)))
    }

    /// P&L of `strategy` at each price in `spot_prices`, in input order.
    ///
    /// # Errors
    ///
    /// Fails on the first leg the pricing model rejects.
    pub fn payout(
        &self,
        strategy: &Strategy,
        spot_prices: &[f64],
        volatility: f64,
        risk_free_rate: f64,
    ) -> Result<Vec<PayoutPoint>, PricingError> {
        spot_prices
            .iter()
            .map(|&spot| {
                let net = strategy.legs().iter().try_fold(0.0, |acc, leg| {
                    Ok::<_, PricingError>(acc + self.leg_pnl(leg, spot, volatility, risk_free_rate)?)
                })?;
                Ok(PayoutPoint::from_net(spot, net))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::OptionType;
    use crate::strategy::{Side, StrategyKind};
    use chrono::{Duration, TimeZone};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap()
    }

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_spot_grid_is_inclusive() {
        let grid = spot_grid(90.0, 110.0, 4);
        assert_eq!(grid, vec![90.0, 95.0, 100.0, 105.0, 110.0]);
        assert_eq!(spot_grid(50.0, 60.0, 0), vec![50.0]);
        assert_eq!(spot_grid(0.01, 200.0, 100).len(), 101);
    }

    #[test]
    fn test_expired_long_call_uses_intrinsic() {
        let expired = as_of() - Duration::days(1);
        let strategy = Strategy::from_kind("c", StrategyKind::BullCallSpread).with_legs([
            OptionLeg::new("SPY", 100.0, expired, OptionType::Call, Side::Buy, 1)
                .with_market_price(3.0),
            OptionLeg::new("SPY", 110.0, expired, OptionType::Call, Side::Sell, 1)
                .with_market_price(1.0),
        ]);

        let points = PayoffEngine::at(as_of())
            .payout(&strategy, &[95.0, 105.0, 120.0], 0.3, 0.05)
            .unwrap();

        // Net debit of 2.0, spread width 10.
        assert!(approx_eq(points[0].net_pnl, -2.0, 1e-12));
        assert!(approx_eq(points[1].net_pnl, 3.0, 1e-12));
        assert!(approx_eq(points[2].net_pnl, 8.0, 1e-12));
        assert!(approx_eq(points[0].loss, 2.0, 1e-12));
        assert_eq!(points[0].profit, 0.0);
        assert_eq!(points[2].loss, 0.0);
    }

    #[test]
    fn test_expiry_at_valuation_instant_is_intrinsic() {
        let leg = OptionLeg::new("SPY", 100.0, as_of(), OptionType::Put, Side::Sell, 2);
        let pnl = PayoffEngine::at(as_of()).leg_pnl(&leg, 90.0, 0.3, 0.05).unwrap();
        assert!(approx_eq(pnl, -20.0, 1e-12));
    }

    #[test]
    fn test_live_leg_uses_model_price() {
        let expiry = as_of() + Duration::days(365);
        let leg = OptionLeg::new("SPY", 100.0, expiry, OptionType::Call, Side::Buy, 1);
        let pnl = PayoffEngine::at(as_of()).leg_pnl(&leg, 100.0, 0.2, 0.05).unwrap();
        assert!(approx_eq(pnl, 10.45, 0.01));
    }

    #[test]
    fn test_profit_and_loss_are_exclusive() {
        let expiry = as_of() + Duration::days(30);
        let strategy = StrategyKind::IronCondor.instantiate("ic", "SPY", 500.0, 10.0, expiry);
        let points = PayoffEngine::at(as_of())
            .payout(&strategy, &spot_grid(400.0, 600.0, 20), 0.3, 0.05)
            .unwrap();

        assert_eq!(points.len(), 21);
        for point in points {
            assert!(point.profit == 0.0 || point.loss == 0.0);
            assert!(approx_eq(point.profit - point.loss, point.net_pnl, 1e-12));
        }
    }

    #[test]
    fn test_non_positive_spot_is_rejected_for_live_legs() {
        let expiry = as_of() + Duration::days(30);
        let strategy = StrategyKind::Straddle.instantiate("s", "SPY", 100.0, 0.0, expiry);
        let result = PayoffEngine::at(as_of()).payout(&strategy, &[0.0], 0.3, 0.05);
        assert!(matches!(
            result,
            Err(PricingError::InvalidParameter { field: "spot_price", .. })
        ));
    }
}
