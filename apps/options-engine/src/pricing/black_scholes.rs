//! Black-Scholes Pricing Engine
//!
//! Closed-form European option prices (no dividends) and analytic Greeks.
//! Inputs are validated up front: a zero volatility or zero time to expiry
//! makes d1/d2 undefined, so those are rejected instead of producing NaN.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from closed-form pricing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// A pricing input is out of its valid domain.
    #[error("Invalid pricing parameter {field} = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f64,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

// ============================================================================
// Core Types
// ============================================================================

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionType {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "Call"),
            Self::Put => write!(f, "Put"),
        }
    }
}

/// Inputs that fully determine a pricing result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingParameters {
    /// Current underlying price.
    pub spot_price: f64,
    /// Strike price.
    pub strike_price: f64,
    /// Time to expiry in years.
    pub time_to_expiry: f64,
    /// Continuously compounded risk-free rate.
    pub risk_free_rate: f64,
    /// Annualized volatility.
    pub volatility: f64,
}

impl PricingParameters {
    /// Create a new parameter set.
    #[must_use]
    pub const fn new(
        spot_price: f64,
        strike_price: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        volatility: f64,
    ) -> Self {
        Self {
            spot_price,
            strike_price,
            time_to_expiry,
            risk_free_rate,
            volatility,
        }
    }

    /// Same parameters at a different volatility.
    #[must_use]
    pub const fn with_volatility(self, volatility: f64) -> Self {
        Self { volatility, ..self }
    }

    /// Same parameters at a different spot price.
    #[must_use]
    pub const fn with_spot(self, spot_price: f64) -> Self {
        Self { spot_price, ..self }
    }

    /// Check that the closed form is defined for these inputs.
    pub fn validate(&self) -> Result<(), PricingError> {
        positive("spot_price", self.spot_price)?;
        positive("strike_price", self.strike_price)?;
        positive("time_to_expiry", self.time_to_expiry)?;
        positive("volatility", self.volatility)?;
        if !self.risk_free_rate.is_finite() {
            return Err(PricingError::InvalidParameter {
                field: "risk_free_rate",
                value: self.risk_free_rate,
                reason: "must be finite",
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), PricingError> {
    if !value.is_finite() {
        return Err(PricingError::InvalidParameter {
            field,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(PricingError::InvalidParameter {
            field,
            value,
            reason: "must be strictly positive",
        });
    }
    Ok(())
}

/// Greeks for an option or an aggregated position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta - rate of change of option price with respect to underlying price.
    pub delta: f64,
    /// Gamma - rate of change of delta with respect to underlying price.
    pub gamma: f64,
    /// Theta - rate of change of option price with respect to time (per year).
    pub theta: f64,
    /// Vega - sensitivity to volatility (per 1.00 change in volatility).
    pub vega: f64,
    /// Rho - sensitivity to the risk-free rate (per 1.00 change in rate).
    pub rho: f64,
}

impl Greeks {
    /// Create zero Greeks.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            delta: 0.0,
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
            rho: 0.0,
        }
    }

    /// Scale Greeks by a quantity (positive for long, negative for short).
    #[must_use]
    pub fn scale(&self, quantity: f64) -> Self {
        Self {
            delta: self.delta * quantity,
            gamma: self.gamma * quantity,
            theta: self.theta * quantity,
            vega: self.vega * quantity,
            rho: self.rho * quantity,
        }
    }

    /// Add another set of Greeks to this one.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
        }
    }
}

/// Call and put prices with their Greeks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionPrice {
    /// Call premium.
    pub call_price: f64,
    /// Put premium.
    pub put_price: f64,
    /// Call Greeks.
    pub call_greeks: Greeks,
    /// Put Greeks.
    pub put_greeks: Greeks,
}

impl OptionPrice {
    /// Premium for the requested side.
    #[must_use]
    pub const fn price_of(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.call_price,
            OptionType::Put => self.put_price,
        }
    }

    /// Greeks for the requested side.
    #[must_use]
    pub const fn greeks_of(&self, option_type: OptionType) -> &Greeks {
        match option_type {
            OptionType::Call => &self.call_greeks,
            OptionType::Put => &self.put_greeks,
        }
    }
}

// ============================================================================
// Black-Scholes
// ============================================================================

/// Standard normal CDF (cumulative distribution function).
pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / SQRT_2))
}

/// Standard normal PDF (probability density function).
pub(crate) fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 and d2 for already validated parameters.
fn d1_d2(p: &PricingParameters) -> (f64, f64) {
    let vol_sqrt_t = p.volatility * p.time_to_expiry.sqrt();
    let d1 = ((p.spot_price / p.strike_price).ln()
        + (p.risk_free_rate + 0.5 * p.volatility * p.volatility) * p.time_to_expiry)
        / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Price a European call and put and compute their Greeks.
///
/// # Errors
///
/// Returns [`PricingError::InvalidParameter`] when spot, strike, time to
/// expiry or volatility is non-positive, or any input is not finite.
pub fn price(params: &PricingParameters) -> Result<OptionPrice, PricingError> {
    params.validate()?;

    let s = params.spot_price;
    let k = params.strike_price;
    let t = params.time_to_expiry;
    let r = params.risk_free_rate;
    let sigma = params.volatility;

    let (d1, d2) = d1_d2(params);
    let sqrt_t = t.sqrt();
    let discounted_strike = k * (-r * t).exp();
    let pdf_d1 = norm_pdf(d1);

    let call_price = s * norm_cdf(d1) - discounted_strike * norm_cdf(d2);
    // Put-call parity
    let put_price = call_price - s + discounted_strike;

    let gamma = pdf_d1 / (s * sigma * sqrt_t);
    let vega = s * pdf_d1 * sqrt_t;
    let decay = -s * pdf_d1 * sigma / (2.0 * sqrt_t);

    let call_greeks = Greeks {
        delta: norm_cdf(d1),
        gamma,
        theta: decay - r * discounted_strike * norm_cdf(d2),
        vega,
        rho: k * t * (-r * t).exp() * norm_cdf(d2),
    };

    let put_greeks = Greeks {
        delta: norm_cdf(d1) - 1.0,
        gamma,
        theta: decay + r * discounted_strike * norm_cdf(-d2),
        vega,
        rho: -k * t * (-r * t).exp() * norm_cdf(-d2),
    };

    Ok(OptionPrice {
        call_price,
        put_price,
        call_greeks,
        put_greeks,
    })
}

/// Value of an option exercised immediately.
#[must_use]
pub fn intrinsic_value(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

// ============================================================================
// Tests
// ============================================================================
