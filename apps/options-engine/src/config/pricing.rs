//! Pricing model configuration for option chains.

use serde::{Deserialize, Serialize};

/// Pricing model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Risk-free rate (annualized, continuously compounded).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Volatility used when no implied volatility is supplied.
    #[serde(default = "default_volatility")]
    pub default_volatility: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            default_volatility: default_volatility(),
        }
    }
}

pub(crate) const fn default_risk_free_rate() -> f64 {
    0.05
}

pub(crate) const fn default_volatility() -> f64 {
    0.3
}

pub(crate) const fn default_true() -> bool {
    true
}
