//! Risk sampling configuration.

use serde::{Deserialize, Serialize};

use crate::config::{default_risk_free_rate, default_volatility};

/// How breakeven prices are located on the sampled grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakevenMethod {
    /// Record the later sample of every adjacent pair whose P&L crosses zero.
    ///
    /// Legacy approximation: roots closer together than one grid step can be
    /// missed, and a sample landing exactly on zero is reported twice.
    #[default]
    SignChange,
    /// Refine every sign-change bracket to a root by bisection.
    Bisection,
}

/// Configuration for [`RiskAnalyzer`](super::RiskAnalyzer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Number of grid increments; the grid has `grid_steps + 1` points.
    #[serde(default = "default_grid_steps")]
    pub grid_steps: usize,
    /// Volatility used to value live legs.
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    /// Risk-free rate used to value live legs.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Half-width of the grid, as a fraction of the strike, when every leg
    /// shares one strike.
    #[serde(default = "default_flat_range_fraction")]
    pub flat_range_fraction: f64,
    /// Floor for the lowest sampled underlying price.
    #[serde(default = "default_min_spot")]
    pub min_spot: f64,
    /// Breakeven detection method.
    #[serde(default)]
    pub breakeven_method: BreakevenMethod,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            grid_steps: default_grid_steps(),
            volatility: default_volatility(),
            risk_free_rate: default_risk_free_rate(),
            flat_range_fraction: default_flat_range_fraction(),
            min_spot: default_min_spot(),
            breakeven_method: BreakevenMethod::default(),
        }
    }
}

const fn default_grid_steps() -> usize {
    100
}

const fn default_flat_range_fraction() -> f64 {
    0.2
}

const fn default_min_spot() -> f64 {
    0.01
}
