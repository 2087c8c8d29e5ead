//! Strategy risk analysis.
//!
//! Samples a strategy's payoff over a price grid derived from its strikes
//! and reports:
//!
//! - Maximum sampled profit and loss
//! - Approximate breakeven prices (sign-change scan, or bisection)
//! - A naive probability of profit (share of profitable grid points)
//! - Net position Greeks

mod analyzer;
mod config;

pub use analyzer::{AnalyzedStrategy, RiskAnalyzer, RiskError, RiskMetrics};
pub use config::{BreakevenMethod, RiskConfig};
