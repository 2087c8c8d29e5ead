//! Strategy recommendations from a trader's market view.
//!
//! Every template is scored against the stated outlook, volatility regime,
//! risk tolerance, horizon, sentiment and capital. The best candidates are
//! struck around the current price, analysed, and returned with their
//! reasoning and score breakdown.

mod conditions;
mod engine;
mod error;
mod insights;
mod scoring;
mod suitability;

pub use conditions::{
    MarketConditions, MarketOutlook, MarketSentiment, RiskTolerance, VolatilityRegime,
};
pub use engine::{
    RecommendationConfig, RecommendationEngine, StrategyRecommendation, risk_level_for,
};
pub use error::RecommendationError;
pub use insights::{MarketInsights, market_insights, outlook_playbook, volatility_playbook};
pub use scoring::{
    Factor, FactorContribution, ScoreBreakdown, ScoringWeights, Verdict, capital_efficiency,
    score_strategy,
};
pub use suitability::{ConditionBuckets, RANKING_ORDER, Suitability};
