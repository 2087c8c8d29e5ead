// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::unreadable_literal
    )
)]

//! Options Engine - Rust Core Library
//!
//! Deterministic options analytics: identical inputs give identical
//! outputs, and every clock-dependent operation takes its valuation instant
//! explicitly.
//!
//! # Components (leaf first)
//!
//! - `pricing`: Black-Scholes prices and Greeks, implied volatility, option chains
//! - `strategy`: legs, multi-leg strategies, static templates, structural validation
//! - `payoff`: strategy P&L across a grid of underlying prices
//! - `risk`: max profit/loss, breakevens, probability of profit, net Greeks
//! - `recommend`: template scoring against a market view, ranked recommendations
//!
//! Ambient:
//!
//! - `config`: YAML configuration with environment interpolation
//! - `error`: crate-level error with stable codes
//! - `telemetry`: optional `tracing` subscriber setup
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use options_engine::recommend::{
//!     MarketConditions, MarketOutlook, MarketSentiment, RecommendationEngine, RiskTolerance,
//!     VolatilityRegime,
//! };
//! use rust_decimal_macros::dec;
//!
//! let as_of = Utc.with_ymd_and_hms(2026, 1, 5, 15, 0, 0).unwrap();
//! let conditions = MarketConditions {
//!     outlook: MarketOutlook::Neutral,
//!     volatility: VolatilityRegime::Medium,
//!     time_horizon_days: 30,
//!     risk_tolerance: RiskTolerance::Moderate,
//!     capital_available: dec!(100000),
//!     underlying: "NIFTY".to_string(),
//!     current_price: 22_000.0,
//!     support_level: None,
//!     resistance_level: None,
//!     market_sentiment: MarketSentiment::Neutral,
//! };
//!
//! let recommendations = RecommendationEngine::with_defaults(as_of).recommend(&conditions)?;
//! assert_eq!(recommendations[0].strategy.strategy().name(), "Iron Condor");
//! # Ok::<(), options_engine::error::AnalyticsError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Core
// =============================================================================

/// Closed-form pricing, implied volatility and option chains.
pub mod pricing;

/// Multi-leg strategy model.
pub mod strategy;

/// Strategy payoff across underlying prices.
pub mod payoff;

/// Strategy risk analysis.
pub mod risk;

/// Market-view driven recommendations.
pub mod recommend;

// =============================================================================
// Ambient
// =============================================================================

/// Configuration loading.
pub mod config;

/// Crate-level errors.
pub mod error;

/// Logging setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{EngineConfig, load_config, load_config_from_string};
pub use error::{AnalyticsError, ErrorCode};
pub use payoff::{PayoffEngine, PayoutPoint};
pub use pricing::{
    Greeks, IvSolver, OptionChainGenerator, OptionPrice, OptionType, PricingParameters, price,
};
pub use recommend::{MarketConditions, RecommendationEngine, StrategyRecommendation};
pub use risk::{AnalyzedStrategy, RiskAnalyzer, RiskMetrics};
pub use strategy::{OptionLeg, Side, Strategy, StrategyKind, validate_strategy};
