//! Recommendation error types.

use thiserror::Error;

use crate::risk::RiskError;
use crate::strategy::StrategyKind;

/// Errors from the recommendation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecommendationError {
    /// Market conditions failed validation.
    #[error("Invalid market conditions: {message}")]
    InvalidConditions {
        /// What is wrong.
        message: String,
    },

    /// A selected template would need a strike at or below zero.
    #[error(
        "Cannot strike {kind} at {current_price} with spacing {strike_spacing}: \
         leg strike {strike} is not positive"
    )]
    NonPositiveStrike {
        /// Template that could not be struck.
        kind: StrategyKind,
        /// First non-positive strike.
        strike: f64,
        /// Anchor price.
        current_price: f64,
        /// Configured strike spacing.
        strike_spacing: f64,
    },

    /// A candidate strategy could not be analysed.
    #[error("Candidate analysis failed: {0}")]
    Risk(#[from] RiskError),
}
