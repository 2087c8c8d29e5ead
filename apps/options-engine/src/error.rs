//! Crate-level error handling.
//!
//! Each module reports its own `thiserror` enum. [`AnalyticsError`] wraps
//! them for hosts that want a single error type, and maps every failure to
//! a stable [`ErrorCode`] they can ship across a boundary.
//!
//! | Code | Raised by |
//! |------|-----------|
//! | `INVALID_PRICING_INPUT` | closed-form pricing |
//! | `INVALID_VOLATILITY_INPUT` | implied volatility solver |
//! | `VOLATILITY_NOT_BRACKETED` | implied volatility bisection |
//! | `INVALID_STRATEGY` | strategy validation |
//! | `EMPTY_STRATEGY` | risk analysis of a strategy without legs |
//! | `RISK_SAMPLING_FAILED` | pricing failure or non-finite P&L inside risk analysis |
//! | `INVALID_MARKET_CONDITIONS` | recommendation input checks |
//! | `NON_POSITIVE_STRIKE` | recommendation candidate below zero strike |
//! | `INVALID_CONFIG` | configuration loading |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::pricing::{IvError, PricingError};
use crate::recommend::RecommendationError;
use crate::risk::RiskError;
use crate::strategy::ValidationError;

/// Stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Pricing input out of domain.
    InvalidPricingInput,
    /// Implied volatility input out of domain.
    InvalidVolatilityInput,
    /// Observed price outside the volatility bracket.
    VolatilityNotBracketed,
    /// Structural strategy problem.
    InvalidStrategy,
    /// Strategy without legs.
    EmptyStrategy,
    /// Pricing failed while sampling a payoff.
    RiskSamplingFailed,
    /// Market conditions out of range.
    InvalidMarketConditions,
    /// A recommended template cannot be struck at the current price.
    NonPositiveStrike,
    /// Configuration could not be loaded.
    InvalidConfig,
}

impl ErrorCode {
    /// Machine-readable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidPricingInput => "INVALID_PRICING_INPUT",
            Self::InvalidVolatilityInput => "INVALID_VOLATILITY_INPUT",
            Self::VolatilityNotBracketed => "VOLATILITY_NOT_BRACKETED",
            Self::InvalidStrategy => "INVALID_STRATEGY",
            Self::EmptyStrategy => "EMPTY_STRATEGY",
            Self::RiskSamplingFailed => "RISK_SAMPLING_FAILED",
            Self::InvalidMarketConditions => "INVALID_MARKET_CONDITIONS",
            Self::NonPositiveStrike => "NON_POSITIVE_STRIKE",
            Self::InvalidConfig => "INVALID_CONFIG",
        }
    }

    /// Whether the caller supplied bad input, as opposed to a numeric failure.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::VolatilityNotBracketed | Self::RiskSamplingFailed)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Any error the engine can report.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Closed-form pricing rejected its input.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The implied volatility solver failed.
    #[error(transparent)]
    ImpliedVolatility(#[from] IvError),

    /// A strategy failed structural validation.
    #[error("Strategy validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// Risk analysis failed.
    #[error(transparent)]
    Risk(#[from] RiskError),

    /// Recommendation failed.
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),

    /// Configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

const fn risk_code(error: &RiskError) -> ErrorCode {
    match error {
        RiskError::NoLegs => ErrorCode::EmptyStrategy,
        RiskError::Pricing(_) | RiskError::NonFinitePayoff { .. } => {
            ErrorCode::RiskSamplingFailed
        }
    }
}

impl AnalyticsError {
    /// Stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Pricing(_) => ErrorCode::InvalidPricingInput,
            Self::ImpliedVolatility(IvError::InvalidInput { .. }) => {
                ErrorCode::InvalidVolatilityInput
            }
            Self::ImpliedVolatility(IvError::NoSolution { .. }) => {
                ErrorCode::VolatilityNotBracketed
            }
            Self::Validation(_) => ErrorCode::InvalidStrategy,
            Self::Risk(e) | Self::Recommendation(RecommendationError::Risk(e)) => risk_code(e),
            Self::Recommendation(RecommendationError::InvalidConditions { .. }) => {
                ErrorCode::InvalidMarketConditions
            }
            Self::Recommendation(RecommendationError::NonPositiveStrike { .. }) => {
                ErrorCode::NonPositiveStrike
            }
            Self::Config(_) => ErrorCode::InvalidConfig,
        }
    }

    /// Machine-readable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.code().reason()
    }
}

impl From<Vec<ValidationError>> for AnalyticsError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}
