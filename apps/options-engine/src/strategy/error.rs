//! Strategy validation error types.

use thiserror::Error;

use crate::pricing::OptionType;

/// A structural problem with a strategy's legs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Fewer than two legs.
    #[error("Strategy must have at least 2 legs (has {count})")]
    TooFewLegs {
        /// Number of legs present.
        count: usize,
    },

    /// Net signed quantity for one option type exceeds one contract.
    #[error("Strategy has unbalanced {option_type} positions (net {net})")]
    UnbalancedPosition {
        /// Option type whose legs are unbalanced.
        option_type: OptionType,
        /// Net signed quantity (+ long, - short).
        net: i64,
    },

    /// Two or more legs share a strike.
    #[error("All legs must have different strike prices ({strike} is repeated)")]
    DuplicateStrike {
        /// The repeated strike.
        strike: f64,
    },

    /// A leg has an out-of-domain field.
    #[error("Leg {index} is invalid: {reason}")]
    InvalidLeg {
        /// Position of the leg in the strategy.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
}
