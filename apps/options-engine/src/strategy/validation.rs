//! Strategy validation utilities.

use crate::pricing::OptionType;

use super::error::ValidationError;
use super::types::Strategy;

/// Largest net long or short contract count allowed per option type.
const MAX_NET_IMBALANCE: i64 = 1;

/// Validate the structure of a strategy.
///
/// Every check runs; all violations are returned together.
///
/// # Errors
///
/// Returns the full list of [`ValidationError`]s when any check fails.
pub fn validate_strategy(strategy: &Strategy) -> Result<(), Vec<ValidationError>> {
    let legs = strategy.legs();
    let mut errors = Vec::new();

    if legs.len() < 2 {
        errors.push(ValidationError::TooFewLegs { count: legs.len() });
    }

    for (index, leg) in legs.iter().enumerate() {
        if !leg.strike.is_finite() || leg.strike <= 0.0 {
            errors.push(ValidationError::InvalidLeg {
                index,
                reason: format!("strike must be positive, got {}", leg.strike),
            });
        }
        if leg.quantity == 0 {
            errors.push(ValidationError::InvalidLeg {
                index,
                reason: "quantity must be at least 1".to_string(),
            });
        }
    }

    for option_type in [OptionType::Call, OptionType::Put] {
        let net: i64 = legs
            .iter()
            .filter(|leg| leg.option_type == option_type)
            .map(|leg| leg.signed_quantity())
            .sum();
        if net.abs() > MAX_NET_IMBALANCE {
            errors.push(ValidationError::UnbalancedPosition { option_type, net });
        }
    }

    let mut seen: Vec<f64> = Vec::with_capacity(legs.len());
    let mut repeated: Vec<f64> = Vec::new();
    for leg in legs {
        if seen.contains(&leg.strike) {
            if !repeated.contains(&leg.strike) {
                repeated.push(leg.strike);
            }
        } else {
            seen.push(leg.strike);
        }
    }
    errors.extend(
        repeated
            .into_iter()
            .map(|strike| ValidationError::DuplicateStrike { strike }),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
