//! Trader market view.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::RecommendationError;

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Lowercase label used in reasoning text.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled_enum! {
    /// Expected direction of the underlying.
    MarketOutlook {
        /// Expect a rise.
        Bullish => "bullish",
        /// Expect a fall.
        Bearish => "bearish",
        /// Expect a range.
        Neutral => "neutral",
    }
}

labelled_enum! {
    /// Volatility regime.
    VolatilityRegime {
        /// Low implied volatility.
        Low => "low",
        /// Medium implied volatility.
        Medium => "medium",
        /// High implied volatility.
        High => "high",
    }
}

labelled_enum! {
    /// Trader risk appetite.
    RiskTolerance {
        /// Defined, small risk only.
        Conservative => "conservative",
        /// Balanced.
        Moderate => "moderate",
        /// Accepts large swings.
        Aggressive => "aggressive",
    }
}

labelled_enum! {
    /// Prevailing market mood.
    MarketSentiment {
        /// Risk-off.
        Fear => "fear",
        /// Neither.
        Neutral => "neutral",
        /// Risk-on.
        Greed => "greed",
    }
}

/// A trader's stated market view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConditions {
    /// Expected direction.
    pub outlook: MarketOutlook,
    /// Volatility regime.
    pub volatility: VolatilityRegime,
    /// Holding period in days.
    pub time_horizon_days: u32,
    /// Risk appetite.
    pub risk_tolerance: RiskTolerance,
    /// Capital available to deploy.
    pub capital_available: Decimal,
    /// Underlying symbol.
    pub underlying: String,
    /// Current underlying price.
    pub current_price: f64,
    /// Support level, if known.
    #[serde(default)]
    pub support_level: Option<f64>,
    /// Resistance level, if known.
    #[serde(default)]
    pub resistance_level: Option<f64>,
    /// Market mood.
    pub market_sentiment: MarketSentiment,
}

impl MarketConditions {
    /// Check field domains.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationError::InvalidConditions`] naming the first
    /// field out of range.
    pub fn validate(&self) -> Result<(), RecommendationError> {
        if !self.current_price.is_finite() || self.current_price <= 0.0 {
            return Err(RecommendationError::InvalidConditions {
                message: format!("current_price must be positive, got {}", self.current_price),
            });
        }
        if self.time_horizon_days == 0 {
            return Err(RecommendationError::InvalidConditions {
                message: "time_horizon_days must be at least 1".to_string(),
            });
        }
        if self.capital_available < Decimal::ZERO {
            return Err(RecommendationError::InvalidConditions {
                message: format!(
                    "capital_available must not be negative, got {}",
                    self.capital_available
                ),
            });
        }
        if let (Some(support), Some(resistance)) = (self.support_level, self.resistance_level)
            && support >= resistance
        {
            return Err(RecommendationError::InvalidConditions {
                message: format!(
                    "support_level ({support}) must be below resistance_level ({resistance})"
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn sample_conditions() -> MarketConditions {
        MarketConditions {
            outlook: MarketOutlook::Neutral,
            volatility: VolatilityRegime::Medium,
            time_horizon_days: 30,
            risk_tolerance: RiskTolerance::Moderate,
            capital_available: dec!(100000),
            underlying: "NIFTY".to_string(),
            current_price: 22_000.0,
            support_level: None,
            resistance_level: None,
            market_sentiment: MarketSentiment::Neutral,
        }
    }

    #[test]
    fn test_labels_are_lowercase() {
        assert_eq!(MarketOutlook::Bullish.to_string(), "bullish");
        assert_eq!(VolatilityRegime::High.label(), "high");
        assert_eq!(RiskTolerance::Conservative.label(), "conservative");
        assert_eq!(MarketSentiment::Greed.to_string(), "greed");
    }

    #[test]
    fn test_valid_conditions() {
        assert!(sample_conditions().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let conditions = MarketConditions {
            current_price: 0.0,
            ..sample_conditions()
        };
        let err = conditions.validate().unwrap_err();
        assert!(err.to_string().contains("current_price"));
    }

    #[test]
    fn test_rejects_zero_horizon() {
        let conditions = MarketConditions {
            time_horizon_days: 0,
            ..sample_conditions()
        };
        assert!(conditions.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_capital() {
        let conditions = MarketConditions {
            capital_available: dec!(-1),
            ..sample_conditions()
        };
        assert!(conditions.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_levels() {
        let conditions = MarketConditions {
            support_level: Some(22_500.0),
            resistance_level: Some(22_000.0),
            ..sample_conditions()
        };
        let err = conditions.validate().unwrap_err();
        assert!(err.to_string().contains("support_level"));

        let one_sided = MarketConditions {
            support_level: Some(22_500.0),
            ..sample_conditions()
        };
        assert!(one_sided.validate().is_ok());
    }
}
