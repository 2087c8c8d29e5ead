//! Strategy type definitions.

use serde::{Deserialize, Serialize};

use super::leg::OptionLeg;
use super::templates::StrategyKind;

/// Broad purpose of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyCategory {
    /// Collects premium.
    Income,
    /// Profits from a directional move.
    Directional,
    /// Profits from a change in volatility.
    Volatility,
    /// Protects another position.
    Hedging,
}

/// Coarse risk bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskProfile {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// A multi-leg options strategy.
///
/// Holds inputs only. Risk figures are produced by
/// [`RiskAnalyzer`](crate::risk::RiskAnalyzer) from the current legs; every
/// leg edit returns a new strategy that has to be analysed again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    id: String,
    name: String,
    description: String,
    category: StrategyCategory,
    risk_profile: RiskProfile,
    kind: Option<StrategyKind>,
    legs: Vec<OptionLeg>,
}

impl Strategy {
    /// Create a custom strategy with no legs.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: StrategyCategory,
        risk_profile: RiskProfile,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category,
            risk_profile,
            kind: None,
            legs: Vec::new(),
        }
    }

    /// Create an empty strategy carrying a template's metadata.
    #[must_use]
    pub fn from_kind(id: impl Into<String>, kind: StrategyKind) -> Self {
        let template = kind.template();
        Self {
            kind: Some(kind),
            ..Self::new(
                id,
                template.name,
                template.description,
                template.category,
                template.risk_profile,
            )
        }
    }

    /// Append a leg.
    #[must_use]
    pub fn with_leg(mut self, leg: OptionLeg) -> Self {
        self.legs.push(leg);
        self
    }

    /// Append several legs.
    #[must_use]
    pub fn with_legs(mut self, legs: impl IntoIterator<Item = OptionLeg>) -> Self {
        self.legs.extend(legs);
        self
    }

    /// Copy with the leg at `index` replaced. `None` if out of range.
    #[must_use]
    pub fn replace_leg(&self, index: usize, leg: OptionLeg) -> Option<Self> {
        if index >= self.legs.len() {
            return None;
        }
        let mut next = self.clone();
        next.legs[index] = leg;
        Some(next)
    }

    /// Copy with the leg at `index` removed. `None` if out of range.
    #[must_use]
    pub fn without_leg(&self, index: usize) -> Option<Self> {
        if index >= self.legs.len() {
            return None;
        }
        let mut next = self.clone();
        next.legs.remove(index);
        Some(next)
    }

    /// Strategy identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Category.
    #[must_use]
    pub const fn category(&self) -> StrategyCategory {
        self.category
    }

    /// Nominal risk profile.
    #[must_use]
    pub const fn risk_profile(&self) -> RiskProfile {
        self.risk_profile
    }

    /// Template this strategy was built from, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<StrategyKind> {
        self.kind
    }

    /// Legs in order.
    #[must_use]
    pub fn legs(&self) -> &[OptionLeg] {
        &self.legs
    }

    /// Lowest and highest strike across all legs.
    #[must_use]
    pub fn strike_range(&self) -> Option<(f64, f64)> {
        self.legs.iter().map(|leg| leg.strike).fold(None, |acc, strike| {
            Some(match acc {
                None => (strike, strike),
                Some((lo, hi)) => (lo.min(strike), hi.max(strike)),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::OptionType;
    use crate::strategy::Side;
    use chrono::{TimeZone, Utc};

    fn leg(strike: f64, option_type: OptionType, side: Side) -> OptionLeg {
        let expiry = Utc.with_ymd_and_hms(2026, 6, 19, 20, 0, 0).unwrap();
        OptionLeg::new("SPY", strike, expiry, option_type, side, 1)
    }

    #[test]
    fn test_from_kind_copies_template_metadata() {
        let strategy = Strategy::from_kind("s-1", StrategyKind::IronCondor);
        assert_eq!(strategy.name(), "Iron Condor");
        assert_eq!(strategy.category(), StrategyCategory::Income);
        assert_eq!(strategy.risk_profile(), RiskProfile::Medium);
        assert_eq!(strategy.kind(), Some(StrategyKind::IronCondor));
        assert!(strategy.legs().is_empty());
    }

    #[test]
    fn test_leg_edits_return_new_strategies() {
        let base = Strategy::new(
            "custom",
            "Custom",
            "Hand built",
            StrategyCategory::Hedging,
            RiskProfile::Low,
        )
        .with_legs([
            leg(440.0, OptionType::Put, Side::Buy),
            leg(460.0, OptionType::Call, Side::Sell),
        ]);

        let replaced = base
            .replace_leg(1, leg(470.0, OptionType::Call, Side::Sell))
            .unwrap();
        assert_eq!(base.legs()[1].strike, 460.0);
        assert_eq!(replaced.legs()[1].strike, 470.0);

        let trimmed = replaced.without_leg(0).unwrap();
        assert_eq!(trimmed.legs().len(), 1);
        assert_eq!(replaced.legs().len(), 2);

        assert!(base.replace_leg(5, leg(1.0, OptionType::Put, Side::Buy)).is_none());
        assert!(base.without_leg(2).is_none());
    }

    #[test]
    fn test_strike_range() {
        let empty = Strategy::from_kind("x", StrategyKind::Straddle);
        assert_eq!(empty.strike_range(), None);

        let spread = empty.with_legs([
            leg(105.0, OptionType::Call, Side::Buy),
            leg(95.0, OptionType::Put, Side::Buy),
            leg(100.0, OptionType::Put, Side::Sell),
        ]);
        assert_eq!(spread.strike_range(), Some((95.0, 105.0)));
    }
}
