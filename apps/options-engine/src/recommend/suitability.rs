//! Per-template suitability tables.

use crate::strategy::StrategyKind;

use super::conditions::{MarketOutlook, MarketSentiment, RiskTolerance, VolatilityRegime};

use MarketOutlook::{Bearish, Bullish, Neutral as Flat};
use MarketSentiment::{Fear, Greed, Neutral as Calm};
use RiskTolerance::{Aggressive, Conservative, Moderate};
use VolatilityRegime::{High, Low, Medium};

/// Market-condition buckets along each scored dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionBuckets {
    /// Outlooks.
    pub outlook: &'static [MarketOutlook],
    /// Volatility regimes.
    pub volatility: &'static [VolatilityRegime],
    /// Risk tolerances.
    pub risk_tolerance: &'static [RiskTolerance],
    /// Sentiments.
    pub sentiment: &'static [MarketSentiment],
}

/// Where a template fits and where it should be avoided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suitability {
    /// Conditions the template is built for.
    pub best_for: ConditionBuckets,
    /// Conditions that work against the template.
    pub avoid_for: ConditionBuckets,
    /// Holding periods (days) the template is tuned for; only exact matches count.
    pub ideal_horizon_days: &'static [u32],
}

const IRON_CONDOR: Suitability = Suitability {
    best_for: ConditionBuckets {
        outlook: &[Flat],
        volatility: &[Medium, Low],
        risk_tolerance: &[Moderate],
        sentiment: &[Calm],
    },
    avoid_for: ConditionBuckets {
        outlook: &[Bullish, Bearish],
        volatility: &[High],
        risk_tolerance: &[Aggressive],
        sentiment: &[Fear, Greed],
    },
    ideal_horizon_days: &[30, 45, 60],
};

const BULL_CALL_SPREAD: Suitability = Suitability {
    best_for: ConditionBuckets {
        outlook: &[Bullish],
        volatility: &[Medium, Low],
        risk_tolerance: &[Conservative, Moderate],
        sentiment: &[Greed, Calm],
    },
    avoid_for: ConditionBuckets {
        outlook: &[Bearish, Flat],
        volatility: &[High],
        risk_tolerance: &[Aggressive],
        sentiment: &[Fear],
    },
    ideal_horizon_days: &[30, 45],
};

const BEAR_PUT_SPREAD: Suitability = Suitability {
    best_for: ConditionBuckets {
        outlook: &[Bearish],
        volatility: &[Medium, Low],
        risk_tolerance: &[Conservative, Moderate],
        sentiment: &[Fear, Calm],
    },
    avoid_for: ConditionBuckets {
        outlook: &[Bullish, Flat],
        volatility: &[High],
        risk_tolerance: &[Aggressive],
        sentiment: &[Greed],
    },
    ideal_horizon_days: &[30, 45],
};

const STRADDLE: Suitability = Suitability {
    best_for: ConditionBuckets {
        outlook: &[Flat],
        volatility: &[High],
        risk_tolerance: &[Aggressive],
        sentiment: &[Fear, Greed],
    },
    avoid_for: ConditionBuckets {
        outlook: &[Bullish, Bearish],
        volatility: &[Low],
        risk_tolerance: &[Conservative],
        sentiment: &[Calm],
    },
    ideal_horizon_days: &[7, 14, 30],
};

const STRANGLE: Suitability = Suitability {
    best_for: ConditionBuckets {
        outlook: &[Flat],
        volatility: &[High, Medium],
        risk_tolerance: &[Moderate, Aggressive],
        sentiment: &[Fear, Greed],
    },
    avoid_for: ConditionBuckets {
        outlook: &[Bullish, Bearish],
        volatility: &[Low],
        risk_tolerance: &[Conservative],
        sentiment: &[Calm],
    },
    ideal_horizon_days: &[14, 30, 45],
};

const BUTTERFLY_SPREAD: Suitability = Suitability {
    best_for: ConditionBuckets {
        outlook: &[Flat],
        volatility: &[Low, Medium],
        risk_tolerance: &[Conservative, Moderate],
        sentiment: &[Calm],
    },
    avoid_for: ConditionBuckets {
        outlook: &[Bullish, Bearish],
        volatility: &[High],
        risk_tolerance: &[Aggressive],
        sentiment: &[Fear, Greed],
    },
    ideal_horizon_days: &[30, 45, 60],
};

/// Order in which templates are scored. Equal scores keep this order.
pub const RANKING_ORDER: [StrategyKind; 6] = [
    StrategyKind::IronCondor,
    StrategyKind::BullCallSpread,
    StrategyKind::BearPutSpread,
    StrategyKind::Straddle,
    StrategyKind::Strangle,
    StrategyKind::ButterflySpread,
];

impl StrategyKind {
    /// Suitability table for this template.
    #[must_use]
    pub const fn suitability(self) -> &'static Suitability {
        match self {
            Self::IronCondor => &IRON_CONDOR,
            Self::ButterflySpread => &BUTTERFLY_SPREAD,
            Self::Straddle => &STRADDLE,
            Self::Strangle => &STRANGLE,
            Self::BullCallSpread => &BULL_CALL_SPREAD,
            Self::BearPutSpread => &BEAR_PUT_SPREAD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_and_avoid_never_overlap() {
        for kind in StrategyKind::ALL {
            let s = kind.suitability();
            assert!(
                s.best_for.outlook.iter().all(|o| !s.avoid_for.outlook.contains(o)),
                "{kind} outlook overlap"
            );
            assert!(
                s.best_for.volatility.iter().all(|v| !s.avoid_for.volatility.contains(v)),
                "{kind} volatility overlap"
            );
            assert!(
                s.best_for.risk_tolerance.iter().all(|r| !s.avoid_for.risk_tolerance.contains(r)),
                "{kind} risk tolerance overlap"
            );
            assert!(
                s.best_for.sentiment.iter().all(|m| !s.avoid_for.sentiment.contains(m)),
                "{kind} sentiment overlap"
            );
            assert!(!s.ideal_horizon_days.is_empty());
        }
    }

    #[test]
    fn test_ranking_order_covers_every_template_once() {
        for kind in StrategyKind::ALL {
            assert_eq!(RANKING_ORDER.iter().filter(|k| **k == kind).count(), 1, "{kind}");
        }
    }

    #[test]
    fn test_straddle_table() {
        let s = StrategyKind::Straddle.suitability();
        assert_eq!(s.best_for.volatility, &[High]);
        assert_eq!(s.ideal_horizon_days, &[7, 14, 30]);
        assert_eq!(s.avoid_for.sentiment, &[Calm]);
    }
}
