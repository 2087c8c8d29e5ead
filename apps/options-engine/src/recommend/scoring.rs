//! Weighted suitability scoring.
//!
//! Scoring is a pure function of a template, the market view and the
//! weights. It returns every factor's contribution; reasoning text is
//! rendered from that breakdown afterwards.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::strategy::StrategyKind;

use super::conditions::MarketConditions;

// ============================================================================
// Weights
// ============================================================================

/// Factor weights and partial-credit fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Market outlook weight.
    #[serde(default = "default_outlook_weight")]
    pub outlook: f64,
    /// Volatility regime weight.
    #[serde(default = "default_volatility_weight")]
    pub volatility: f64,
    /// Risk tolerance weight.
    #[serde(default = "default_risk_tolerance_weight")]
    pub risk_tolerance: f64,
    /// Time horizon weight.
    #[serde(default = "default_time_horizon_weight")]
    pub time_horizon: f64,
    /// Market sentiment weight.
    #[serde(default = "default_sentiment_weight")]
    pub sentiment: f64,
    /// Capital efficiency weight.
    #[serde(default = "default_capital_weight")]
    pub capital_efficiency: f64,
    /// Share of a weight granted when a bucket is neither best nor avoid.
    #[serde(default = "default_neutral_fraction")]
    pub neutral_fraction: f64,
    /// Share of the horizon weight granted when the horizon is not ideal.
    #[serde(default = "default_horizon_miss_fraction")]
    pub horizon_miss_fraction: f64,
    /// Capital at which capital efficiency saturates.
    #[serde(default = "default_capital_normalizer")]
    pub capital_normalizer: Decimal,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            outlook: default_outlook_weight(),
            volatility: default_volatility_weight(),
            risk_tolerance: default_risk_tolerance_weight(),
            time_horizon: default_time_horizon_weight(),
            sentiment: default_sentiment_weight(),
            capital_efficiency: default_capital_weight(),
            neutral_fraction: default_neutral_fraction(),
            horizon_miss_fraction: default_horizon_miss_fraction(),
            capital_normalizer: default_capital_normalizer(),
        }
    }
}

impl ScoringWeights {
    /// Sum of the six factor weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.outlook
            + self.volatility
            + self.risk_tolerance
            + self.time_horizon
            + self.sentiment
            + self.capital_efficiency
    }

    /// Factor weights in scoring order.
    #[must_use]
    pub fn factor_weights(&self) -> [(Factor, f64); 6] {
        [
            (Factor::Outlook, self.outlook),
            (Factor::Volatility, self.volatility),
            (Factor::RiskTolerance, self.risk_tolerance),
            (Factor::TimeHorizon, self.time_horizon),
            (Factor::Sentiment, self.sentiment),
            (Factor::CapitalEfficiency, self.capital_efficiency),
        ]
    }
}

const fn default_outlook_weight() -> f64 {
    0.25
}

const fn default_volatility_weight() -> f64 {
    0.20
}

const fn default_risk_tolerance_weight() -> f64 {
    0.20
}

const fn default_time_horizon_weight() -> f64 {
    0.15
}

const fn default_sentiment_weight() -> f64 {
    0.10
}

const fn default_capital_weight() -> f64 {
    0.10
}

const fn default_neutral_fraction() -> f64 {
    0.5
}

const fn default_horizon_miss_fraction() -> f64 {
    0.3
}

fn default_capital_normalizer() -> Decimal {
    dec!(100000)
}

// ============================================================================
// Breakdown
// ============================================================================

/// A scored dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Factor {
    /// Market outlook.
    Outlook,
    /// Volatility regime.
    Volatility,
    /// Risk tolerance.
    RiskTolerance,
    /// Holding period.
    TimeHorizon,
    /// Market sentiment.
    Sentiment,
    /// Capital available relative to the normalizer.
    CapitalEfficiency,
}

/// How the market view sits against a template on one factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Listed as best for the template: full weight.
    Favorable,
    /// Listed as avoid for the template: negative weight.
    Unfavorable,
    /// Neither: partial weight.
    Neutral,
    /// Scaled continuously (capital efficiency).
    Proportional,
}

/// One factor's share of a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    /// Which factor.
    pub factor: Factor,
    /// Configured weight.
    pub weight: f64,
    /// Signed amount added to the raw score.
    pub contribution: f64,
    /// Classification of the market view on this factor.
    pub verdict: Verdict,
}

/// Full scoring result for one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Template scored.
    pub kind: StrategyKind,
    /// Sum of contributions, unclamped.
    pub raw_score: f64,
    /// `raw_score` clamped to `[0, 1]`.
    pub score: f64,
    /// `min(capital / normalizer, 1)`.
    pub capital_efficiency: f64,
    /// Per-factor contributions in scoring order.
    pub contributions: Vec<FactorContribution>,
}

impl ScoreBreakdown {
    /// Contribution of one factor.
    #[must_use]
    pub fn contribution(&self, factor: Factor) -> Option<&FactorContribution> {
        self.contributions.iter().find(|c| c.factor == factor)
    }

    /// Human-readable reasoning, one line per factor.
    #[must_use]
    pub fn reasoning(&self, conditions: &MarketConditions) -> Vec<String> {
        self.contributions
            .iter()
            .map(|c| reason_line(c, conditions, self.capital_efficiency))
            .collect()
    }
}

fn reason_line(c: &FactorContribution, conditions: &MarketConditions, efficiency: f64) -> String {
    use Verdict::{Favorable, Unfavorable};

    match (c.factor, c.verdict) {
        (Factor::Outlook, Favorable) => format!("Perfect for {} outlook", conditions.outlook),
        (Factor::Outlook, Unfavorable) => format!("Not suitable for {} outlook", conditions.outlook),
        (Factor::Outlook, _) => format!("Neutral for {} outlook", conditions.outlook),
        (Factor::Volatility, Favorable) => {
            format!("Optimal for {} volatility", conditions.volatility)
        }
        (Factor::Volatility, Unfavorable) => {
            format!("Poor choice for {} volatility", conditions.volatility)
        }
        (Factor::Volatility, _) => format!("Acceptable for {} volatility", conditions.volatility),
        (Factor::RiskTolerance, Favorable) => {
            format!("Matches your {} risk profile", conditions.risk_tolerance)
        }
        (Factor::RiskTolerance, Unfavorable) => {
            format!("Too risky for {} profile", conditions.risk_tolerance)
        }
        (Factor::RiskTolerance, _) => {
            format!("Moderate risk for {} profile", conditions.risk_tolerance)
        }
        (Factor::TimeHorizon, Favorable) => {
            format!("Ideal for {}-day horizon", conditions.time_horizon_days)
        }
        (Factor::TimeHorizon, _) => {
            format!("Suboptimal for {}-day horizon", conditions.time_horizon_days)
        }
        (Factor::Sentiment, Favorable) => {
            format!("Perfect for {} sentiment", conditions.market_sentiment)
        }
        (Factor::Sentiment, Unfavorable) => {
            format!("Avoid in {} sentiment", conditions.market_sentiment)
        }
        (Factor::Sentiment, _) => format!("Neutral for {} sentiment", conditions.market_sentiment),
        (Factor::CapitalEfficiency, _) => {
            format!("Capital efficiency: {:.0}%", efficiency * 100.0)
        }
    }
}

// ============================================================================
// Scoring
// ============================================================================

fn classify<T: PartialEq>(value: &T, best: &[T], avoid: &[T]) -> Verdict {
    if best.contains(value) {
        Verdict::Favorable
    } else if avoid.contains(value) {
        Verdict::Unfavorable
    } else {
        Verdict::Neutral
    }
}

/// `min(capital / normalizer, 1)`, saturating when the normalizer is not positive.
#[must_use]
pub fn capital_efficiency(capital: Decimal, normalizer: Decimal) -> f64 {
    if normalizer <= Decimal::ZERO {
        return 1.0;
    }
    let ratio = capital
        .checked_div(normalizer)
        .unwrap_or(Decimal::ONE)
        .clamp(Decimal::ZERO, Decimal::ONE);
    ratio.to_f64().unwrap_or(0.0)
}

/// Score `kind` against `conditions`.
#[must_use]
pub fn score_strategy(
    kind: StrategyKind,
    conditions: &MarketConditions,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let table = kind.suitability();
    let (best, avoid) = (&table.best_for, &table.avoid_for);
    let efficiency = capital_efficiency(conditions.capital_available, weights.capital_normalizer);

    let contributions: Vec<FactorContribution> = weights
        .factor_weights()
        .into_iter()
        .map(|(factor, weight)| {
            let verdict = match factor {
                Factor::Outlook => classify(&conditions.outlook, best.outlook, avoid.outlook),
                Factor::Volatility => {
                    classify(&conditions.volatility, best.volatility, avoid.volatility)
                }
                Factor::RiskTolerance => classify(
                    &conditions.risk_tolerance,
                    best.risk_tolerance,
                    avoid.risk_tolerance,
                ),
                Factor::Sentiment => {
                    classify(&conditions.market_sentiment, best.sentiment, avoid.sentiment)
                }
                Factor::TimeHorizon => {
                    if table.ideal_horizon_days.contains(&conditions.time_horizon_days) {
                        Verdict::Favorable
                    } else {
                        Verdict::Neutral
                    }
                }
                Factor::CapitalEfficiency => Verdict::Proportional,
            };
            let contribution = match (factor, verdict) {
                (_, Verdict::Favorable) => weight,
                (_, Verdict::Unfavorable) => -weight,
                (Factor::TimeHorizon, Verdict::Neutral) => weight * weights.horizon_miss_fraction,
                (_, Verdict::Neutral) => weight * weights.neutral_fraction,
                (_, Verdict::Proportional) => weight * efficiency,
            };
            FactorContribution {
                factor,
                weight,
                contribution,
                verdict,
            }
        })
        .collect();

    let raw_score: f64 = contributions.iter().map(|c| c.contribution).sum();

    ScoreBreakdown {
        kind,
        raw_score,
        score: raw_score.clamp(0.0, 1.0),
        capital_efficiency: efficiency,
        contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::conditions::tests::sample_conditions;
    use crate::recommend::{MarketOutlook, MarketSentiment, RiskTolerance, VolatilityRegime};
    use test_case::test_case;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Conditions hitting every best_for bucket of the iron condor.
    fn condor_sweet_spot(capital: Decimal) -> MarketConditions {
        MarketConditions {
            outlook: MarketOutlook::Neutral,
            volatility: VolatilityRegime::Low,
            time_horizon_days: 45,
            risk_tolerance: RiskTolerance::Moderate,
            capital_available: capital,
            market_sentiment: MarketSentiment::Neutral,
            ..sample_conditions()
        }
    }

    #[test]
    fn test_all_best_without_capital_scores_point_nine() {
        let breakdown = score_strategy(
            StrategyKind::IronCondor,
            &condor_sweet_spot(Decimal::ZERO),
            &ScoringWeights::default(),
        );
        assert!(approx_eq(breakdown.raw_score, 0.90));
        assert!(approx_eq(breakdown.score, 0.90));
    }

    #[test]
    fn test_all_best_with_full_capital_scores_one() {
        let breakdown = score_strategy(
            StrategyKind::IronCondor,
            &condor_sweet_spot(dec!(250000)),
            &ScoringWeights::default(),
        );
        assert!(approx_eq(breakdown.score, 1.0));
        assert!(approx_eq(breakdown.capital_efficiency, 1.0));
    }

    #[test]
    fn test_all_avoid_is_non_positive_before_clamping() {
        let conditions = MarketConditions {
            outlook: MarketOutlook::Bullish,
            volatility: VolatilityRegime::High,
            time_horizon_days: 5,
            risk_tolerance: RiskTolerance::Aggressive,
            capital_available: Decimal::ZERO,
            market_sentiment: MarketSentiment::Fear,
            ..sample_conditions()
        };
        let breakdown =
            score_strategy(StrategyKind::IronCondor, &conditions, &ScoringWeights::default());

        // -0.25 - 0.20 - 0.20 + 0.15 * 0.3 - 0.10
        assert!(approx_eq(breakdown.raw_score, -0.705));
        assert_eq!(breakdown.score, 0.0);
    }

    #[test]
    fn test_contributions_sum_to_raw_score() {
        let conditions = sample_conditions();
        for kind in StrategyKind::ALL {
            let breakdown = score_strategy(kind, &conditions, &ScoringWeights::default());
            let sum: f64 = breakdown.contributions.iter().map(|c| c.contribution).sum();
            assert!(approx_eq(sum, breakdown.raw_score));
            assert_eq!(breakdown.contributions.len(), 6);
        }
    }

    #[test_case(MarketOutlook::Neutral, Verdict::Favorable, 0.25 ; "best outlook")]
    #[test_case(MarketOutlook::Bullish, Verdict::Unfavorable, -0.25 ; "avoided outlook")]
    fn test_outlook_contribution(outlook: MarketOutlook, verdict: Verdict, expected: f64) {
        let conditions = MarketConditions {
            outlook,
            ..sample_conditions()
        };
        let breakdown =
            score_strategy(StrategyKind::Straddle, &conditions, &ScoringWeights::default());
        let outlook = breakdown.contribution(Factor::Outlook).unwrap();
        assert_eq!(outlook.verdict, verdict);
        assert!(approx_eq(outlook.contribution, expected));
    }

    #[test]
    fn test_neutral_bucket_gets_half_weight() {
        // Moderate is neither best nor avoid for a straddle.
        let breakdown = score_strategy(
            StrategyKind::Straddle,
            &sample_conditions(),
            &ScoringWeights::default(),
        );
        let risk = breakdown.contribution(Factor::RiskTolerance).unwrap();
        assert_eq!(risk.verdict, Verdict::Neutral);
        assert!(approx_eq(risk.contribution, 0.10));
    }

    #[test_case(30, Verdict::Favorable, 0.15 ; "ideal horizon")]
    #[test_case(31, Verdict::Neutral, 0.045 ; "near miss horizon")]
    fn test_horizon_requires_exact_match(days: u32, verdict: Verdict, expected: f64) {
        let conditions = MarketConditions {
            time_horizon_days: days,
            ..sample_conditions()
        };
        let breakdown =
            score_strategy(StrategyKind::IronCondor, &conditions, &ScoringWeights::default());
        let horizon = breakdown.contribution(Factor::TimeHorizon).unwrap();
        assert_eq!(horizon.verdict, verdict);
        assert!(approx_eq(horizon.contribution, expected));
    }

    #[test]
    fn test_capital_efficiency() {
        assert!(approx_eq(capital_efficiency(dec!(50000), dec!(100000)), 0.5));
        assert!(approx_eq(capital_efficiency(dec!(500000), dec!(100000)), 1.0));
        assert!(approx_eq(capital_efficiency(dec!(0), dec!(100000)), 0.0));
        assert!(approx_eq(capital_efficiency(dec!(10), dec!(0)), 1.0));
    }

    #[test]
    fn test_reasoning_lines() {
        let conditions = MarketConditions {
            capital_available: dec!(75000),
            ..sample_conditions()
        };
        let breakdown =
            score_strategy(StrategyKind::IronCondor, &conditions, &ScoringWeights::default());
        assert_eq!(
            breakdown.reasoning(&conditions),
            vec![
                "Perfect for neutral outlook",
                "Optimal for medium volatility",
                "Matches your moderate risk profile",
                "Ideal for 30-day horizon",
                "Perfect for neutral sentiment",
                "Capital efficiency: 75%",
            ]
        );
    }

    #[test]
    fn test_negative_reasoning_lines() {
        let conditions = MarketConditions {
            outlook: MarketOutlook::Bearish,
            volatility: VolatilityRegime::Low,
            risk_tolerance: RiskTolerance::Conservative,
            time_horizon_days: 60,
            market_sentiment: MarketSentiment::Neutral,
            ..sample_conditions()
        };
        let lines = score_strategy(StrategyKind::Strangle, &conditions, &ScoringWeights::default())
            .reasoning(&conditions);
        assert_eq!(lines[0], "Not suitable for bearish outlook");
        assert_eq!(lines[1], "Poor choice for low volatility");
        assert_eq!(lines[2], "Too risky for conservative profile");
        assert_eq!(lines[3], "Suboptimal for 60-day horizon");
        assert_eq!(lines[4], "Avoid in neutral sentiment");
    }
}
