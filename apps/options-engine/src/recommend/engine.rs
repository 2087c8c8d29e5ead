//! Strategy recommendation engine.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::risk::{AnalyzedStrategy, RiskAnalyzer, RiskConfig};
use crate::strategy::RiskProfile;

use super::conditions::MarketConditions;
use super::error::RecommendationError;
use super::scoring::{ScoreBreakdown, ScoringWeights, score_strategy};
use super::suitability::RANKING_ORDER;

/// Scores above this are low risk.
const LOW_RISK_SCORE: f64 = 0.7;
/// Scores above this (and not low risk) are medium risk.
const MEDIUM_RISK_SCORE: f64 = 0.4;

/// Recommendation engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Scoring weights.
    #[serde(default)]
    pub weights: ScoringWeights,
    /// Maximum number of recommendations returned.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Distance between adjacent leg strikes of a synthesised strategy.
    #[serde(default = "default_strike_spacing")]
    pub strike_spacing: f64,
    /// Share of available capital reported as margin required.
    #[serde(default = "default_margin_fraction")]
    pub margin_fraction: Decimal,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            max_results: default_max_results(),
            strike_spacing: default_strike_spacing(),
            margin_fraction: default_margin_fraction(),
        }
    }
}

const fn default_max_results() -> usize {
    5
}

const fn default_strike_spacing() -> f64 {
    100.0
}

fn default_margin_fraction() -> Decimal {
    dec!(0.10)
}

/// A ranked, analysed strategy instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRecommendation {
    /// The synthesised strategy and its risk metrics.
    pub strategy: AnalyzedStrategy,
    /// Clamped suitability score in `[0, 1]`.
    pub score: f64,
    /// One line per scored factor.
    pub reasoning: Vec<String>,
    /// Risk bucket derived from the score.
    pub risk_level: RiskProfile,
    /// Largest sampled profit.
    pub expected_return: f64,
    /// Largest sampled loss.
    pub max_loss: f64,
    /// Grid-density probability of profit.
    pub probability_of_profit: f64,
    /// Unclamped score.
    pub match_score: f64,
    /// Static reward-to-risk ratio of the template.
    pub risk_reward_ratio: f64,
    /// Capital set aside as margin.
    pub margin_required: Decimal,
    /// Per-factor score breakdown.
    pub breakdown: ScoreBreakdown,
}

/// Risk bucket for a suitability score.
#[must_use]
pub fn risk_level_for(score: f64) -> RiskProfile {
    if score > LOW_RISK_SCORE {
        RiskProfile::Low
    } else if score > MEDIUM_RISK_SCORE {
        RiskProfile::Medium
    } else {
        RiskProfile::High
    }
}

/// Matches strategy templates to a market view.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    config: RecommendationConfig,
    analyzer: RiskAnalyzer,
}

impl RecommendationEngine {
    /// Engine expiring synthesised legs relative to `as_of`.
    #[must_use]
    pub const fn new(
        config: RecommendationConfig,
        risk_config: RiskConfig,
        as_of: DateTime<Utc>,
    ) -> Self {
        Self {
            config,
            analyzer: RiskAnalyzer::new(risk_config, as_of),
        }
    }

    /// Engine with default settings.
    #[must_use]
    pub fn with_defaults(as_of: DateTime<Utc>) -> Self {
        Self::new(RecommendationConfig::default(), RiskConfig::default(), as_of)
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Score every template, best first. Equal scores keep [`RANKING_ORDER`].
    #[must_use]
    pub fn rank(&self, conditions: &MarketConditions) -> Vec<ScoreBreakdown> {
        let mut ranked: Vec<ScoreBreakdown> = RANKING_ORDER
            .into_iter()
            .map(|kind| score_strategy(kind, conditions, &self.config.weights))
            .inspect(|b| {
                debug!(
                    kind = %b.kind,
                    score = b.score,
                    raw_score = b.raw_score,
                    "Strategy scored"
                );
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Build up to `max_results` analysed recommendations for `conditions`.
    ///
    /// Each template is struck around the current price and expires
    /// `time_horizon_days` after the valuation instant.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationError::InvalidConditions`] for out-of-range
    /// conditions, [`RecommendationError::NonPositiveStrike`] when a selected
    /// template cannot be struck at the current price and strike spacing, and
    /// [`RecommendationError::Risk`] when a candidate cannot be analysed.
    pub fn recommend(
        &self,
        conditions: &MarketConditions,
    ) -> Result<Vec<StrategyRecommendation>, RecommendationError> {
        conditions.validate()?;

        let expiry =
            self.analyzer.as_of() + Duration::days(i64::from(conditions.time_horizon_days));
        let margin_required = conditions.capital_available * self.config.margin_fraction;

        let mut recommendations = Vec::with_capacity(self.config.max_results);
        for breakdown in self.rank(conditions) {
            if recommendations.len() >= self.config.max_results {
                break;
            }

            let strategy = breakdown.kind.instantiate(
                format!("rec-{}", recommendations.len()),
                &conditions.underlying,
                conditions.current_price,
                self.config.strike_spacing,
                expiry,
            );
            if let Some(strike) = strategy
                .legs()
                .iter()
                .map(|leg| leg.strike)
                .find(|strike| *strike <= 0.0)
            {
                debug!(
                    kind = %breakdown.kind,
                    strike,
                    current_price = conditions.current_price,
                    strike_spacing = self.config.strike_spacing,
                    "Candidate cannot be struck"
                );
                return Err(RecommendationError::NonPositiveStrike {
                    kind: breakdown.kind,
                    strike,
                    current_price: conditions.current_price,
                    strike_spacing: self.config.strike_spacing,
                });
            }

            let analyzed = self.analyzer.evaluate(strategy)?;
            recommendations.push(StrategyRecommendation {
                score: breakdown.score,
                reasoning: breakdown.reasoning(conditions),
                risk_level: risk_level_for(breakdown.score),
                expected_return: analyzed.max_profit(),
                max_loss: analyzed.max_loss(),
                probability_of_profit: analyzed.probability_of_profit(),
                match_score: breakdown.raw_score,
                risk_reward_ratio: breakdown.kind.template().risk_reward_ratio,
                margin_required,
                strategy: analyzed,
                breakdown,
            });
        }

        Ok(recommendations)
    }
}
