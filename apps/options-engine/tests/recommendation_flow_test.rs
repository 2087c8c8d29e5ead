//! End-to-end tests for the analytics flow.
//!
//! These tests drive the engine the way a host would: load configuration,
//! build strategies, analyse them and ask for recommendations.

use chrono::{DateTime, Duration, TimeZone, Utc};
use options_engine::pricing::strike_ladder;
use options_engine::recommend::{
    MarketConditions, MarketOutlook, MarketSentiment, RecommendationEngine, RiskTolerance,
    VolatilityRegime, market_insights,
};
use options_engine::risk::{BreakevenMethod, RiskAnalyzer};
use options_engine::strategy::{OptionLeg, OptionType, RiskProfile, Side, Strategy, StrategyKind};
use options_engine::{ErrorCode, load_config_from_string};
use rust_decimal_macros::dec;

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 14, 30, 0).unwrap()
}

fn bullish_conditions() -> MarketConditions {
    MarketConditions {
        outlook: MarketOutlook::Bullish,
        volatility: VolatilityRegime::Low,
        time_horizon_days: 45,
        risk_tolerance: RiskTolerance::Conservative,
        capital_available: dec!(250000),
        underlying: "SPY".to_string(),
        current_price: 500.0,
        support_level: Some(480.0),
        resistance_level: Some(540.0),
        market_sentiment: MarketSentiment::Greed,
    }
}

/// Bull call spread valued at its own expiry, so every leg pays intrinsic.
fn expired_bull_call() -> Strategy {
    let expiry = as_of();
    Strategy::from_kind("bcs", StrategyKind::BullCallSpread).with_legs([
        OptionLeg::new("SPY", 100.0, expiry, OptionType::Call, Side::Buy, 1).with_market_price(5.0),
        OptionLeg::new("SPY", 110.0, expiry, OptionType::Call, Side::Sell, 1)
            .with_market_price(2.0),
    ])
}

#[test]
fn test_bullish_view_recommends_bull_call_spread() {
    let engine = RecommendationEngine::with_defaults(as_of());
    let recs = engine.recommend(&bullish_conditions()).unwrap();

    let top = &recs[0];
    assert_eq!(top.breakdown.kind, StrategyKind::BullCallSpread);
    assert!((top.score - 1.0).abs() < 1e-9);
    assert_eq!(top.risk_level, RiskProfile::Low);
    assert_eq!(top.margin_required, dec!(25000.00));

    let strategy = top.strategy.strategy();
    assert_eq!(strategy.name(), "Bull Call Spread");
    assert!(strategy.legs().iter().all(|leg| leg.symbol == "SPY"));
    assert!(
        strategy
            .legs()
            .iter()
            .all(|leg| leg.expiry == as_of() + Duration::days(45))
    );
}

#[test]
fn test_recommendations_are_sorted_and_bounded() {
    let engine = RecommendationEngine::with_defaults(as_of());
    let recs = engine.recommend(&bullish_conditions()).unwrap();

    assert_eq!(recs.len(), 5);
    assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(recs.iter().all(|r| (0.0..=1.0).contains(&r.score)));
    assert!(recs.iter().all(|r| r.max_loss >= 0.0));
}

#[test]
fn test_underlying_too_cheap_for_spacing_is_an_error() {
    let engine = RecommendationEngine::with_defaults(as_of());
    let conditions = MarketConditions {
        current_price: 60.0,
        support_level: None,
        resistance_level: None,
        ..bullish_conditions()
    };

    // Every template has a slot one spacing below the anchor.
    let err = options_engine::AnalyticsError::from(engine.recommend(&conditions).unwrap_err());
    assert_eq!(err.code(), ErrorCode::NonPositiveStrike);
    assert!(err.to_string().contains("Bull Call Spread"));
}

#[test]
fn test_invalid_conditions_are_rejected() {
    let engine = RecommendationEngine::with_defaults(as_of());
    let conditions = MarketConditions {
        support_level: Some(550.0),
        resistance_level: Some(520.0),
        ..bullish_conditions()
    };

    let err = options_engine::AnalyticsError::from(engine.recommend(&conditions).unwrap_err());
    assert_eq!(err.code(), ErrorCode::InvalidMarketConditions);
}

#[test]
fn test_expired_bull_call_risk_profile() {
    let analyzer = RiskAnalyzer::with_defaults(as_of());
    let analyzed = analyzer.evaluate_validated(expired_bull_call()).unwrap();

    assert!((analyzed.max_profit() - 7.0).abs() < 1e-9);
    assert!((analyzed.max_loss() - 3.0).abs() < 1e-9);
    assert_eq!(analyzed.break_even_points().len(), 1);
    // Grid step is 0.3 over [90, 120].
    assert!((analyzed.break_even_points()[0] - 103.0).abs() <= 0.3 + 1e-9);
    assert!((0.5..0.6).contains(&analyzed.probability_of_profit()));
}

#[test]
fn test_bisection_breakevens_from_config() {
    let config = load_config_from_string(
        r"
risk:
  breakeven_method: bisection
",
    )
    .unwrap();
    assert_eq!(config.risk.breakeven_method, BreakevenMethod::Bisection);

    let analyzed = config
        .risk_analyzer(as_of())
        .evaluate(expired_bull_call())
        .unwrap();
    assert!((analyzed.break_even_points()[0] - 103.0).abs() < 1e-6);
}

#[test]
fn test_same_strike_straddle_fails_validation_but_still_analyses() {
    let expiry = as_of() + Duration::days(30);
    let straddle = StrategyKind::Straddle.instantiate("atm", "SPY", 500.0, 0.0, expiry);
    let analyzer = RiskAnalyzer::with_defaults(as_of());

    let err = analyzer.evaluate_validated(straddle.clone()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidStrategy);
    assert!(err.to_string().contains("500 is repeated"));

    // No premium recorded, so the live long legs are worth more than they cost everywhere.
    let analyzed = analyzer.evaluate(straddle).unwrap();
    assert!(analyzed.break_even_points().is_empty());
    assert_eq!(analyzed.max_loss(), 0.0);
    assert!((analyzed.probability_of_profit() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_leg_edit_requires_reanalysis() {
    let analyzer = RiskAnalyzer::with_defaults(as_of());
    let analyzed = analyzer.evaluate(expired_bull_call()).unwrap();

    let wider = analyzed
        .strategy()
        .replace_leg(
            1,
            OptionLeg::new("SPY", 120.0, as_of(), OptionType::Call, Side::Sell, 1)
                .with_market_price(1.0),
        )
        .unwrap();
    let reanalyzed = analyzer.evaluate(wider).unwrap();

    // 120 - 100 - 5 + 1
    assert!((reanalyzed.max_profit() - 16.0).abs() < 1e-9);
    assert!((analyzed.max_profit() - 7.0).abs() < 1e-9);
}

#[test]
fn test_recommendations_serialize_to_json() {
    let engine = RecommendationEngine::with_defaults(as_of());
    let recs = engine.recommend(&bullish_conditions()).unwrap();
    let json = serde_json::to_value(&recs[0]).unwrap();

    assert_eq!(json["risk_level"], "LOW");
    assert_eq!(json["breakdown"]["kind"], "BULL_CALL_SPREAD");
    assert_eq!(json["strategy"]["strategy"]["name"], "Bull Call Spread");
    assert!(json["strategy"]["metrics"]["break_even_points"].is_array());
    assert_eq!(json["reasoning"].as_array().map(Vec::len), Some(6));
}

#[test]
fn test_chain_from_config_satisfies_parity() {
    let config = load_config_from_string(
        r"
pricing:
  risk_free_rate: 0.04
  default_volatility: 0.25
",
    )
    .unwrap();
    let generator = config.chain_generator();
    let expiry = as_of() + Duration::days(73);
    let strikes = strike_ladder(500.0, 10.0, 5);

    let chain = generator.generate_at(as_of(), 500.0, expiry, &strikes).unwrap();
    assert_eq!(chain.len(), 11);
    for entry in &chain {
        let forward_gap = 500.0 - entry.strike * (-0.04 * entry.time_to_expiry).exp();
        assert!((entry.call_price - entry.put_price - forward_gap).abs() < 1e-9);
        assert!((entry.volatility - 0.25).abs() < f64::EPSILON);
    }
}

#[test]
fn test_insights_follow_conditions() {
    let insights = market_insights(&MarketConditions {
        volatility: VolatilityRegime::High,
        capital_available: dec!(20000),
        ..bullish_conditions()
    });

    assert!(!insights.summary.is_empty());
    assert!(!insights.recommendations.is_empty());
    assert!(!insights.warnings.is_empty());
}
