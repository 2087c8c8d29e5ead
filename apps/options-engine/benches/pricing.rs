use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use options_engine::pricing::{
    IvSolver, OptionChainGenerator, OptionType, PricingParameters, price, strike_ladder,
};
use options_engine::recommend::{
    MarketConditions, MarketOutlook, MarketSentiment, RecommendationEngine, RiskTolerance,
    VolatilityRegime,
};
use options_engine::risk::RiskAnalyzer;
use options_engine::strategy::StrategyKind;
use rust_decimal_macros::dec;
use std::hint::black_box;

// Rough targets on a laptop:
// - closed-form price with Greeks: < 200 ns
// - IV solve near the money: < 2 us
// - full recommendation pass: < 1 ms

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 15, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn bench_black_scholes(c: &mut Criterion) {
    let params = PricingParameters::new(100.0, 105.0, 0.5, 0.05, 0.25);

    c.bench_function("black_scholes_price_and_greeks", |b| {
        b.iter(|| black_box(price(black_box(&params))))
    });
}

fn bench_implied_volatility(c: &mut Criterion) {
    let solver = IvSolver::default();
    let mut group = c.benchmark_group("implied_volatility");

    for strike in [80.0, 100.0, 120.0] {
        let params = PricingParameters::new(100.0, strike, 0.5, 0.05, 0.35);
        let Ok(quote) = price(&params) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(strike), &quote.call_price, |b, &p| {
            b.iter(|| {
                black_box(solver.solve_hybrid(
                    black_box(p),
                    OptionType::Call,
                    100.0,
                    strike,
                    0.5,
                    0.05,
                ))
            })
        });
    }
    group.finish();
}

fn bench_option_chain(c: &mut Criterion) {
    let generator = OptionChainGenerator::new(0.2, 0.05);
    let now = as_of();
    let expiry = now + Duration::days(30);
    let mut group = c.benchmark_group("option_chain");

    for steps in [10_u32, 50, 200] {
        let strikes = strike_ladder(22_000.0, 50.0, steps);
        group.bench_with_input(BenchmarkId::from_parameter(strikes.len()), &strikes, |b, s| {
            b.iter(|| black_box(generator.generate_at(now, 22_000.0, expiry, black_box(s))))
        });
    }
    group.finish();
}

fn bench_risk_analysis(c: &mut Criterion) {
    let now = as_of();
    let analyzer = RiskAnalyzer::with_defaults(now);
    let condor =
        StrategyKind::IronCondor.instantiate("ic", "NIFTY", 22_000.0, 100.0, now + Duration::days(30));

    c.bench_function("risk_analyze_iron_condor", |b| {
        b.iter(|| black_box(analyzer.analyze(black_box(&condor))))
    });
}

fn bench_recommendations(c: &mut Criterion) {
    let engine = RecommendationEngine::with_defaults(as_of());
    let conditions = MarketConditions {
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
    };

    c.bench_function("recommend_top_five", |b| {
        b.iter(|| black_box(engine.recommend(black_box(&conditions))))
    });
}

criterion_group!(
    benches,
    bench_black_scholes,
    bench_implied_volatility,
    bench_option_chain,
    bench_risk_analysis,
    bench_recommendations
);
criterion_main!(benches);
