//! Plain-text market insights and static strategy playbooks.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::conditions::{MarketConditions, MarketOutlook, RiskTolerance, VolatilityRegime};

/// Horizons shorter than this many days trigger a theta warning.
const SHORT_HORIZON_DAYS: u32 = 30;

/// Capital below this triggers a limited-capital warning.
const LIMITED_CAPITAL: Decimal = dec!(50000);

/// Summary, suggestions and warnings for a market view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInsights {
    /// One-sentence summary.
    pub summary: String,
    /// Suggested approaches.
    pub recommendations: Vec<String>,
    /// Things to watch out for.
    pub warnings: Vec<String>,
}

/// Describe `conditions` in plain text.
#[must_use]
pub fn market_insights(conditions: &MarketConditions) -> MarketInsights {
    let summary = format!(
        "Based on your {} outlook with {} volatility, we recommend {} risk strategies.",
        conditions.outlook, conditions.volatility, conditions.risk_tolerance
    );

    let mut recommendations = Vec::new();
    if conditions.outlook == MarketOutlook::Neutral
        && conditions.volatility == VolatilityRegime::High
    {
        recommendations
            .push("Consider volatility-based strategies like straddles or strangles".to_string());
    }
    if conditions.risk_tolerance == RiskTolerance::Conservative {
        recommendations.push("Focus on defined-risk strategies with limited downside".to_string());
    }

    let mut warnings = Vec::new();
    if conditions.time_horizon_days < SHORT_HORIZON_DAYS {
        warnings.push("Short time horizons increase theta decay risk".to_string());
    }
    if conditions.capital_available < LIMITED_CAPITAL {
        warnings.push("Limited capital may restrict strategy choices".to_string());
    }

    MarketInsights {
        summary,
        recommendations,
        warnings,
    }
}

/// Strategy names commonly used in a volatility regime.
#[must_use]
pub const fn volatility_playbook(volatility: VolatilityRegime) -> &'static [&'static str] {
    match volatility {
        VolatilityRegime::High => &["Straddle", "Strangle", "Iron Condor"],
        VolatilityRegime::Medium => &["Iron Condor", "Butterfly Spread", "Strangle"],
        VolatilityRegime::Low => &["Iron Condor", "Butterfly Spread", "Credit Spreads"],
    }
}

/// Strategy names commonly used for a directional outlook.
#[must_use]
pub const fn outlook_playbook(outlook: MarketOutlook) -> &'static [&'static str] {
    match outlook {
        MarketOutlook::Bullish => &["Bull Call Spread", "Covered Call", "Cash Secured Put"],
        MarketOutlook::Bearish => &["Bear Put Spread", "Protective Put", "Cash Secured Put"],
        MarketOutlook::Neutral => &["Iron Condor", "Butterfly Spread", "Straddle"],
    }
}
