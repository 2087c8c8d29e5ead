//! Static strategy template catalogue.
//!
//! Each [`StrategyKind`] carries its template as associated static data:
//! name, description, category, nominal risk profile and the leg slots
//! (type, side, label, quantity) with no strikes bound yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::OptionType;

use super::leg::{OptionLeg, Side};
use super::types::{RiskProfile, Strategy, StrategyCategory};

/// The fixed set of strategy templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyKind {
    /// Short OTM call spread plus short OTM put spread.
    IronCondor,
    /// Long wings around a doubled short body.
    ButterflySpread,
    /// Long call and long put.
    Straddle,
    /// Long OTM call and long OTM put.
    Strangle,
    /// Long lower call, short higher call.
    BullCallSpread,
    /// Long higher put, short lower put.
    BearPutSpread,
}

/// One unbound leg of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegSlot {
    /// Call or put.
    pub option_type: OptionType,
    /// Buy or sell.
    pub side: Side,
    /// Human-readable role of the leg.
    pub label: &'static str,
    /// Contracts per unit of the strategy.
    pub quantity: u32,
}

/// Static description of a strategy template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyTemplate {
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Category.
    pub category: StrategyCategory,
    /// Nominal risk profile.
    pub risk_profile: RiskProfile,
    /// Leg slots in order.
    pub slots: &'static [LegSlot],
    /// Heuristic reward-to-risk ratio used for display.
    pub risk_reward_ratio: f64,
}

const fn slot(option_type: OptionType, side: Side, label: &'static str, quantity: u32) -> LegSlot {
    LegSlot {
        option_type,
        side,
        label,
        quantity,
    }
}

const IRON_CONDOR: StrategyTemplate = StrategyTemplate {
    name: "Iron Condor",
    description: "Sell OTM call and put spreads for income",
    category: StrategyCategory::Income,
    risk_profile: RiskProfile::Medium,
    slots: &[
        slot(OptionType::Call, Side::Sell, "Sell OTM Call", 1),
        slot(OptionType::Call, Side::Buy, "Buy Higher Strike Call", 1),
        slot(OptionType::Put, Side::Sell, "Sell OTM Put", 1),
        slot(OptionType::Put, Side::Buy, "Buy Lower Strike Put", 1),
    ],
    risk_reward_ratio: 0.3,
};

const BUTTERFLY_SPREAD: StrategyTemplate = StrategyTemplate {
    name: "Butterfly Spread",
    description: "Limited risk, limited reward strategy",
    category: StrategyCategory::Volatility,
    risk_profile: RiskProfile::Low,
    slots: &[
        slot(OptionType::Call, Side::Buy, "Buy Lower Strike Call", 1),
        slot(OptionType::Call, Side::Sell, "Sell Middle Strike Call (x2)", 2),
        slot(OptionType::Call, Side::Buy, "Buy Higher Strike Call", 1),
    ],
    risk_reward_ratio: 0.2,
};

const STRADDLE: StrategyTemplate = StrategyTemplate {
    name: "Straddle",
    description: "Buy both call and put at same strike",
    category: StrategyCategory::Volatility,
    risk_profile: RiskProfile::High,
    slots: &[
        slot(OptionType::Call, Side::Buy, "Buy ATM Call", 1),
        slot(OptionType::Put, Side::Buy, "Buy ATM Put", 1),
    ],
    risk_reward_ratio: 0.8,
};

const STRANGLE: StrategyTemplate = StrategyTemplate {
    name: "Strangle",
    description: "Buy OTM call and put for cheaper volatility play",
    category: StrategyCategory::Volatility,
    risk_profile: RiskProfile::Medium,
    slots: &[
        slot(OptionType::Call, Side::Buy, "Buy OTM Call", 1),
        slot(OptionType::Put, Side::Buy, "Buy OTM Put", 1),
    ],
    risk_reward_ratio: 0.6,
};

const BULL_CALL_SPREAD: StrategyTemplate = StrategyTemplate {
    name: "Bull Call Spread",
    description: "Limited risk bullish strategy",
    category: StrategyCategory::Directional,
    risk_profile: RiskProfile::Low,
    slots: &[
        slot(OptionType::Call, Side::Buy, "Buy Lower Strike Call", 1),
        slot(OptionType::Call, Side::Sell, "Sell Higher Strike Call", 1),
    ],
    risk_reward_ratio: 0.4,
};

const BEAR_PUT_SPREAD: StrategyTemplate = StrategyTemplate {
    name: "Bear Put Spread",
    description: "Limited risk bearish strategy",
    category: StrategyCategory::Directional,
    risk_profile: RiskProfile::Low,
    slots: &[
        slot(OptionType::Put, Side::Buy, "Buy Higher Strike Put", 1),
        slot(OptionType::Put, Side::Sell, "Sell Lower Strike Put", 1),
    ],
    risk_reward_ratio: 0.4,
};

impl StrategyKind {
    /// Every template, in catalogue order.
    pub const ALL: [Self; 6] = [
        Self::IronCondor,
        Self::ButterflySpread,
        Self::Straddle,
        Self::Strangle,
        Self::BullCallSpread,
        Self::BearPutSpread,
    ];

    /// Static template data.
    #[must_use]
    pub const fn template(self) -> &'static StrategyTemplate {
        match self {
            Self::IronCondor => &IRON_CONDOR,
            Self::ButterflySpread => &BUTTERFLY_SPREAD,
            Self::Straddle => &STRADDLE,
            Self::Strangle => &STRANGLE,
            Self::BullCallSpread => &BULL_CALL_SPREAD,
            Self::BearPutSpread => &BEAR_PUT_SPREAD,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.template().name
    }

    /// Bind the template's slots to concrete strikes.
    ///
    /// Slot `i` is struck at `anchor + (i - 1) * spacing`; every leg shares
    /// `symbol` and `expiry` and carries no observed premium.
    #[must_use]
    pub fn instantiate(
        self,
        id: impl Into<String>,
        symbol: &str,
        anchor: f64,
        spacing: f64,
        expiry: DateTime<Utc>,
    ) -> Strategy {
        let legs = self.template().slots.iter().enumerate().map(|(i, slot)| {
            let offset = i as f64 - 1.0;
            OptionLeg::new(
                symbol,
                anchor + offset * spacing,
                expiry,
                slot.option_type,
                slot.side,
                slot.quantity,
            )
        });
        Strategy::from_kind(id, self).with_legs(legs)
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
