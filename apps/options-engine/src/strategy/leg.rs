//! Strategy leg types and operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::OptionType;

/// Position side for a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Long position (bought).
    Buy,
    /// Short position (sold/written).
    Sell,
}

impl Side {
    /// +1 for Buy, -1 for Sell.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
        }
    }
}

/// A single option position within a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionLeg {
    /// Underlying symbol.
    pub symbol: String,
    /// Strike price.
    pub strike: f64,
    /// Expiration instant.
    pub expiry: DateTime<Utc>,
    /// Call or put.
    pub option_type: OptionType,
    /// Buy or sell.
    pub side: Side,
    /// Number of contracts.
    pub quantity: u32,
    /// Observed entry premium, when known.
    pub market_price: Option<f64>,
}

impl OptionLeg {
    /// Create a new leg without an observed premium.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        strike: f64,
        expiry: DateTime<Utc>,
        option_type: OptionType,
        side: Side,
        quantity: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            strike,
            expiry,
            option_type,
            side,
            quantity,
            market_price: None,
        }
    }

    /// Attach an observed premium.
    #[must_use]
    pub const fn with_market_price(mut self, market_price: f64) -> Self {
        self.market_price = Some(market_price);
        self
    }

    /// Quantity signed by side (+ for Buy, - for Sell).
    #[must_use]
    pub fn signed_quantity(&self) -> i64 {
        match self.side {
            Side::Buy => i64::from(self.quantity),
            Side::Sell => -i64::from(self.quantity),
        }
    }

    /// `side sign * quantity` as a float multiplier.
    #[must_use]
    pub fn position_multiplier(&self) -> f64 {
        self.side.sign() * f64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_signed_quantity() {
        let long = OptionLeg::new("NIFTY", 22_000.0, expiry(), OptionType::Call, Side::Buy, 3);
        let short = OptionLeg::new("NIFTY", 22_100.0, expiry(), OptionType::Call, Side::Sell, 2);

        assert_eq!(long.signed_quantity(), 3);
        assert_eq!(short.signed_quantity(), -2);
        assert_eq!(short.position_multiplier(), -2.0);
    }

    #[test]
    fn test_with_market_price() {
        let leg = OptionLeg::new("SPY", 450.0, expiry(), OptionType::Put, Side::Buy, 1)
            .with_market_price(4.25);
        assert_eq!(leg.market_price, Some(4.25));
    }

    #[test]
    fn test_side_display() {
        assert_eq!(format!("{}", Side::Buy), "Buy");
        assert_eq!(format!("{}", Side::Sell), "Sell");
    }
}
