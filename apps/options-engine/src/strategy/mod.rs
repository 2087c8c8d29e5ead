//! Multi-Leg Options Strategy Model
//!
//! Provides:
//! - Leg and strategy types (`OptionLeg`, `Side`, `Strategy`)
//! - The static template catalogue (`StrategyKind`): Iron Condor, Butterfly,
//!   Straddle, Strangle, Bull Call Spread, Bear Put Spread
//! - Structural validation with accumulated errors

mod error;
mod leg;
mod templates;
mod types;
mod validation;

pub use crate::pricing::OptionType;
pub use error::ValidationError;
pub use leg::{OptionLeg, Side};
pub use templates::{LegSlot, StrategyKind, StrategyTemplate};
pub use types::{RiskProfile, Strategy, StrategyCategory};
pub use validation::validate_strategy;
