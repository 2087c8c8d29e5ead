//! Options pricing.
//!
//! This module provides:
//! - Black-Scholes prices and Greeks with up-front input validation
//! - Implied volatility computation (Newton-Raphson, bisection, hybrid)
//! - Option chain generation over a strike ladder
//!
//! # Example
//!
//! ```
//! use options_engine::pricing::{IvSolver, OptionType, PricingParameters, price};
//!
//! let quote = price(&PricingParameters::new(100.0, 100.0, 1.0, 0.05, 0.20))?;
//! assert!((quote.call_price - 10.45).abs() < 0.01);
//!
//! let iv = IvSolver::default().solve(quote.call_price, OptionType::Call, 100.0, 100.0, 1.0, 0.05)?;
//! assert!(iv.is_converged());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod black_scholes;
mod chain;
mod iv;

pub use black_scholes::{
    Greeks, OptionPrice, OptionType, PricingError, PricingParameters, intrinsic_value, price,
};
pub use chain::{ChainEntry, OptionChainGenerator, strike_ladder, time_to_expiry};
pub use iv::{Convergence, IvError, IvSolver, IvSolverConfig, VolatilityResult};
