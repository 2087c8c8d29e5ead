//! Implied Volatility Solver
//!
//! Computes implied volatility from observed option prices:
//! - Newton-Raphson: vega-driven iteration from a fixed 30% starting guess
//! - Bisection: bracketed fallback for cases where Newton stalls (deep ITM/OTM)
//! - Hybrid: Newton-Raphson with bisection fallback
//!
//! Newton results are always tagged with whether they converged, so callers
//! can tell an exact solve from a best-effort estimate.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::black_scholes::{OptionType, PricingParameters, price};

// ============================================================================
// Error Types
// ============================================================================

/// Errors from IV computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IvError {
    /// Invalid input parameters.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error message.
        message: String,
    },

    /// No solution exists inside the volatility bracket.
    #[error("No valid IV solution: {reason}")]
    NoSolution {
        /// Reason no solution exists.
        reason: String,
    },
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the IV solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvSolverConfig {
    /// Maximum Newton-Raphson (and bisection) iterations.
    pub max_iterations: u32,
    /// Convergence tolerance (absolute price error).
    pub tolerance: f64,
    /// Starting volatility for Newton-Raphson.
    pub initial_guess: f64,
    /// Replacement volatility when a Newton step lands at or below zero.
    pub volatility_floor: f64,
    /// Lower bisection bound.
    pub min_vol: f64,
    /// Upper bisection bound.
    pub max_vol: f64,
}

impl Default for IvSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-4,
            initial_guess: 0.3,
            volatility_floor: 0.01,
            min_vol: 0.001,
            max_vol: 5.0,
        }
    }
}

/// Whether a Newton-Raphson solve met its tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Convergence {
    /// Price error dropped below tolerance.
    Converged,
    /// Iteration budget ran out (or vega vanished); the volatility is the last estimate.
    Exhausted,
}

/// Outcome of an implied volatility solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityResult {
    /// Solved (or last estimated) volatility.
    pub volatility: f64,
    /// Iterations consumed.
    pub iterations: u32,
    /// Absolute model-vs-observed price error at `volatility`.
    pub price_error: f64,
    /// Convergence tag.
    pub convergence: Convergence,
}

impl VolatilityResult {
    /// True when the solve met its tolerance.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.convergence == Convergence::Converged
    }
}

// ============================================================================
// IV Solver
// ============================================================================

/// Implied Volatility Solver.
#[derive(Debug, Clone, Default)]
pub struct IvSolver {
    config: IvSolverConfig,
}

/// Price inputs shared by every solver iteration.
#[derive(Debug, Clone, Copy)]
struct Quote {
    observed: f64,
    kind: OptionType,
    base: PricingParameters,
}

impl Quote {
    fn model(&self, sigma: f64) -> (f64, f64) {
        match price(&self.base.with_volatility(sigma)) {
            Ok(p) => (p.price_of(self.kind), p.greeks_of(self.kind).vega),
            Err(_) => (f64::NAN, 0.0),
        }
    }
}

impl IvSolver {
    /// Create a new IV solver with the given configuration.
    #[must_use]
    pub const fn new(config: IvSolverConfig) -> Self {
        Self { config }
    }

    /// Solver configuration.
    #[must_use]
    pub const fn config(&self) -> &IvSolverConfig {
        &self.config
    }

    /// Newton-Raphson implied volatility.
    ///
    /// Always returns a result once inputs are valid; check
    /// [`VolatilityResult::is_converged`] to tell an exact solve from the
    /// last estimate after the iteration budget ran out.
    ///
    /// # Arguments
    ///
    /// * `observed_price` - Observed market price of the option
    /// * `kind` - Option type (Call or Put)
    /// * `s` - Current underlying price
    /// * `k` - Strike price
    /// * `t` - Time to expiration (years)
    /// * `r` - Risk-free rate (annualized)
    pub fn solve(
        &self,
        observed_price: f64,
        kind: OptionType,
        s: f64,
        k: f64,
        t: f64,
        r: f64,
    ) -> Result<VolatilityResult, IvError> {
        Self::validate_inputs(observed_price, s, k, t, r)?;
        let quote = Quote {
            observed: observed_price,
            kind,
            base: PricingParameters::new(s, k, t, r, self.config.initial_guess),
        };
        Ok(self.newton_raphson(&quote))
    }

    /// Newton-Raphson with a bisection fallback.
    ///
    /// # Errors
    ///
    /// Returns [`IvError::NoSolution`] when Newton does not converge and the
    /// observed price lies outside the `[min_vol, max_vol]` price bracket.
    pub fn solve_hybrid(
        &self,
        observed_price: f64,
        kind: OptionType,
        s: f64,
        k: f64,
        t: f64,
        r: f64,
    ) -> Result<VolatilityResult, IvError> {
        let newton = self.solve(observed_price, kind, s, k, t, r)?;
        if newton.is_converged() {
            return Ok(newton);
        }

        let quote = Quote {
            observed: observed_price,
            kind,
            base: PricingParameters::new(s, k, t, r, self.config.initial_guess),
        };
        self.bisection(&quote)
    }

    /// Solve IV from Decimal inputs (convenience method).
    pub fn solve_decimal(
        &self,
        observed_price: Decimal,
        kind: OptionType,
        s: Decimal,
        k: Decimal,
        t: Decimal,
        r: Decimal,
    ) -> Result<VolatilityResult, IvError> {
        self.solve(
            observed_price.to_f64().unwrap_or(0.0),
            kind,
            s.to_f64().unwrap_or(0.0),
            k.to_f64().unwrap_or(0.0),
            t.to_f64().unwrap_or(0.0),
            r.to_f64().unwrap_or(f64::NAN),
        )
    }

    /// Validate input parameters.
    fn validate_inputs(observed_price: f64, s: f64, k: f64, t: f64, r: f64) -> Result<(), IvError> {
        let checks = [
            ("Observed price", observed_price),
            ("Underlying price", s),
            ("Strike price", k),
            ("Time to expiration", t),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(IvError::InvalidInput {
                    message: format!("{name} must be positive, got: {value}"),
                });
            }
        }
        if !r.is_finite() {
            return Err(IvError::InvalidInput {
                message: format!("Risk-free rate must be finite, got: {r}"),
            });
        }
        Ok(())
    }

    fn newton_raphson(&self, quote: &Quote) -> VolatilityResult {
        let mut sigma = self.config.initial_guess;

        for i in 0..self.config.max_iterations {
            let (model_price, vega) = quote.model(sigma);
            let diff = quote.observed - model_price;

            if diff.abs() < self.config.tolerance {
                return VolatilityResult {
                    volatility: sigma,
                    iterations: i + 1,
                    price_error: diff.abs(),
                    convergence: Convergence::Converged,
                };
            }

            if !vega.is_finite() || vega.abs() < 1e-12 {
                debug!(iteration = i, sigma, "IV solver stopped on vanishing vega");
                return VolatilityResult {
                    volatility: sigma,
                    iterations: i + 1,
                    price_error: diff.abs(),
                    convergence: Convergence::Exhausted,
                };
            }

            sigma += diff / vega;
            if sigma <= 0.0 {
                sigma = self.config.volatility_floor;
            }
        }

        let (model_price, _) = quote.model(sigma);
        let price_error = (quote.observed - model_price).abs();
        debug!(
            iterations = self.config.max_iterations,
            sigma, price_error, "IV solver exhausted iteration budget"
        );
        VolatilityResult {
            volatility: sigma,
            iterations: self.config.max_iterations,
            price_error,
            convergence: Convergence::Exhausted,
        }
    }

    fn bisection(&self, quote: &Quote) -> Result<VolatilityResult, IvError> {
        let mut low = self.config.min_vol;
        let mut high = self.config.max_vol;

        let (price_low, _) = quote.model(low);
        let (price_high, _) = quote.model(high);

        if quote.observed < price_low {
            return Err(IvError::NoSolution {
                reason: format!(
                    "Observed price ({:.4}) is below minimum theoretical price ({price_low:.4})",
                    quote.observed
                ),
            });
        }
        if quote.observed > price_high {
            return Err(IvError::NoSolution {
                reason: format!(
                    "Observed price ({:.4}) exceeds maximum theoretical price ({price_high:.4})",
                    quote.observed
                ),
            });
        }

        let mut mid = low.midpoint(high);
        for i in 0..self.config.max_iterations {
            mid = low.midpoint(high);
            let (model_price, _) = quote.model(mid);
            let error = model_price - quote.observed;

            if error.abs() < self.config.tolerance || (high - low) < 1e-10 {
                return Ok(VolatilityResult {
                    volatility: mid,
                    iterations: i + 1,
                    price_error: error.abs(),
                    convergence: Convergence::Converged,
                });
            }

            if error > 0.0 {
                high = mid;
            } else {
                low = mid;
            }
        }

        let (model_price, _) = quote.model(mid);
        Ok(VolatilityResult {
            volatility: mid,
            iterations: self.config.max_iterations,
            price_error: (model_price - quote.observed).abs(),
            convergence: Convergence::Exhausted,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn model_price(kind: OptionType, s: f64, k: f64, t: f64, r: f64, sigma: f64) -> f64 {
        price(&PricingParameters::new(s, k, t, r, sigma))
            .unwrap()
            .price_of(kind)
    }

    #[test_case(OptionType::Call, 0.25 ; "atm call")]
    #[test_case(OptionType::Put, 0.30 ; "atm put")]
    #[test_case(OptionType::Call, 0.08 ; "low vol call")]
    #[test_case(OptionType::Put, 0.90 ; "high vol put")]
    fn test_newton_round_trip(kind: OptionType, true_iv: f64) {
        let solver = IvSolver::default();
        let observed = model_price(kind, 100.0, 100.0, 1.0, 0.05, true_iv);

        let result = solver.solve(observed, kind, 100.0, 100.0, 1.0, 0.05).unwrap();

        assert!(result.is_converged());
        assert!(result.iterations <= 100);
        assert!(approx_eq(result.volatility, true_iv, 1e-3));
        assert!(result.price_error < 1e-4);
    }

    #[test]
    fn test_exhausted_budget_is_flagged() {
        let solver = IvSolver::new(IvSolverConfig {
            max_iterations: 1,
            ..IvSolverConfig::default()
        });
        let observed = model_price(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.6);

        let result = solver
            .solve(observed, OptionType::Call, 100.0, 100.0, 1.0, 0.05)
            .unwrap();

        assert_eq!(result.convergence, Convergence::Exhausted);
        assert_eq!(result.iterations, 1);
        assert!(result.volatility > 0.3);
    }

    #[test]
    fn test_invalid_inputs() {
        let solver = IvSolver::default();
        assert!(matches!(
            solver.solve(-1.0, OptionType::Call, 100.0, 100.0, 1.0, 0.05),
            Err(IvError::InvalidInput { .. })
        ));
        assert!(matches!(
            solver.solve(5.0, OptionType::Call, 100.0, 100.0, 0.0, 0.05),
            Err(IvError::InvalidInput { .. })
        ));
        assert!(matches!(
            solver.solve(5.0, OptionType::Put, 100.0, 0.0, 1.0, 0.05),
            Err(IvError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_hybrid_recovers_deep_otm() {
        let solver = IvSolver::default();
        let (s, k, t, r) = (100.0, 160.0, 0.25, 0.05);
        let true_iv = 0.45;
        let observed = model_price(OptionType::Call, s, k, t, r, true_iv);

        let result = solver
            .solve_hybrid(observed, OptionType::Call, s, k, t, r)
            .unwrap();

        assert!(result.is_converged());
        assert!(approx_eq(result.volatility, true_iv, 0.01));
    }

    #[test]
    fn test_hybrid_rejects_price_above_bracket() {
        let solver = IvSolver::default();
        // A call can never be worth more than the underlying.
        let result = solver.solve_hybrid(150.0, OptionType::Call, 100.0, 100.0, 1.0, 0.05);
        assert!(matches!(result, Err(IvError::NoSolution { .. })));
    }

    #[test]
    fn test_solve_decimal() {
        let solver = IvSolver::default();
        let observed = model_price(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.2);
        let observed = Decimal::from_f64_retain(observed).unwrap();

        let result = solver
            .solve_decimal(
                observed,
                OptionType::Call,
                dec!(100),
                dec!(100),
                dec!(1),
                dec!(0.05),
            )
            .unwrap();

        assert!(result.is_converged());
        assert!(approx_eq(result.volatility, 0.2, 1e-3));
    }
}
