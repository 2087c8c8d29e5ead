//! Configuration module for the options engine.
//!
//! YAML configuration with `${VAR}` / `${VAR:-default}` environment
//! interpolation. Every section is optional and falls back to defaults.
//!
//! # Usage
//!
//! ```rust,ignore
//! use options_engine::config::load_config;
//!
//! // Load from default path (options-engine.yaml)
//! let config = load_config(None)?;
//!
//! let solver = config.iv_solver();
//! let engine = config.recommendation_engine(chrono::Utc::now());
//! ```

mod observability;
mod pricing;

use std::borrow::Cow;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::{IvSolver, IvSolverConfig, OptionChainGenerator};
use crate::recommend::{RecommendationConfig, RecommendationEngine};
use crate::risk::{RiskAnalyzer, RiskConfig};

pub use observability::{LogFormat, LoggingConfig};
pub use pricing::PricingConfig;
pub(crate) use pricing::{default_risk_free_rate, default_volatility};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "options-engine.yaml";

/// Allowed drift of the factor weight sum from 1.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Option chain pricing.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Implied volatility solver.
    #[serde(default)]
    pub iv: IvSolverConfig,
    /// Risk sampling.
    #[serde(default)]
    pub risk: RiskConfig,
    /// Recommendation scoring and synthesis.
    #[serde(default)]
    pub recommendation: RecommendationConfig,
    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// IV solver using the `iv` section.
    #[must_use]
    pub fn iv_solver(&self) -> IvSolver {
        IvSolver::new(self.iv.clone())
    }

    /// Chain generator using the `pricing` section.
    #[must_use]
    pub const fn chain_generator(&self) -> OptionChainGenerator {
        OptionChainGenerator::new(self.pricing.default_volatility, self.pricing.risk_free_rate)
    }

    /// Risk analyzer using the `risk` section, valuing legs as of `as_of`.
    #[must_use]
    pub fn risk_analyzer(&self, as_of: DateTime<Utc>) -> RiskAnalyzer {
        RiskAnalyzer::new(self.risk.clone(), as_of)
    }

    /// Recommendation engine using the `recommendation` and `risk` sections.
    #[must_use]
    pub fn recommendation_engine(&self, as_of: DateTime<Utc>) -> RecommendationEngine {
        RecommendationEngine::new(self.recommendation.clone(), self.risk.clone(), as_of)
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// `path` defaults to [`DEFAULT_CONFIG_PATH`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_string(),
        source,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<EngineConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: EngineConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

fn env_var_regex() -> Option<&'static Regex> {
    static ENV_VAR_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    ENV_VAR_REGEX
        .get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").ok())
        .as_ref()
}

/// Substitute `${VAR}` and `${VAR:-default}`.
///
/// Unset or empty variables take the default, or the empty string when no
/// default is given.
fn interpolate_env_vars(input: &str) -> Cow<'_, str> {
    let Some(re) = env_var_regex() else {
        return Cow::Borrowed(input);
    };
    re.replace_all(input, |caps: &Captures<'_>| {
        let default_value = caps.get(2).map_or("", |m| m.as_str());
        match caps.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(value)) if !value.is_empty() => value,
            _ => default_value.to_string(),
        }
    })
}

fn require(condition: bool, message: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(message.to_string()))
    }
}

/// Validate configuration values.
fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    let pricing = &config.pricing;
    require(
        (-1.0..=1.0).contains(&pricing.risk_free_rate),
        "pricing.risk_free_rate must be between -1.0 and 1.0",
    )?;
    require(
        pricing.default_volatility > 0.0,
        "pricing.default_volatility must be positive",
    )?;

    let iv = &config.iv;
    require(iv.max_iterations >= 1, "iv.max_iterations must be at least 1")?;
    require(iv.tolerance > 0.0, "iv.tolerance must be positive")?;
    require(iv.initial_guess > 0.0, "iv.initial_guess must be positive")?;
    require(iv.volatility_floor > 0.0, "iv.volatility_floor must be positive")?;
    require(
        iv.min_vol > 0.0 && iv.min_vol < iv.max_vol,
        "iv.min_vol must be positive and below iv.max_vol",
    )?;

    let risk = &config.risk;
    require(risk.grid_steps >= 2, "risk.grid_steps must be at least 2")?;
    require(risk.volatility > 0.0, "risk.volatility must be positive")?;
    require(
        (-1.0..=1.0).contains(&risk.risk_free_rate),
        "risk.risk_free_rate must be between -1.0 and 1.0",
    )?;
    require(
        risk.flat_range_fraction > 0.0,
        "risk.flat_range_fraction must be positive",
    )?;
    require(risk.min_spot > 0.0, "risk.min_spot must be positive")?;

    let rec = &config.recommendation;
    let weights = &rec.weights;
    require(
        weights.factor_weights().iter().all(|(_, w)| *w >= 0.0),
        "recommendation.weights must be non-negative",
    )?;
    require(
        (weights.total() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE,
        "recommendation.weights must sum to 1.0",
    )?;
    require(
        (0.0..=1.0).contains(&weights.neutral_fraction)
            && (0.0..=1.0).contains(&weights.horizon_miss_fraction),
        "recommendation.weights partial fractions must be between 0.0 and 1.0",
    )?;
    require(
        weights.capital_normalizer > Decimal::ZERO,
        "recommendation.weights.capital_normalizer must be positive",
    )?;
    require(rec.max_results >= 1, "recommendation.max_results must be at least 1")?;
    require(
        rec.strike_spacing > 0.0,
        "recommendation.strike_spacing must be positive",
    )?;
    require(
        rec.margin_fraction >= Decimal::ZERO,
        "recommendation.margin_fraction must not be negative",
    )?;

    Ok(())
}
