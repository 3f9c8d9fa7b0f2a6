//! Engine configuration
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```
//! use shiftplan_core::{EngineConfig, SolverStrategy};
//! use std::time::Duration;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     strategy = "heuristic"
//!     time_limit_ms = 2500
//!     merge_contiguous_shifts = true
//! "#).unwrap();
//!
//! assert_eq!(config.strategy, SolverStrategy::Heuristic);
//! assert_eq!(config.time_limit(), Some(Duration::from_millis(2500)));
//! assert_eq!(config.default_required_staff, 1);
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported number of decimal places for cost coefficients
pub const MAX_COST_PRECISION: u32 = 6;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which search procedure solves the model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStrategy {
    /// Min-cost flow; proves optimality or infeasibility
    #[default]
    Exact,
    /// Greedy construction plus improvement; best effort
    Heuristic,
    /// Constraint programming backend (requires the `cp-solver` feature)
    Cp,
    /// Run the available strategies in parallel and keep the strongest result
    Portfolio,
}

impl SolverStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolverStrategy::Exact => "exact",
            SolverStrategy::Heuristic => "heuristic",
            SolverStrategy::Cp => "cp",
            SolverStrategy::Portfolio => "portfolio",
        }
    }
}

impl std::fmt::Display for SolverStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SolverStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" | "flow" => Ok(SolverStrategy::Exact),
            "heuristic" | "greedy" => Ok(SolverStrategy::Heuristic),
            "cp" => Ok(SolverStrategy::Cp),
            "portfolio" => Ok(SolverStrategy::Portfolio),
            other => Err(format!(
                "unknown strategy '{}' (expected exact, heuristic, cp or portfolio)",
                other
            )),
        }
    }
}

/// Settings for one engine instance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Search procedure
    pub strategy: SolverStrategy,
    /// Headcount used for forecast entries without `requiredStaff`
    pub default_required_staff: u32,
    /// Decimal places kept from hourly rates in objective coefficients.
    /// 0 truncates rates to whole currency units.
    pub cost_precision: u32,
    /// Wall-clock budget for the search, unlimited when absent
    pub time_limit_ms: Option<u64>,
    /// Merge consecutive hours of one employee into a single shift
    pub merge_contiguous_shifts: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: SolverStrategy::Exact,
            default_required_staff: 1,
            cost_precision: 2,
            time_limit_ms: None,
            merge_contiguous_shifts: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cost_precision > MAX_COST_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "cost_precision {} exceeds maximum of {}",
                self.cost_precision, MAX_COST_PRECISION
            )));
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "time_limit_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Search time budget, if any
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Factor that turns an hourly rate into integer objective units
    pub fn cost_scale(&self) -> i64 {
        10_i64.pow(self.cost_precision.min(MAX_COST_PRECISION))
    }

    pub fn with_strategy(mut self, strategy: SolverStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_cost_precision(mut self, places: u32) -> Self {
        self.cost_precision = places;
        self
    }

    pub fn with_default_required_staff(mut self, staff: u32) -> Self {
        self.default_required_staff = staff;
        self
    }

    pub fn with_merged_shifts(mut self, merge: bool) -> Self {
        self.merge_contiguous_shifts = merge;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.cost_scale(), 100);
        assert_eq!(config.time_limit(), None);
    }

    #[test]
    fn full_document() {
        let config = EngineConfig::from_toml_str(
            r#"
            strategy = "portfolio"
            default_required_staff = 2
            cost_precision = 0
            time_limit_ms = 100
            merge_contiguous_shifts = true
            "#,
        )
        .unwrap();

        assert_eq!(config.strategy, SolverStrategy::Portfolio);
        assert_eq!(config.default_required_staff, 2);
        assert_eq!(config.cost_scale(), 1);
        assert_eq!(config.time_limit(), Some(Duration::from_millis(100)));
        assert!(config.merge_contiguous_shifts);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = EngineConfig::from_toml_str("stratgey = \"exact\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn precision_bounds_checked() {
        let err = EngineConfig::from_toml_str("cost_precision = 9").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_time_limit_rejected() {
        let err = EngineConfig::new().with_time_limit_ms(0).validate().unwrap_err();
        assert!(err.to_string().contains("time_limit_ms"));
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!("exact".parse::<SolverStrategy>(), Ok(SolverStrategy::Exact));
        assert_eq!("Greedy".parse::<SolverStrategy>(), Ok(SolverStrategy::Heuristic));
        assert_eq!("cp".parse::<SolverStrategy>(), Ok(SolverStrategy::Cp));
        assert!("simplex".parse::<SolverStrategy>().is_err());
        assert_eq!(SolverStrategy::Portfolio.to_string(), "portfolio");
    }
}
