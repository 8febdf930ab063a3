//! Engine configuration
//!
//! Everything the engine can be tuned with, loadable from a TOML file. The
//! library never reads files or the environment on its own; callers hand in
//! an [`EngineConfig`] and per-call [`SearchLimits`].
//!
//! ```
//! use gomoku::config::{Difficulty, EngineConfig};
//!
//! let config = EngineConfig::from_toml_str(
//!     r#"
//!     tt_size_mb = 8
//!     [weights]
//!     defensiveness = 2.0
//!     [limits]
//!     max_depth = 6
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.tt_size_mb, 8);
//! assert_eq!(config.weights.aggressiveness, 1.0);
//! assert_eq!(config.limits.max_depth, 6);
//! assert_eq!(Difficulty::Easy.limits().max_depth, 2);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::eval::EvalWeights;
use crate::search::ordering::DEFAULT_CANDIDATE_LIMIT;
use crate::search::zobrist::DEFAULT_SEED;
use crate::search::MAX_SEARCH_DEPTH;

/// Time and depth bounds for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    pub time_budget_ms: u64,
    pub max_depth: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Difficulty::Medium.limits()
    }
}

/// Preset strength tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn limits(self) -> SearchLimits {
        let (time_budget_ms, max_depth) = match self {
            Difficulty::Easy => (300, 2),
            Difficulty::Medium => (1_500, 6),
            Difficulty::Hard => (5_000, 12),
        };
        SearchLimits {
            time_budget_ms,
            max_depth,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(EngineError::Config(format!(
                "unknown difficulty `{other}` (expected easy, medium or hard)"
            ))),
        }
    }
}

/// Session-level engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: EvalWeights,
    /// Seed for the Zobrist keys; the default reuses the process-wide table
    pub zobrist_seed: u64,
    pub tt_size_mb: usize,
    /// Moves kept per node after importance ranking
    pub candidate_limit: usize,
    pub use_opening_book: bool,
    pub limits: SearchLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: EvalWeights::default(),
            zobrist_seed: DEFAULT_SEED,
            tt_size_mb: 16,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            use_opening_book: true,
            limits: SearchLimits::default(),
        }
    }
}

impl EngineConfig {
    /// Default settings with the limits of a difficulty tier.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            limits: difficulty.limits(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let config: Self =
            toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Reject settings the engine cannot honor.
    pub fn validate(&self) -> Result<(), EngineError> {
        let w = self.weights;
        if !(w.aggressiveness.is_finite() && w.aggressiveness > 0.0) {
            return Err(EngineError::Config("aggressiveness must be positive".into()));
        }
        if !(w.defensiveness.is_finite() && w.defensiveness > 0.0) {
            return Err(EngineError::Config("defensiveness must be positive".into()));
        }
        if self.candidate_limit == 0 {
            return Err(EngineError::Config("candidate_limit must be at least 1".into()));
        }
        if self.limits.max_depth == 0 || self.limits.max_depth > MAX_SEARCH_DEPTH {
            return Err(EngineError::Config(format!(
                "max_depth must be within 1..={MAX_SEARCH_DEPTH}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.weights.defensiveness > config.weights.aggressiveness);
        assert_eq!(config.limits, Difficulty::Medium.limits());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = EngineConfig::for_difficulty(Difficulty::Hard);
        config.use_opening_book = false;
        config.zobrist_seed = 99;
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_toml_str("candidate_limit = 0").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));

        let err = EngineConfig::from_toml_str("[limits]\nmax_depth = 99").unwrap_err();
        assert!(err.to_string().contains("max_depth"));

        let err = EngineConfig::from_toml_str("[weights]\ndefensiveness = -1.0").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));

        assert!(EngineConfig::from_toml_str("tt_size_mb = \"big\"").is_err());
    }

    #[test]
    fn test_difficulty_parse_and_order() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("brutal".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        let (e, m, h) = (
            Difficulty::Easy.limits(),
            Difficulty::Medium.limits(),
            Difficulty::Hard.limits(),
        );
        assert!(e.max_depth < m.max_depth && m.max_depth < h.max_depth);
        assert!(e.time_budget_ms < m.time_budget_ms && m.time_budget_ms < h.time_budget_ms);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/gomoku.toml").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
