//! Planner configuration.
//!
//! ```
//! use goap_rooms::PlannerConfig;
//!
//! let config = PlannerConfig::from_json_str(r#"{ "fallback_iteration_limit": 250 }"#).unwrap();
//! assert_eq!(config.fallback_iteration_limit, 250);
//! assert_eq!(config.strict_iteration_limit, None);
//! assert_eq!(config.heuristic_weight, 5);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::heuristic::DEFAULT_HEURISTIC_WEIGHT;
use crate::node::UniquenessMode;
use crate::search::SearchConfig;
use crate::Result;

/// Expansion cap of the relaxed fallback pass unless configured otherwise.
pub const DEFAULT_FALLBACK_ITERATION_LIMIT: usize = 100;

/// Settings for the two-phase planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Cap on the strict pass. Unbounded when absent.
    pub strict_iteration_limit: Option<usize>,
    /// Cap on the relaxed fallback pass
    pub fallback_iteration_limit: usize,
    /// Multiplier applied to the room distance in node scores
    pub heuristic_weight: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strict_iteration_limit: None,
            fallback_iteration_limit: DEFAULT_FALLBACK_ITERATION_LIMIT,
            heuristic_weight: DEFAULT_HEURISTIC_WEIGHT,
        }
    }
}

impl PlannerConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Configuration of the first, strict pass.
    pub fn strict_pass(&self) -> SearchConfig {
        SearchConfig {
            uniqueness: UniquenessMode::Strict,
            iteration_limit: self.strict_iteration_limit,
        }
    }

    /// Configuration of the relaxed fallback pass.
    pub fn fallback_pass(&self) -> SearchConfig {
        SearchConfig::relaxed(self.fallback_iteration_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlannerError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.strict_iteration_limit, None);
        assert_eq!(config.fallback_iteration_limit, 100);
        assert_eq!(config.heuristic_weight, 5);
        assert_eq!(config.strict_pass(), SearchConfig::strict());
        assert_eq!(config.fallback_pass(), SearchConfig::relaxed(100));
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(PlannerConfig::from_json_str("{}").unwrap(), PlannerConfig::default());
    }

    #[test]
    fn test_strict_limit_flows_into_pass() {
        let config = PlannerConfig::from_json_str(r#"{"strict_iteration_limit": 40}"#).unwrap();
        assert_eq!(config.strict_pass().iteration_limit, Some(40));
        assert_eq!(config.strict_pass().uniqueness, UniquenessMode::Strict);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"heuristic_weight": 2}}"#).unwrap();
        let config = PlannerConfig::from_path(file.path()).unwrap();
        assert_eq!(config.heuristic_weight, 2);
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let err = PlannerConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, PlannerError::Serialization(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PlannerConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
    }
}
