//! Workspace configuration.

use serde::Deserialize;
use thiserror::Error;

use crate::hir::{EvaluationOptions, HierarchyPredicates, IconRule};

/// Default delay between the last keystroke and the edit cycle.
pub const DEFAULT_INPUT_DELAY_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// User settings, read once per cycle.
///
/// Keys are camelCase; every key is optional.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Predicates that also count as `skos:broader`.
    pub custom_hierarchical_reference_predicates_broader: Vec<String>,
    /// Predicates that also count as `skos:narrower`.
    pub custom_hierarchical_reference_predicates_narrower: Vec<String>,
    pub custom_icons: Vec<IconRule>,
    /// Consumed by the host to debounce edits.
    pub input_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            custom_hierarchical_reference_predicates_broader: Vec::new(),
            custom_hierarchical_reference_predicates_narrower: Vec::new(),
            custom_icons: Vec::new(),
            input_delay_ms: DEFAULT_INPUT_DELAY_MS,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            hierarchy: HierarchyPredicates::new(
                &self.custom_hierarchical_reference_predicates_broader,
                &self.custom_hierarchical_reference_predicates_narrower,
            ),
            icons: self.custom_icons.clone(),
        }
    }
}
