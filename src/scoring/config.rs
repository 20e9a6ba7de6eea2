use serde::{Deserialize, Serialize};

/// Weight used for either side when the config leaves it unset.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// How the local and external scores are blended into the final score.
///
/// `final = (local_weight * local + external_weight * external) / (local_weight + external_weight)`
///
/// Example YAML:
/// ```yaml
/// scoring:
///   local_weight: 1
///   external_weight: 1
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Weight of the mean of name, email and phone similarity (default: 1.0)
    #[serde(default)]
    pub local_weight: Option<f64>,

    /// Weight of the model-derived score (default: 1.0)
    #[serde(default)]
    pub external_weight: Option<f64>,
}

impl ScoringConfig {
    pub fn local_weight(&self) -> f64 {
        self.local_weight.unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn external_weight(&self) -> f64 {
        self.external_weight.unwrap_or(DEFAULT_WEIGHT)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            local_weight: Some(DEFAULT_WEIGHT),
            external_weight: Some(DEFAULT_WEIGHT),
        }
    }
}
