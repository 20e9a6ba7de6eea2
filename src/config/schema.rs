use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::external::ScorerConfig;
use crate::records::DuplicatePolicy;
use crate::scoring::ScoringConfig;

pub const DEFAULT_BANKS_PATH: &str = "third-party-banks.json";
pub const DEFAULT_CUSTOMERS_PATH: &str = "bankury-customers.json";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub inputs: InputsConfig,

    #[serde(default)]
    pub scorer: ScorerConfig,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    /// Conflict policy for customers sharing a companyId
    #[serde(default)]
    pub duplicate_ids: DuplicatePolicy,
}

/// Where the two record sets are read from.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    #[serde(default = "default_banks_path")]
    pub banks: PathBuf,

    #[serde(default = "default_customers_path")]
    pub customers: PathBuf,
}

fn default_banks_path() -> PathBuf {
    PathBuf::from(DEFAULT_BANKS_PATH)
}

fn default_customers_path() -> PathBuf {
    PathBuf::from(DEFAULT_CUSTOMERS_PATH)
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            banks: default_banks_path(),
            customers: default_customers_path(),
        }
    }
}
