use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Table file used when neither `--file` nor `matrix_path` is given
pub const DEFAULT_MATRIX_FILE: &str = "wadm_data.csv";
pub const DEFAULT_BUDGET: f64 = 1000.0;
pub const DEFAULT_MAX_ALTERNATIVES: usize = 16;

/// Criteria a fresh table starts with: budget, use case, time, performance,
/// comfort, fuel economy, parts availability, resale depreciation, practical
/// space, social image.
pub const DEFAULT_CRITERIA: [&str; 10] = [
    "投入預算",
    "使用場景",
    "時間",
    "性能",
    "舒適度",
    "油耗",
    "零件妥善率",
    "二手折舊",
    "空間實用性",
    "社交形象",
];

/// Top-level configuration file.
///
/// Every field is optional; an empty file behaves like no file at all.
///
/// Example YAML:
/// ```yaml
/// matrix_path: cars.csv
/// default_criteria: ["Budget", "Comfort", "Fuel"]
/// budget: 60000
/// default_price: 25000
/// prices:
///   Civic: 24000
///   Corolla: 22000
/// max_alternatives: 12
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path of the decision table (default: ./wadm_data.csv)
    #[serde(default)]
    pub matrix_path: Option<String>,

    /// Criteria written by `wadm init`
    #[serde(default = "default_criteria")]
    pub default_criteria: Vec<String>,

    /// Budget used by `wadm combos` when `--budget` is absent
    #[serde(default)]
    pub budget: Option<f64>,

    /// Price assumed for alternatives missing from `prices`
    #[serde(default)]
    pub default_price: Option<f64>,

    /// Price per alternative, keyed by the alternative's column header
    #[serde(default)]
    pub prices: HashMap<String, f64>,

    /// Refuse to enumerate combinations above this many alternatives
    #[serde(default)]
    pub max_alternatives: Option<usize>,
}

fn default_criteria() -> Vec<String> {
    DEFAULT_CRITERIA.iter().map(|c| c.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matrix_path: None,
            default_criteria: default_criteria(),
            budget: None,
            default_price: None,
            prices: HashMap::new(),
            max_alternatives: None,
        }
    }
}

impl Config {
    pub fn matrix_path(&self) -> PathBuf {
        PathBuf::from(self.matrix_path.as_deref().unwrap_or(DEFAULT_MATRIX_FILE))
    }

    pub fn budget(&self) -> f64 {
        self.budget.unwrap_or(DEFAULT_BUDGET)
    }

    pub fn max_alternatives(&self) -> usize {
        self.max_alternatives.unwrap_or(DEFAULT_MAX_ALTERNATIVES)
    }
}
