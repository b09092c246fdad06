use serde::{Deserialize, Serialize};

use crate::pipeline::SortKey;

/// Records scored per blocking task when no batch size is configured.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// User configuration.
///
/// Example YAML:
/// ```yaml
/// inputs: ["~/leads/*.json"]
/// sort_by: opportunity
/// limit: 50
/// min_score: 40
/// tags: [boring_goldmine, quick_win]
/// batch_size: 256
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Prospect export paths or glob patterns
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Score used for ranking (default: opportunity)
    #[serde(default)]
    pub sort_by: Option<SortKey>,

    /// Maximum number of prospects to list
    #[serde(default)]
    pub limit: Option<usize>,

    /// Drop prospects whose sort-key score is below this value
    #[serde(default)]
    pub min_score: Option<f64>,

    /// Keep only prospects carrying at least one of these tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Records per parallel scoring batch
    #[serde(default)]
    pub batch_size: Option<usize>,
}

impl Config {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }
}
