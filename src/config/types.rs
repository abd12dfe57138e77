use serde::{Deserialize, Serialize};

use swarm_ancestry::DEFAULT_SYNTHETIC_PREFIX;
use swarm_interpret::InterpreterSettings;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub interpret: InterpreterSettings,

    #[serde(default)]
    pub ancestry: AncestryConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Drop chunks for files that have no metadata in the log
    #[serde(default)]
    pub ignore_undescribed_files: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AncestryConfig {
    /// Prefix for ids of fused pieces (default: "n")
    #[serde(default = "default_synthetic_id_prefix")]
    pub synthetic_id_prefix: String,
}

fn default_synthetic_id_prefix() -> String {
    DEFAULT_SYNTHETIC_PREFIX.to_string()
}

impl Default for AncestryConfig {
    fn default() -> Self {
        Self {
            synthetic_id_prefix: default_synthetic_id_prefix(),
        }
    }
}
