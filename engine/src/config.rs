//! Restaking module configuration.

use crate::params::DEFAULT_AUTO_RESTAKE_RATIO;
use restake_types::Dec;
use serde::{Deserialize, Serialize};

/// Static configuration of the restaking module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestakingConfig {
    /// The only account allowed to change the auto-restake ratio.
    #[serde(default = "default_authority")]
    pub authority: String,

    /// Ratio written at module initialization and returned while unset.
    #[serde(default = "default_ratio")]
    pub default_auto_restake_ratio: Dec,
}

fn default_authority() -> String {
    "rsk1governance".to_string()
}

fn default_ratio() -> Dec {
    DEFAULT_AUTO_RESTAKE_RATIO
}

impl Default for RestakingConfig {
    fn default() -> Self {
        Self {
            authority: default_authority(),
            default_auto_restake_ratio: default_ratio(),
        }
    }
}
