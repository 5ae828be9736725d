//! JSON scenarios: a genesis followed by the blocks to execute.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use restake_node::{Block, Genesis};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub genesis: Genesis,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing scenario {}", path.display()))
    }
}
