//! Block header: the height and time every state transition is evaluated at.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    pub time: Timestamp,
}

impl BlockHeader {
    pub fn new(height: u64, time: Timestamp) -> Self {
        Self { height, time }
    }
}
