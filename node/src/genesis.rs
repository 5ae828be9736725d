//! Initial ledger state.

use serde::{Deserialize, Serialize};

use restake_ledger::BondStatus;
use restake_types::{Coins, Dec, Timestamp};

use crate::block::RewardAllocation;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisValidator {
    pub operator: String,
    #[serde(default = "default_status")]
    pub status: BondStatus,
    /// Applied after genesis delegations, so a jailed validator can still
    /// start out with stake.
    #[serde(default)]
    pub jailed: bool,
}

fn default_status() -> BondStatus {
    BondStatus::Bonded
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub address: String,
    pub coins: Coins,
}

/// Stake bonded out of the delegator's genesis balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisDelegation {
    pub delegator: String,
    pub validator: String,
    pub amount: u128,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    #[serde(default)]
    pub time: Timestamp,
    /// Overrides the configured default ratio when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_restake_ratio: Option<Dec>,
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
    #[serde(default)]
    pub validators: Vec<GenesisValidator>,
    #[serde(default)]
    pub delegations: Vec<GenesisDelegation>,
    #[serde(default)]
    pub rewards: Vec<RewardAllocation>,
}
