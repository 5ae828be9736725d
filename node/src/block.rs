//! Blocks, transactions and their execution results.
//!
//! A block carries the reward allocations applied at its start and an
//! ordered list of transactions. Each transaction is a list of messages that
//! commit together or not at all.

use serde::{Deserialize, Serialize};

use restake_engine::{
    HarvestReport, MsgClaimAndRestake, MsgClaimAndRestakeResponse, MsgDelegate,
    MsgDelegateResponse, MsgUndelegate, MsgUndelegateResponse, MsgUpdateAutoRestakeRatio,
    MsgUpdateAutoRestakeRatioResponse,
};
use restake_ledger::{Event, UnbondingEntry};
use restake_types::{Coins, Timestamp};

/// Plain reward withdrawal, handled by the distribution module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgWithdrawRewards {
    pub delegator: String,
    pub validator: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Msg {
    Delegate(MsgDelegate),
    Undelegate(MsgUndelegate),
    ClaimAndRestake(MsgClaimAndRestake),
    UpdateAutoRestakeRatio(MsgUpdateAutoRestakeRatio),
    WithdrawRewards(MsgWithdrawRewards),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgResponse {
    Delegate(MsgDelegateResponse),
    Undelegate(MsgUndelegateResponse),
    ClaimAndRestake(MsgClaimAndRestakeResponse),
    UpdateAutoRestakeRatio(MsgUpdateAutoRestakeRatioResponse),
    WithdrawRewards { amount: Coins },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub msgs: Vec<Msg>,
}

impl Tx {
    pub fn new(msgs: Vec<Msg>) -> Self {
        Self { msgs }
    }

    pub fn single(msg: Msg) -> Self {
        Self { msgs: vec![msg] }
    }
}

/// Rewards accrued to a delegation at the start of a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAllocation {
    pub delegator: String,
    pub validator: String,
    pub amount: Coins,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub time: Timestamp,
    #[serde(default)]
    pub rewards: Vec<RewardAllocation>,
    #[serde(default)]
    pub txs: Vec<Tx>,
}

impl Block {
    pub fn new(height: u64, time: Timestamp) -> Self {
        Self {
            height,
            time,
            rewards: Vec::new(),
            txs: Vec::new(),
        }
    }

    pub fn with_tx(mut self, tx: Tx) -> Self {
        self.txs.push(tx);
        self
    }

    pub fn with_reward(mut self, allocation: RewardAllocation) -> Self {
        self.rewards.push(allocation);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    pub index: usize,
    pub success: bool,
    /// Why the transaction was rolled back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Events the transaction emitted; empty when rolled back.
    pub events: Vec<Event>,
    pub responses: Vec<MsgResponse>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockResult {
    pub height: u64,
    pub txs: Vec<TxResult>,
    /// The block's full event log, including end-of-block events.
    pub events: Vec<Event>,
    pub harvest: HarvestReport,
    pub matured_unbondings: Vec<UnbondingEntry>,
}

impl BlockResult {
    pub fn committed(&self) -> usize {
        self.txs.iter().filter(|t| t.success).count()
    }

    pub fn rolled_back(&self) -> usize {
        self.txs.len() - self.committed()
    }
}
