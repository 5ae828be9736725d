//! Messages accepted by the restaking engine and their responses.
//!
//! Addresses travel as raw strings and are validated by the handler, so a
//! malformed address is reported as `InvalidAddress` rather than failing
//! decoding.

use restake_types::{Coin, Dec, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDelegate {
    pub delegator: String,
    pub validator: String,
    pub amount: u128,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDelegateResponse {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUndelegate {
    pub delegator: String,
    pub validator: String,
    pub amount: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUndelegateResponse {
    pub completion_time: Timestamp,
    pub amount: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimAndRestake {
    pub delegator: String,
    pub validator: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimAndRestakeResponse {
    pub amount: Coin,
}

/// Governance-only ratio change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateAutoRestakeRatio {
    pub authority: String,
    pub ratio: Dec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateAutoRestakeRatioResponse {}
