//! The restaking engine.
//!
//! Lets accounts delegate and undelegate stake, claim rewards and restake
//! them in one message, and automatically reinvests a chain-wide fraction of
//! every reward withdrawal at the end of each block.
//!
//! - [`PolicyStore`] owns the persisted auto-restake ratio.
//! - [`compute_portion`] maps a reward payout and a ratio to the amount to
//!   reinvest.
//! - [`MsgServer`] executes the user-facing operations.
//! - [`Harvester`] scans a block's event log for reward withdrawals and
//!   restakes the configured portion of each, best effort.
//! - [`QueryServer`] answers read-only parameter queries.

pub mod calculator;
pub mod config;
pub mod error;
pub mod events;
pub mod harvester;
pub mod keeper;
pub mod msg_server;
pub mod msgs;
pub mod params;
pub mod query;

pub use calculator::compute_portion;
pub use config::RestakingConfig;
pub use error::RestakeError;
pub use events::{AutoRestakeExecuted, ClaimAndRestakeExecuted, RatioUpdated};
pub use harvester::{HarvestReport, Harvester, RewardWithdrawal};
pub use keeper::RestakeKeeper;
pub use msg_server::MsgServer;
pub use msgs::{
    MsgClaimAndRestake, MsgClaimAndRestakeResponse, MsgDelegate, MsgDelegateResponse,
    MsgUndelegate, MsgUndelegateResponse, MsgUpdateAutoRestakeRatio,
    MsgUpdateAutoRestakeRatioResponse,
};
pub use params::{PolicyStore, DEFAULT_AUTO_RESTAKE_RATIO};
pub use query::{QueryParamsResponse, QueryServer};

/// Module name, used as the store key prefix and in log fields.
pub const MODULE_NAME: &str = "restaking";
