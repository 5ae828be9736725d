//! Restake node: runs the restaking engine inside a block-executing
//! application.
//!
//! - [`App`]: genesis, block execution with per-transaction rollback, the
//!   end-of-block harvest and read-only queries.
//! - [`NodeConfig`]: TOML configuration.
//! - [`RestakeMetrics`], [`EventBus`], [`init_logging`]: observability.

pub mod app;
pub mod block;
pub mod config;
pub mod error;
pub mod genesis;
pub mod ledger_event;
pub mod logging;
pub mod metrics;
pub mod tracing_spans;

pub use app::App;
pub use block::{
    Block, BlockResult, Msg, MsgResponse, MsgWithdrawRewards, RewardAllocation, Tx, TxResult,
};
pub use config::NodeConfig;
pub use error::NodeError;
pub use genesis::{Genesis, GenesisAccount, GenesisDelegation, GenesisValidator};
pub use ledger_event::{EventBus, LedgerEvent};
pub use logging::{init_logging, LogFormat};
pub use metrics::RestakeMetrics;
