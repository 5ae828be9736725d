//! The restake application: genesis, block execution and queries.
//!
//! A block executes in four steps against a single branch of the state
//! store:
//!
//! 1. Reward allocations accrue to their delegations.
//! 2. Each transaction runs in its own branch. A failing message rolls back
//!    its whole transaction and nothing else.
//! 3. Matured unbondings are paid out.
//! 4. The harvester scans a snapshot of the block's event log and restakes
//!    the configured portion of every reward withdrawal.
//!
//! State is committed only when the whole block succeeds. Ledger events are
//! published to the [`EventBus`] after commit.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use restake_engine::{Harvester, MsgServer, QueryParamsResponse, QueryServer, RestakeKeeper};
use restake_ledger::{Bank, BondStatus, Context, Event, Staking, UnbondingEntry, Validator};
use restake_nullables::{NullBank, NullDistribution, NullStaking};
use restake_store::{CacheStore, KvStore, MemStore};
use restake_types::{AccountAddress, BlockHeader, Coins, Dec, ValidatorAddress};

use crate::block::{Block, BlockResult, Msg, MsgResponse, RewardAllocation, Tx, TxResult};
use crate::config::NodeConfig;
use crate::genesis::Genesis;
use crate::ledger_event::{EventBus, LedgerEvent};
use crate::metrics::RestakeMetrics;
use crate::tracing_spans::{block_execute_span, end_block_span, harvest_span, tx_span};
use crate::NodeError;

pub struct App {
    store: MemStore,
    keeper: RestakeKeeper,
    bank: NullBank,
    staking: NullStaking,
    distribution: NullDistribution,
    event_bus: EventBus,
    metrics: RestakeMetrics,
    last_header: BlockHeader,
    initialized: bool,
}

fn parse_pair(
    delegator: &str,
    validator: &str,
) -> Result<(AccountAddress, ValidatorAddress), NodeError> {
    Ok((
        AccountAddress::parse(delegator)?,
        ValidatorAddress::parse(validator)?,
    ))
}

fn allocate(
    distribution: NullDistribution,
    ctx: &mut Context<'_>,
    allocation: &RewardAllocation,
) -> Result<(), NodeError> {
    let (delegator, validator) = parse_pair(&allocation.delegator, &allocation.validator)?;
    distribution.allocate_rewards(ctx, &delegator, &validator, &allocation.amount)?;
    Ok(())
}

fn execute_msg(
    keeper: &RestakeKeeper,
    ctx: &mut Context<'_>,
    msg: &Msg,
) -> Result<MsgResponse, NodeError> {
    let server = MsgServer::new(keeper);
    let response = match msg {
        Msg::Delegate(m) => MsgResponse::Delegate(server.delegate(ctx, m)?),
        Msg::Undelegate(m) => MsgResponse::Undelegate(server.undelegate(ctx, m)?),
        Msg::ClaimAndRestake(m) => MsgResponse::ClaimAndRestake(server.claim_and_restake(ctx, m)?),
        Msg::UpdateAutoRestakeRatio(m) => {
            MsgResponse::UpdateAutoRestakeRatio(server.update_auto_restake_ratio(ctx, m)?)
        }
        Msg::WithdrawRewards(m) => {
            let (delegator, validator) = parse_pair(&m.delegator, &m.validator)?;
            let amount = keeper
                .distribution()
                .withdraw_rewards(ctx, &delegator, &validator)?;
            MsgResponse::WithdrawRewards { amount }
        }
    };
    Ok(response)
}

fn execute_tx(
    keeper: &RestakeKeeper,
    ctx: &mut Context<'_>,
    tx: &Tx,
) -> Result<Vec<MsgResponse>, NodeError> {
    if tx.msgs.is_empty() {
        return Err(NodeError::InvalidMsg("transaction carries no messages".into()));
    }
    ctx.branch(|ctx| {
        tx.msgs
            .iter()
            .map(|msg| execute_msg(keeper, ctx, msg))
            .collect()
    })
}

impl App {
    pub fn new(config: &NodeConfig) -> Result<Self, NodeError> {
        let bank = NullBank::new();
        let staking =
            NullStaking::with_unbonding_time(config.bond_denom()?, config.unbonding_time_secs);
        let distribution = NullDistribution::new();
        let keeper = RestakeKeeper::new(
            &config.restaking,
            Arc::new(bank),
            Arc::new(staking.clone()),
            Arc::new(distribution),
        );
        Ok(Self {
            store: MemStore::new(),
            keeper,
            bank,
            staking,
            distribution,
            event_bus: EventBus::new(),
            metrics: RestakeMetrics::new()?,
            last_header: BlockHeader::default(),
            initialized: false,
        })
    }

    /// Write the initial state. Must run once, before the first block.
    pub fn init_genesis(&mut self, genesis: &Genesis) -> Result<(), NodeError> {
        if self.initialized {
            return Err(NodeError::InvalidBlock("genesis already applied".into()));
        }
        let header = BlockHeader::new(0, genesis.time);
        let (keeper, bank, staking, distribution) =
            (&self.keeper, self.bank, &self.staking, self.distribution);

        let mut ctx = Context::new(header, &mut self.store);
        ctx.branch(|ctx| -> Result<(), NodeError> {
            keeper.initialize(ctx)?;
            if let Some(ratio) = genesis.auto_restake_ratio {
                keeper.set_auto_restake_ratio(ctx, ratio)?;
            }
            for account in &genesis.accounts {
                let address = AccountAddress::parse(account.address.as_str())?;
                bank.fund_account(ctx, &address, &account.coins)?;
            }
            for seed in &genesis.validators {
                let mut validator = Validator::new(ValidatorAddress::parse(seed.operator.as_str())?);
                validator.status = seed.status;
                staking.set_validator(ctx, &validator)?;
            }
            for seed in &genesis.delegations {
                let (delegator, operator) = parse_pair(&seed.delegator, &seed.validator)?;
                let validator = staking.validator(ctx, &operator)?;
                staking.delegate(ctx, &delegator, seed.amount, BondStatus::Unbonded, &validator, true)?;
            }
            for seed in genesis.validators.iter().filter(|v| v.jailed) {
                let mut validator =
                    staking.validator(ctx, &ValidatorAddress::parse(seed.operator.as_str())?)?;
                validator.jailed = true;
                staking.set_validator(ctx, &validator)?;
            }
            for allocation in &genesis.rewards {
                allocate(distribution, ctx, allocation)?;
            }
            Ok(())
        })?;
        drop(ctx);

        self.last_header = header;
        self.initialized = true;
        self.metrics
            .auto_restake_ratio
            .set(dec_to_f64(self.auto_restake_ratio()));
        info!(
            accounts = genesis.accounts.len(),
            validators = genesis.validators.len(),
            "genesis applied"
        );
        Ok(())
    }

    /// Execute and commit `block`.
    ///
    /// Fails only when the block itself is invalid or the ledger cannot be
    /// updated; the state is then left exactly as before the call. Failing
    /// transactions and auto-restakes are recorded in the result.
    pub fn execute_block(&mut self, block: &Block) -> Result<BlockResult, NodeError> {
        if !self.initialized {
            return Err(NodeError::InvalidBlock("genesis has not been applied".into()));
        }
        if block.height != self.last_header.height + 1 {
            return Err(NodeError::InvalidBlock(format!(
                "expected height {}, got {}",
                self.last_header.height + 1,
                block.height
            )));
        }
        if block.time < self.last_header.time {
            return Err(NodeError::InvalidBlock(format!(
                "block time {} precedes {}",
                block.time, self.last_header.time
            )));
        }

        let _span = block_execute_span(block.height).entered();
        let started = Instant::now();
        let header = BlockHeader::new(block.height, block.time);
        let (keeper, staking, distribution) = (&self.keeper, &self.staking, self.distribution);

        let mut ctx = Context::new(header, &mut self.store);
        let (txs, matured, harvest) = ctx.branch(|ctx| -> Result<_, NodeError> {
            for allocation in &block.rewards {
                allocate(distribution, ctx, allocation)?;
            }

            let mut txs = Vec::with_capacity(block.txs.len());
            for (index, tx) in block.txs.iter().enumerate() {
                let _tx = tx_span(block.height, index).entered();
                let first_event = ctx.events().len();
                let result = match execute_tx(keeper, ctx, tx) {
                    Ok(responses) => TxResult {
                        index,
                        success: true,
                        error: None,
                        events: ctx.events()[first_event..].to_vec(),
                        responses,
                    },
                    Err(e) => {
                        warn!(error = %e, "transaction rolled back");
                        TxResult {
                            index,
                            success: false,
                            error: Some(e.to_string()),
                            events: Vec::new(),
                            responses: Vec::new(),
                        }
                    }
                };
                txs.push(result);
            }

            let _end = end_block_span(block.height).entered();
            let matured = staking.complete_matured_unbondings(ctx)?;

            let snapshot: Vec<Event> = ctx.events().to_vec();
            let harvest = {
                let _harvest = harvest_span(block.height, snapshot.len()).entered();
                Harvester::new(keeper).harvest(ctx, &snapshot)
            };
            Ok((txs, matured, harvest))
        })?;
        let events = ctx.take_events();
        drop(ctx);
        self.last_header = header;

        let result = BlockResult {
            height: block.height,
            txs,
            events,
            harvest,
            matured_unbondings: matured,
        };
        self.record(&result, started);
        self.publish(&result);
        info!(
            committed = result.committed(),
            rolled_back = result.rolled_back(),
            auto_restakes = result.harvest.executed.len(),
            "block executed"
        );
        Ok(result)
    }

    fn record(&self, result: &BlockResult, started: Instant) {
        let m = &self.metrics;
        m.blocks_executed.inc();
        m.txs_committed.inc_by(result.committed() as u64);
        m.txs_rolled_back.inc_by(result.rolled_back() as u64);
        m.auto_restakes_executed
            .inc_by(result.harvest.executed.len() as u64);
        m.auto_restakes_skipped.inc_by(result.harvest.skipped as u64);
        m.auto_restakes_failed.inc_by(result.harvest.failed as u64);
        m.unbondings_completed
            .inc_by(result.matured_unbondings.len() as u64);
        m.auto_restake_ratio
            .set(dec_to_f64(self.auto_restake_ratio()));
        m.block_execution_time_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);
    }

    fn publish(&self, result: &BlockResult) {
        for tx in result.txs.iter().filter(|t| !t.success) {
            self.event_bus.emit(&LedgerEvent::TxRolledBack {
                height: result.height,
                index: tx.index,
                reason: tx.error.clone().unwrap_or_default(),
            });
        }
        for entry in &result.matured_unbondings {
            self.event_bus
                .emit(&LedgerEvent::UnbondingCompleted(entry.clone()));
        }
        for executed in &result.harvest.executed {
            self.event_bus
                .emit(&LedgerEvent::AutoRestakeExecuted(executed.clone()));
        }
        self.event_bus.emit(&LedgerEvent::BlockExecuted {
            height: result.height,
            committed: result.committed(),
            rolled_back: result.rolled_back(),
        });
        debug!(height = result.height, "ledger events published");
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.event_bus.subscribe(listener);
    }

    pub fn metrics(&self) -> &RestakeMetrics {
        &self.metrics
    }

    pub fn keeper(&self) -> &RestakeKeeper {
        &self.keeper
    }

    pub fn last_height(&self) -> u64 {
        self.last_header.height
    }

    /// The committed state store.
    pub fn store(&self) -> &dyn KvStore {
        &self.store
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Run `f` against a throwaway branch of the committed state.
    pub fn query<T>(&self, f: impl FnOnce(&Context<'_>) -> T) -> T {
        let mut cache = CacheStore::new(&self.store);
        let ctx = Context::new(self.last_header, &mut cache);
        f(&ctx)
    }

    pub fn auto_restake_ratio(&self) -> Dec {
        self.query(|ctx| QueryServer::new(&self.keeper).auto_restake_ratio(ctx))
    }

    pub fn params(&self) -> QueryParamsResponse {
        self.query(|ctx| QueryServer::new(&self.keeper).params(ctx))
    }

    pub fn balances(&self, account: &AccountAddress) -> Result<Coins, NodeError> {
        Ok(self.query(|ctx| self.bank.balances(ctx, account))?)
    }

    pub fn validator(&self, operator: &ValidatorAddress) -> Result<Validator, NodeError> {
        Ok(self.query(|ctx| self.staking.validator(ctx, operator))?)
    }

    pub fn delegated_tokens(
        &self,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
    ) -> Result<u128, NodeError> {
        Ok(self.query(|ctx| self.staking.delegated_tokens(ctx, delegator, validator))?)
    }

    pub fn outstanding_rewards(
        &self,
        delegator: &AccountAddress,
        validator: &ValidatorAddress,
    ) -> Result<Option<Coins>, NodeError> {
        Ok(self.query(|ctx| self.distribution.outstanding(ctx, delegator, validator))?)
    }

    pub fn unbonding_queue(&self) -> Result<Vec<UnbondingEntry>, NodeError> {
        Ok(self.query(|ctx| self.staking.unbonding_queue(ctx))?)
    }
}

// Gauge display only; never fed back into ledger arithmetic.
fn dec_to_f64(value: Dec) -> f64 {
    value.raw() as f64 / Dec::ONE.raw() as f64
}
