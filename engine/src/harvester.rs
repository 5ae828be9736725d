//! End-of-block reward harvester.
//!
//! After every transaction of a block has executed, the harvester walks the
//! block's event log, picks out reward withdrawals, and delegates the
//! configured portion of each back to the validator it came from. It is
//! driven by the event snapshot handed to [`Harvester::harvest`] and keeps no
//! state between blocks, so replaying the same snapshot never finds a queue
//! of leftover work.
//!
//! A withdrawal made by a claim-and-restake has already been delegated in
//! full, so it is left alone: each `claim_and_restake` event consumes the
//! nearest earlier withdrawal of the same delegator and validator.
//!
//! Auto-restaking is best effort. A malformed event is skipped, a failed
//! delegation is logged and rolled back on its own, and neither affects the
//! remaining events or the block. The skip/restake decision depends only on
//! the snapshot and the ledger state, so every replica reaches the same one.

use crate::calculator::compute_portion;
use crate::events::{kinds as restake_kinds, AutoRestakeExecuted};
use crate::keeper::RestakeKeeper;
use crate::RestakeError;
use restake_ledger::event::{keys, kinds};
use restake_ledger::{Context, Event};
use restake_types::{AccountAddress, Coin, Coins, ValidatorAddress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, error, info};

/// A reward withdrawal observed in the event log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardWithdrawal {
    pub delegator: AccountAddress,
    pub validator: ValidatorAddress,
    pub rewards: Coins,
}

impl RewardWithdrawal {
    /// Decode a `withdraw_rewards` event.
    ///
    /// `None` when the event is of another kind, or when the delegator,
    /// validator or amount attribute is missing or malformed, or the amount
    /// is empty.
    pub fn from_event(event: &Event) -> Option<Self> {
        if !event.is(kinds::WITHDRAW_REWARDS) {
            return None;
        }
        let delegator = AccountAddress::parse(event.attribute(keys::DELEGATOR)?).ok()?;
        let validator = ValidatorAddress::parse(event.attribute(keys::VALIDATOR)?).ok()?;
        let rewards: Coins = event.attribute(keys::AMOUNT)?.parse().ok()?;
        if rewards.is_empty() {
            return None;
        }
        Some(Self {
            delegator,
            validator,
            rewards,
        })
    }
}

/// Outcome of harvesting one block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestReport {
    /// Advisory records, one per restake that went through.
    pub executed: Vec<AutoRestakeExecuted>,
    /// Withdrawal events that were malformed, already reinvested, or produced
    /// nothing to restake.
    pub skipped: usize,
    /// Withdrawals whose restake was attempted and rolled back.
    pub failed: usize,
}

impl HarvestReport {
    pub fn is_empty(&self) -> bool {
        self.executed.is_empty() && self.skipped == 0 && self.failed == 0
    }
}

/// Positions of the `withdraw_rewards` events whose payout a
/// claim-and-restake already reinvested.
fn reinvested_withdrawals(events: &[Event]) -> BTreeSet<usize> {
    let mut consumed = BTreeSet::new();
    for (idx, claim) in events.iter().enumerate() {
        if !claim.is(restake_kinds::CLAIM_AND_RESTAKE) {
            continue;
        }
        let pair = (claim.attribute(keys::DELEGATOR), claim.attribute(keys::VALIDATOR));
        let withdrawal = events[..idx].iter().enumerate().rev().find(|(i, e)| {
            e.is(kinds::WITHDRAW_REWARDS)
                && !consumed.contains(i)
                && (e.attribute(keys::DELEGATOR), e.attribute(keys::VALIDATOR)) == pair
        });
        if let Some((i, _)) = withdrawal {
            consumed.insert(i);
        }
    }
    consumed
}

pub struct Harvester<'k> {
    keeper: &'k RestakeKeeper,
}

impl<'k> Harvester<'k> {
    pub fn new(keeper: &'k RestakeKeeper) -> Self {
        Self { keeper }
    }

    /// Restake the configured portion of every reward withdrawal in
    /// `events`. Never fails.
    pub fn harvest(&self, ctx: &mut Context<'_>, events: &[Event]) -> HarvestReport {
        let mut report = HarvestReport::default();
        let ratio = self.keeper.auto_restake_ratio(ctx);
        let height = ctx.height();
        let reinvested = reinvested_withdrawals(events);

        for (idx, event) in events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is(kinds::WITHDRAW_REWARDS))
        {
            if reinvested.contains(&idx) {
                debug!(height, "withdrawal already reinvested by claim and restake");
                report.skipped += 1;
                continue;
            }
            let Some(withdrawal) = RewardWithdrawal::from_event(event) else {
                debug!(height, "skipping malformed reward withdrawal event");
                report.skipped += 1;
                continue;
            };

            let portion = compute_portion(&withdrawal.rewards, ratio);
            if portion.is_empty() {
                report.skipped += 1;
                continue;
            }

            let RewardWithdrawal {
                delegator,
                validator,
                ..
            } = withdrawal;
            let outcome = ctx.branch(|ctx| -> Result<Option<Coin>, RestakeError> {
                self.keeper
                    .restake_portion(ctx, &delegator, &validator, &portion)
            });

            match outcome {
                Ok(Some(amount)) => {
                    info!(%delegator, %validator, %amount, height, "auto-restake executed");
                    report.executed.push(AutoRestakeExecuted {
                        delegator,
                        validator,
                        amount,
                        height,
                    });
                }
                Ok(None) => {
                    debug!(%delegator, %validator, %portion, "no bond denomination in portion");
                    report.skipped += 1;
                }
                Err(e) => {
                    error!(error = %e, %delegator, %validator, height, "auto-restake delegate failed");
                    report.failed += 1;
                }
            }
        }
        report
    }
}
