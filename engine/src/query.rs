//! Read-only queries.

use crate::keeper::RestakeKeeper;
use restake_ledger::Context;
use restake_types::Dec;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParamsResponse {
    pub auto_restake_ratio: Dec,
}

pub struct QueryServer<'k> {
    keeper: &'k RestakeKeeper,
}

impl<'k> QueryServer<'k> {
    pub fn new(keeper: &'k RestakeKeeper) -> Self {
        Self { keeper }
    }

    pub fn auto_restake_ratio(&self, ctx: &Context<'_>) -> Dec {
        self.keeper.auto_restake_ratio(ctx)
    }

    pub fn params(&self, ctx: &Context<'_>) -> QueryParamsResponse {
        QueryParamsResponse {
            auto_restake_ratio: self.auto_restake_ratio(ctx),
        }
    }
}
