//! Free-function entry points over the default aggregator and matcher.

use crate::error::Result;
use crate::models::{DebtGraph, NetBalances, Settlement};
use crate::services::{BalanceAggregator, SettlementMatcher};

/// Reduces a debt graph to one net balance per participant.
pub fn aggregate(graph: &DebtGraph) -> Result<NetBalances> {
    BalanceAggregator::new().aggregate(graph)
}

/// Produces the payments that settle the given balances.
pub fn settle(balances: &NetBalances) -> Result<Vec<Settlement>> {
    SettlementMatcher::new().settle(balances)
}

/// `settle(aggregate(graph))`; returns the first error, never a partial list.
pub fn minimize_transactions(graph: &DebtGraph) -> Result<Vec<Settlement>> {
    let balances = aggregate(graph)?;
    settle(&balances)
}
