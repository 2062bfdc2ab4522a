use crate::error::{AppError, Result};
use crate::models::{ensure_exact, DebtGraph, NetBalances, Participant};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Collapses a debt graph into one net position per participant.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceAggregator;

impl BalanceAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Calculates net balances for every participant referenced by the graph.
    ///
    /// Debtor keys are always present in the result, even with no claims.
    /// Creditors are registered lazily at zero before being credited, so a
    /// participant that only ever receives money is never dropped.
    ///
    /// Fails with `Validation` on a blank participant id and with
    /// `MalformedEdge` on the first edge with a non-positive amount. Fails with
    /// `AmountOutOfRange` if the edge amounts cannot be netted exactly, and
    /// with `UnboundedImbalance` if the balances do not sum to zero.
    pub fn aggregate(&self, graph: &DebtGraph) -> Result<NetBalances> {
        validate_edges(graph)?;

        // Every balance and every partial sum over balances is bounded by
        // twice the gross volume.
        ensure_exact(graph.edges().map(|edge| edge.amount), 2).map_err(|e| {
            warn!(
                edges = graph.edge_count(),
                error = %e,
                "Rejecting debt graph outside exact range"
            );
            e
        })?;

        let mut balances = NetBalances::new();
        for (debtor, claims) in graph.iter() {
            balances.register(debtor);
            for claim in claims {
                balances.debit(debtor, claim.amount)?;
                balances.credit(&claim.creditor, claim.amount)?;
            }
        }

        ensure_zero_sum(&balances)?;

        debug!(
            participants = balances.len(),
            edges = graph.edge_count(),
            "Aggregated net balances"
        );

        Ok(balances)
    }
}

/// Rejects blank ids and non-positive amounts, stopping at the first bad edge.
fn validate_edges(graph: &DebtGraph) -> Result<()> {
    for (debtor, claims) in graph.iter() {
        ensure_named(debtor)?;

        for (position, claim) in claims.iter().enumerate() {
            ensure_named(&claim.creditor)?;
            if claim.amount <= Decimal::ZERO {
                warn!(
                    debtor = %debtor,
                    creditor = %claim.creditor,
                    amount = %claim.amount,
                    position,
                    "Rejecting debt edge with non-positive amount"
                );
                return Err(AppError::MalformedEdge {
                    debtor: debtor.clone(),
                    creditor: claim.creditor.clone(),
                    amount: claim.amount,
                    position,
                });
            }
        }
    }
    Ok(())
}

fn ensure_named(participant: &Participant) -> Result<()> {
    if participant.as_str().trim().is_empty() {
        return Err(AppError::Validation("Participant id must not be blank".to_string()));
    }
    Ok(())
}

/// Checks that every unit of debt has a matching unit of credit.
pub fn ensure_zero_sum(balances: &NetBalances) -> Result<()> {
    let total = balances.total()?;
    if !total.is_zero() {
        return Err(AppError::UnboundedImbalance { total });
    }
    Ok(())
}
