use crate::error::{AppError, Result};
use crate::models::{ensure_exact, NetBalances, Participant, Settlement};
use crate::services::balance_aggregator::ensure_zero_sum;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

/// Heap entry ordered by amount, then by participant id ascending.
///
/// `BinaryHeap` pops the greatest entry, so the participant comparison is
/// reversed: on equal amounts the lexicographically smaller id comes out first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Outstanding {
    amount: Decimal,
    participant: Participant,
}

impl Ord for Outstanding {
    fn cmp(&self, other: &Self) -> Ordering {
        self.amount
            .cmp(&other.amount)
            .then_with(|| other.participant.cmp(&self.participant))
    }
}

impl PartialOrd for Outstanding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Greedy largest-creditor / largest-debtor matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementMatcher;

impl SettlementMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Produces the payments that bring every balance to zero.
    ///
    /// Each round pays the largest debt towards the largest credit, so every
    /// round retires at least one participant and at most `n - 1` payments are
    /// emitted for `n` participants with a non-zero balance.
    ///
    /// Balances that could not be summed exactly fail with `AmountOutOfRange`
    /// before any matching happens.
    pub fn settle(&self, balances: &NetBalances) -> Result<Vec<Settlement>> {
        ensure_exact(balances.iter().map(|(_, balance)| *balance), 1)?;
        ensure_zero_sum(balances)?;
        self.match_balances(balances)
    }

    fn match_balances(&self, balances: &NetBalances) -> Result<Vec<Settlement>> {
        let mut creditors: BinaryHeap<Outstanding> = balances
            .creditors()
            .map(|(participant, amount)| Outstanding {
                amount,
                participant: participant.clone(),
            })
            .collect();
        let mut debtors: BinaryHeap<Outstanding> = balances
            .debtors()
            .map(|(participant, amount)| Outstanding {
                amount,
                participant: participant.clone(),
            })
            .collect();

        let mut settlements = Vec::with_capacity(creditors.len().max(debtors.len()));

        loop {
            let (credit, debt) = match (creditors.pop(), debtors.pop()) {
                (Some(credit), Some(debt)) => (credit, debt),
                (None, None) => break,
                // Both heaps must run dry in the same round.
                (Some(left), None) | (None, Some(left)) => {
                    return Err(AppError::UnmatchedBalance {
                        participant: left.participant,
                        remaining: left.amount,
                    });
                }
            };
            let settled = credit.amount.min(debt.amount);

            debug!(
                payer = %debt.participant,
                payee = %credit.participant,
                amount = %settled,
                "Matched largest debtor with largest creditor"
            );

            // Remainders shrink towards zero and stay within the range `settle` checked.
            if debt.amount > settled {
                debtors.push(Outstanding {
                    amount: debt.amount - settled,
                    participant: debt.participant.clone(),
                });
            }
            if credit.amount > settled {
                creditors.push(Outstanding {
                    amount: credit.amount - settled,
                    participant: credit.participant.clone(),
                });
            }

            settlements.push(Settlement {
                payer: debt.participant,
                payee: credit.participant,
                amount: settled,
            });
        }

        Ok(settlements)
    }
}
