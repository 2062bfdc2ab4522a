use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{checked_sum, Participant, Settlement};
use crate::error::{AppError, Result};

/// Net position per participant: positive = is owed, negative = owes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetBalances {
    balances: BTreeMap<Participant, Decimal>,
}

impl NetBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures the participant is present, starting from zero if unseen.
    pub fn register(&mut self, participant: &Participant) -> &mut Decimal {
        self.balances.entry(participant.clone()).or_insert(Decimal::ZERO)
    }

    /// Adds a receivable to the participant's position.
    pub fn credit(&mut self, participant: &Participant, amount: Decimal) -> Result<()> {
        let balance = self.register(participant);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| overflow(participant, "crediting", amount))?;
        Ok(())
    }

    /// Adds a payable to the participant's position.
    pub fn debit(&mut self, participant: &Participant, amount: Decimal) -> Result<()> {
        let balance = self.register(participant);
        *balance = balance
            .checked_sub(amount)
            .ok_or_else(|| overflow(participant, "debiting", amount))?;
        Ok(())
    }

    /// Applies a settlement: the payer's debt and the payee's credit both shrink.
    pub fn apply(&mut self, settlement: &Settlement) -> Result<()> {
        self.credit(&settlement.payer, settlement.amount)?;
        self.debit(&settlement.payee, settlement.amount)
    }

    pub fn get(&self, participant: &str) -> Option<Decimal> {
        self.balances.get(participant).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Participant, &Decimal)> {
        self.balances.iter()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum over all positions. Zero for any consistent set of balances.
    pub fn total(&self) -> Result<Decimal> {
        checked_sum(self.balances.values().copied())
    }

    /// Participants owed money, with their credit.
    pub fn creditors(&self) -> impl Iterator<Item = (&Participant, Decimal)> {
        self.balances
            .iter()
            .filter(|(_, b)| b.is_sign_positive() && !b.is_zero())
            .map(|(p, b)| (p, *b))
    }

    /// Participants owing money, with the magnitude of their debt.
    pub fn debtors(&self) -> impl Iterator<Item = (&Participant, Decimal)> {
        self.balances
            .iter()
            .filter(|(_, b)| b.is_sign_negative() && !b.is_zero())
            .map(|(p, b)| (p, b.abs()))
    }

    /// Total still to be paid out (equals total still to be paid in).
    pub fn outstanding(&self) -> Result<Decimal> {
        checked_sum(self.creditors().map(|(_, credit)| credit))
    }

    /// Returns true if every participant is at zero.
    pub fn is_settled(&self) -> bool {
        self.balances.values().all(Decimal::is_zero)
    }
}

/// Later entries for the same participant replace earlier ones.
impl FromIterator<(Participant, Decimal)> for NetBalances {
    fn from_iter<I: IntoIterator<Item = (Participant, Decimal)>>(iter: I) -> Self {
        Self {
            balances: iter.into_iter().collect(),
        }
    }
}

fn overflow(participant: &Participant, action: &str, amount: Decimal) -> AppError {
    AppError::AmountOutOfRange(format!("{} '{}' by {} overflowed", action, participant, amount))
}
