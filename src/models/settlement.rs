use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{checked_sum, Participant};
use crate::error::Result;

/// A single payment that moves `amount` from `payer` to `payee`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settlement {
    pub payer: Participant,
    pub payee: Participant,
    pub amount: Decimal,
}

impl Settlement {
    pub fn new(
        payer: impl Into<Participant>,
        payee: impl Into<Participant>,
        amount: Decimal,
    ) -> Self {
        Self {
            payer: payer.into(),
            payee: payee.into(),
            amount,
        }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {}: {}", self.payer, self.payee, self.amount)
    }
}

/// Sum of all settlement amounts.
pub fn settled_volume(settlements: &[Settlement]) -> Result<Decimal> {
    checked_sum(settlements.iter().map(|s| s.amount))
}
