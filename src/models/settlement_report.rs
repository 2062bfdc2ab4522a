use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{settled_volume, DebtGraph, NetBalances, Settlement};
use crate::error::Result;

/// Figures describing how much a settlement round reduced the debt graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub participant_count: usize,
    pub creditors: usize,
    pub debtors: usize,
    pub settled_participants: usize,
    pub edge_count: usize,
    /// Sum of every raw debt edge.
    pub gross_volume: Decimal,
    /// Sum of positive net balances after aggregation.
    pub net_volume: Decimal,
    /// Sum actually moved by the emitted settlements.
    pub settled_volume: Decimal,
    pub settlement_count: usize,
}

impl SettlementSummary {
    pub fn from_run(
        graph: &DebtGraph,
        balances: &NetBalances,
        settlements: &[Settlement],
    ) -> Result<Self> {
        let creditors = balances.creditors().count();
        let debtors = balances.debtors().count();

        Ok(Self {
            participant_count: balances.len(),
            creditors,
            debtors,
            settled_participants: balances.len() - creditors - debtors,
            edge_count: graph.edge_count(),
            gross_volume: graph.gross_volume()?,
            net_volume: balances.outstanding()?,
            settled_volume: settled_volume(settlements)?,
            settlement_count: settlements.len(),
        })
    }

    /// Share of the gross debt volume removed by netting, as a percentage.
    ///
    /// Zero for an empty graph or when the ratio cannot be represented.
    pub fn reduction_percentage(&self) -> Decimal {
        if self.gross_volume.is_zero() {
            return Decimal::ZERO;
        }
        self.gross_volume
            .checked_sub(self.net_volume)
            .and_then(|reduction| reduction.checked_div(self.gross_volume))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }

    /// Number of payments avoided compared to paying every edge as-is.
    pub fn transactions_saved(&self) -> usize {
        self.edge_count.saturating_sub(self.settlement_count)
    }
}

/// Complete output of one minimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub balances: NetBalances,
    pub settlements: Vec<Settlement>,
    pub summary: SettlementSummary,
}

impl SettlementReport {
    pub fn new(
        graph: &DebtGraph,
        balances: NetBalances,
        settlements: Vec<Settlement>,
    ) -> Result<Self> {
        let summary = SettlementSummary::from_run(graph, &balances, &settlements)?;
        Ok(Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            balances,
            settlements,
            summary,
        })
    }
}
