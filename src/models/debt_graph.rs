use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{checked_sum, Participant};
use crate::error::Result;

/// A single "debtor owes creditor amount" relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtEdge {
    pub debtor: Participant,
    pub creditor: Participant,
    pub amount: Decimal,
}

impl DebtEdge {
    pub fn new(
        debtor: impl Into<Participant>,
        creditor: impl Into<Participant>,
        amount: Decimal,
    ) -> Self {
        Self {
            debtor: debtor.into(),
            creditor: creditor.into(),
            amount,
        }
    }
}

/// One entry of a debtor's claim list. Serialized as `[creditor, amount]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(Participant, Decimal)", into = "(Participant, Decimal)")]
pub struct Claim {
    pub creditor: Participant,
    pub amount: Decimal,
}

impl From<(Participant, Decimal)> for Claim {
    fn from((creditor, amount): (Participant, Decimal)) -> Self {
        Self { creditor, amount }
    }
}

impl From<Claim> for (Participant, Decimal) {
    fn from(claim: Claim) -> Self {
        (claim.creditor, claim.amount)
    }
}

/// Debts keyed by debtor, each debtor holding the ordered list of what it owes.
///
/// Amounts are not validated on insertion; the aggregator rejects
/// non-positive amounts so the caller learns exactly which edge was bad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebtGraph {
    debts: BTreeMap<Participant, Vec<Claim>>,
}

impl DebtGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a flat edge list, preserving per-debtor order.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = DebtEdge>,
    {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_debt(edge.debtor, edge.creditor, edge.amount);
        }
        graph
    }

    /// Records that `debtor` owes `creditor` the given amount.
    pub fn add_debt(
        &mut self,
        debtor: impl Into<Participant>,
        creditor: impl Into<Participant>,
        amount: Decimal,
    ) -> &mut Self {
        self.debts.entry(debtor.into()).or_default().push(Claim {
            creditor: creditor.into(),
            amount,
        });
        self
    }

    /// Registers a debtor key with no claims.
    pub fn add_participant(&mut self, participant: impl Into<Participant>) -> &mut Self {
        self.debts.entry(participant.into()).or_default();
        self
    }

    /// Iterates debtor keys with their claim lists, ordered by debtor.
    pub fn iter(&self) -> impl Iterator<Item = (&Participant, &[Claim])> {
        self.debts.iter().map(|(debtor, claims)| (debtor, claims.as_slice()))
    }

    /// Flattens the graph into owned edges.
    pub fn edges(&self) -> impl Iterator<Item = DebtEdge> + '_ {
        self.debts.iter().flat_map(|(debtor, claims)| {
            claims.iter().map(move |claim| DebtEdge {
                debtor: debtor.clone(),
                creditor: claim.creditor.clone(),
                amount: claim.amount,
            })
        })
    }

    /// Every participant referenced as a debtor key or as a creditor.
    pub fn participants(&self) -> BTreeSet<&Participant> {
        let mut participants: BTreeSet<&Participant> = self.debts.keys().collect();
        for claims in self.debts.values() {
            participants.extend(claims.iter().map(|c| &c.creditor));
        }
        participants
    }

    pub fn edge_count(&self) -> usize {
        self.debts.values().map(Vec::len).sum()
    }

    /// Sum of every edge amount before any netting.
    pub fn gross_volume(&self) -> Result<Decimal> {
        checked_sum(self.debts.values().flatten().map(|c| c.amount))
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }
}

impl FromIterator<DebtEdge> for DebtGraph {
    fn from_iter<I: IntoIterator<Item = DebtEdge>>(iter: I) -> Self {
        Self::from_edges(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_debt_accumulates_parallel_edges() {
        let mut graph = DebtGraph::new();
        graph
            .add_debt("A", "B", dec!(10))
            .add_debt("A", "B", dec!(15))
            .add_debt("B", "A", dec!(5));

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.gross_volume().unwrap(), dec!(30));
    }

    #[test]
    fn test_creditor_only_participant_is_listed() {
        let graph = DebtGraph::from_edges([DebtEdge::new("A", "Z", dec!(1))]);
        let names: Vec<&str> = graph.participants().into_iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["A", "Z"]);
    }

    #[test]
    fn test_edges_preserve_claim_order() {
        let mut graph = DebtGraph::new();
        graph.add_debt("A", "C", dec!(100)).add_debt("A", "B", dec!(50));

        let creditors: Vec<String> = graph.edges().map(|e| e.creditor.to_string()).collect();
        assert_eq!(creditors, vec!["C", "B"]);
    }

    #[test]
    fn test_deserialize_debtor_keyed_json() {
        let json = r#"{"A": [["B", 50], ["C", "100.25"]], "C": []}"#;
        let graph: DebtGraph = serde_json::from_str(json).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.gross_volume().unwrap(), dec!(150.25));
        assert_eq!(graph.participants().len(), 3);
        assert!(graph.iter().any(|(debtor, claims)| debtor.as_str() == "C" && claims.is_empty()));
    }

    #[test]
    fn test_gross_volume_overflow_is_an_error() {
        let mut graph = DebtGraph::new();
        graph
            .add_debt("A", "C", Decimal::MAX)
            .add_debt("B", "D", Decimal::MAX);

        let err = graph.gross_volume().unwrap_err();
        assert!(matches!(err, crate::error::AppError::AmountOutOfRange(_)));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut graph = DebtGraph::new();
        graph.add_debt("X", "Y", dec!(100));

        let json = serde_json::to_string(&graph).unwrap();
        let parsed: DebtGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, graph);
    }
}
