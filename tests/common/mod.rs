#![allow(dead_code)]

use cashflow_minimizer::{DebtEdge, DebtGraph, NetBalances, Settlement};
use rust_decimal::Decimal;

/// Builds a graph from `(debtor, creditor, amount)` triples.
pub fn graph_from(edges: &[(&str, &str, i64)]) -> DebtGraph {
    edges
        .iter()
        .map(|(debtor, creditor, amount)| {
            DebtEdge::new(*debtor, *creditor, Decimal::from(*amount))
        })
        .collect()
}

/// The six-participant round used as the large scenario.
pub fn six_party_graph() -> DebtGraph {
    graph_from(&[
        ("A", "B", 300),
        ("A", "C", 250),
        ("A", "D", 100),
        ("B", "C", 150),
        ("B", "E", 200),
        ("C", "A", 400),
        ("C", "D", 150),
        ("C", "F", 100),
        ("D", "B", 50),
        ("D", "E", 300),
        ("E", "A", 500),
        ("E", "C", 100),
        ("E", "F", 200),
        ("F", "D", 500),
    ])
}

/// Applies every settlement to a copy of the balances.
pub fn apply_all(balances: &NetBalances, settlements: &[Settlement]) -> NetBalances {
    let mut after = balances.clone();
    for settlement in settlements {
        after.apply(settlement).expect("settlement overflowed");
    }
    after
}

pub fn settlement(payer: &str, payee: &str, amount: i64) -> Settlement {
    Settlement::new(payer, payee, Decimal::from(amount))
}
