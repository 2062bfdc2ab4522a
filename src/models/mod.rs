pub mod amount;
pub mod debt_graph;
pub mod net_balances;
pub mod participant;
pub mod settlement;
pub mod settlement_report;

pub use amount::{checked_sum, ensure_exact};
pub use debt_graph::{Claim, DebtEdge, DebtGraph};
pub use net_balances::NetBalances;
pub use participant::Participant;
pub use settlement::{settled_volume, Settlement};
pub use settlement_report::{SettlementReport, SettlementSummary};
