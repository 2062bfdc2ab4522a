pub mod balance_aggregator;
pub mod cashflow_service;
pub mod netting;
pub mod settlement_matcher;

pub use balance_aggregator::{ensure_zero_sum, BalanceAggregator};
pub use cashflow_service::{CashFlowMetrics, CashFlowService};
pub use netting::{aggregate, minimize_transactions, settle};
pub use settlement_matcher::SettlementMatcher;
