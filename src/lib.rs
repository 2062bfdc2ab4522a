pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;

pub use error::{AppError, Result};
pub use models::{DebtEdge, DebtGraph, NetBalances, Participant, Settlement, SettlementReport};
pub use services::{aggregate, minimize_transactions, settle};
