use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Participant;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors raised while aggregating debts or matching settlements.
#[derive(Debug, Error)]
pub enum AppError {
    /// A debt edge carried a zero or negative amount.
    #[error("Malformed debt edge #{position} of '{debtor}': owes '{creditor}' a non-positive amount {amount}")]
    MalformedEdge {
        debtor: Participant,
        creditor: Participant,
        amount: Decimal,
        /// Index of the edge within the debtor's claim list.
        position: usize,
    },

    /// Net balances do not sum to zero.
    #[error("Net balances do not sum to zero (total {total})")]
    UnboundedImbalance { total: Decimal },

    /// One side of the matcher ran dry while the other still held a balance.
    #[error("Unmatched balance of {remaining} left for '{participant}' after settlement")]
    UnmatchedBalance {
        participant: Participant,
        remaining: Decimal,
    },

    /// Amounts too large or too finely scaled to be netted without overflow
    /// or rounding.
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    /// Input rejected before netting, such as a blank participant id.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short, stable label used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MalformedEdge { .. } => "malformed_edge",
            AppError::UnboundedImbalance { .. } => "unbounded_imbalance",
            AppError::UnmatchedBalance { .. } => "unmatched_balance",
            AppError::AmountOutOfRange(_) => "amount_out_of_range",
            AppError::Validation(_) => "validation",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Serialization(_) => "serialization",
            AppError::Internal(_) => "internal",
        }
    }
}
