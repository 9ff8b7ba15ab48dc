use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::slot::SlotKey;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Partial assignment of '{item}' to {slot} is infeasible: {reason}")]
    PartialAssignment {
        item: String,
        slot: SlotKey,
        reason: String,
    },

    #[error("No schedule satisfies the hard constraints ({nodes_explored} nodes explored)")]
    Infeasible { nodes_explored: u64 },

    #[error("Search stopped by the {limit} before any complete schedule was found ({nodes_explored} nodes explored)")]
    BudgetExhausted {
        limit: &'static str,
        nodes_explored: u64,
    },

    #[error("Cannot evaluate an incomplete schedule ({remaining} items unplaced)")]
    IncompleteSchedule { remaining: usize },

    #[error("Invalid search configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
