//! # Engine Module
//!
//! The search machinery that turns a [`Problem`](crate::core::models::problem::Problem)
//! into ranked schedules.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Search strategy, solution count, batch size and limits
//! - **Tasks** ([`tasks`]) - Hard-constraint validation, soft-constraint scoring,
//!   variable selection and branching
//! - **Frontier** ([`frontier`]) - Arena of open nodes with FIFO, LIFO or best-first ordering
//! - **State Tracking** ([`state`]) - Complete solutions and the shared top-N pool
//! - **Progress Monitoring** ([`progress`]) - Callbacks for phase, task and status events
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! The driver that ties these together lives in [`crate::workflows::schedule`].

pub mod config;
pub(crate) mod context;
pub mod error;
pub mod frontier;
pub mod progress;
pub mod state;
pub mod tasks;
