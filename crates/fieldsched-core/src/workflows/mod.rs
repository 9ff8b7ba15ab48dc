//! # Workflows Module
//!
//! High-level entry points that run a complete scheduling job.
//!
//! A workflow takes a validated [`Problem`](crate::core::models::problem::Problem)
//! and a [`SearchConfig`](crate::engine::config::SearchConfig), applies the
//! partial assignments, drives the search and returns the ranked solutions
//! together with search statistics.
//!
//! - **Schedule Workflow** ([`schedule`]) - Root preparation, batched parallel
//!   expansion with pruning against the solution pool, and final ranking.

pub mod schedule;
