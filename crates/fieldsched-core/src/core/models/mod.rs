//! # Core Models Module
//!
//! Data structures describing one league-scheduling problem and the partial
//! schedules explored while solving it.
//!
//! ## Key Components
//!
//! - [`slot`] - Days, half-hour start times, and game/practice slots with capacity bounds
//! - [`item`] - Games and practices, their teams, and their constraint relations
//! - [`problem`] - The immutable entity model with id lookups
//! - [`builder`] - Incremental construction of a [`problem::Problem`], including derived relations
//! - [`schedule`] - The search-tree node: slot occupancy and unplaced items
//! - [`weights`] - Soft-constraint weights and penalties
//! - [`ids`] - Key types for slots and items
//!
//! ## Usage
//!
//! ```ignore
//! use fieldsched::core::models::{builder::ProblemBuilder, slot::{Day, Kind}};
//!
//! let mut builder = ProblemBuilder::new();
//! builder.add_slot(Kind::Game, Day::Monday, "9:00".parse()?, 2, 1)?;
//! builder.add_game("CMSA U13T3 DIV 01")?;
//! let problem = builder.build();
//! ```

pub mod builder;
pub mod ids;
pub mod item;
pub mod problem;
pub mod schedule;
pub mod slot;
pub mod weights;
