//! # Core Module
//!
//! The stateless foundation of fieldsched: the entity model describing a
//! league-scheduling problem and the text format it is read from.
//!
//! ## Architecture
//!
//! - **Problem Representation** ([`models`]) - Slots, games, practices, their relations,
//!   the partial-schedule state explored by the search, and soft-constraint weights
//! - **File I/O** ([`io`]) - Reading problem descriptions and writing finished schedules
//!
//! Everything here is immutable once built, except [`models::schedule::ScheduleState`],
//! which the engine derives by cloning rather than mutating.

pub mod io;
pub mod models;
