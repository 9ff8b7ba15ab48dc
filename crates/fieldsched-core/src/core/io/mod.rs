//! Provides input/output for scheduling problems.
//!
//! Problems are read from the sectioned text format used by league
//! coordinators, and finished schedules are written back as plain text
//! listings. Both go through the [`traits::ProblemFile`] interface.

pub mod text;
pub mod traits;
