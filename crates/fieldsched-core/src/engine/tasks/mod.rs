//! Tasks for schedule search.
//!
//! Tasks are the computational units the search driver composes: validating
//! a placement against the hard constraints, scoring schedules against the
//! soft constraints, choosing the next item to place, and branching on it.
//! Each is a pure function of the problem and a schedule state.

pub mod branching;
pub mod hard_constraints;
pub mod selection;
pub mod soft_constraints;
