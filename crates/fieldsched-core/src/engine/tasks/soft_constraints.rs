use crate::core::models::ids::ItemId;
use crate::core::models::item::Item;
use crate::core::models::problem::Problem;
use crate::core::models::schedule::ScheduleState;
use crate::core::models::slot::Kind;
use crate::core::models::weights::Weights;
use crate::engine::error::EngineError;
use itertools::Itertools;
use tracing::{instrument, trace};

/// The four soft-constraint contributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PenaltyBreakdown {
    pub min_filled: u64,
    pub preference: u64,
    pub pair: u64,
    pub section: u64,
}

impl PenaltyBreakdown {
    #[inline]
    pub fn total(&self) -> u64 {
        self.min_filled
            .saturating_add(self.preference)
            .saturating_add(self.pair)
            .saturating_add(self.section)
    }

    /// Scales each contribution by its weight.
    pub fn weighted(&self, weights: &Weights) -> Self {
        Self {
            min_filled: self.min_filled.saturating_mul(weights.min_filled_weight),
            preference: self.preference.saturating_mul(weights.pref_weight),
            pair: self.pair.saturating_mul(weights.pair_weight),
            section: self.section.saturating_mul(weights.sec_diff_weight),
        }
    }
}

/// The evaluation of one complete schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CostReport {
    /// Penalties before the `*_weight` scaling.
    pub raw: PenaltyBreakdown,
    pub weighted: PenaltyBreakdown,
    pub total: u64,
}

impl CostReport {
    fn from_raw(raw: PenaltyBreakdown, weights: &Weights) -> Self {
        let weighted = raw.weighted(weights);
        Self {
            raw,
            weighted,
            total: weighted.total(),
        }
    }
}

/// Scores a complete schedule.
///
/// # Errors
///
/// Returns [`EngineError::IncompleteSchedule`] if any item is still unplaced.
#[instrument(skip_all, name = "soft_constraints_task")]
pub fn evaluate(
    problem: &Problem,
    state: &ScheduleState,
    weights: &Weights,
) -> Result<CostReport, EngineError> {
    if !state.is_complete() {
        return Err(EngineError::IncompleteSchedule {
            remaining: state.remaining().len(),
        });
    }
    let report = CostReport::from_raw(certain_penalties(problem, state, weights), weights);
    trace!(total = report.total, "Schedule evaluated.");
    Ok(report)
}

/// A cost no completion of `state` can undercut.
///
/// Only penalties already fixed by the placements made so far are counted,
/// so the value equals [`evaluate`]'s total on a complete state.
pub fn lower_bound(problem: &Problem, state: &ScheduleState, weights: &Weights) -> u64 {
    certain_penalties(problem, state, weights)
        .weighted(weights)
        .total()
}

fn certain_penalties(
    problem: &Problem,
    state: &ScheduleState,
    weights: &Weights,
) -> PenaltyBreakdown {
    PenaltyBreakdown {
        min_filled: min_filled_penalty(problem, state, weights),
        preference: preference_penalty(problem, state),
        pair: pair_penalty(problem, state, weights),
        section: section_penalty(problem, state, weights),
    }
}

/// Slots that stay under their minimum even if every remaining item of the
/// slot's kind landed there.
fn min_filled_penalty(problem: &Problem, state: &ScheduleState, weights: &Weights) -> u64 {
    let (remaining_games, remaining_practices) =
        state
            .remaining()
            .iter()
            .fold((0usize, 0usize), |(g, p), &id| match problem.item(id) {
                Some(Item::Game(_)) => (g + 1, p),
                Some(Item::Practice(_)) => (g, p + 1),
                None => (g, p),
            });

    problem
        .slots_iter()
        .map(|(slot_id, slot)| {
            let (reachable, penalty) = match slot.kind() {
                Kind::Game => (remaining_games, weights.game_min_pen),
                Kind::Practice => (remaining_practices, weights.practice_min_pen),
            };
            if state.occupancy(slot_id) + reachable < slot.min() {
                penalty
            } else {
                0
            }
        })
        .fold(0u64, u64::saturating_add)
}

fn preference_penalty(problem: &Problem, state: &ScheduleState) -> u64 {
    state
        .placements()
        .filter_map(|(item, slot)| {
            let spec = problem.item(item)?.spec();
            let best = spec.best_preference()?;
            Some(best - spec.preference_for(slot).unwrap_or(0))
        })
        .fold(0u64, u64::saturating_add)
}

fn pair_penalty(problem: &Problem, state: &ScheduleState, weights: &Weights) -> u64 {
    let cell_of = |item: ItemId| {
        state
            .slot_of(item)
            .and_then(|slot| problem.slot(slot))
            .map(|slot| slot.cell())
    };

    let split_pairs = problem
        .items_iter()
        .flat_map(|(a, item)| {
            item.spec()
                .paired_with()
                .iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
        .filter(|&(a, b)| match (cell_of(a), cell_of(b)) {
            (Some(cell_a), Some(cell_b)) => cell_a != cell_b,
            _ => false,
        })
        .count() as u64;

    split_pairs.saturating_mul(weights.not_paired_pen)
}

/// Games of the same organization and age group but different divisions
/// sharing a slot.
fn section_penalty(problem: &Problem, state: &ScheduleState, weights: &Weights) -> u64 {
    let clashes = problem
        .slots_of_kind(Kind::Game)
        .iter()
        .flat_map(move |&slot| {
            state
                .occupants(slot)
                .iter()
                .filter_map(move |&id| problem.item(id).map(Item::team))
                .tuple_combinations()
                .filter(|(a, b)| a.same_age_group(b) && a.division != b.division)
        })
        .count() as u64;

    clashes.saturating_mul(weights.section_pen)
}
