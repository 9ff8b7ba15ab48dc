use crate::core::models::ids::{ItemId, SlotId};
use crate::core::models::problem::Problem;
use crate::core::models::schedule::ScheduleState;
use crate::core::models::slot::Kind;
use itertools::Itertools;
use thiserror::Error;

/// The first hard constraint a placement would break.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("item or slot does not belong to this problem")]
    UnknownEntity,
    #[error("item is already placed")]
    AlreadyPlaced,
    #[error("a {item_kind} cannot occupy a {slot_kind} slot")]
    KindMismatch { item_kind: Kind, slot_kind: Kind },
    #[error("slot is at its capacity of {max}")]
    Capacity { max: usize, occupants: Vec<ItemId> },
    #[error("slot is unwanted by the item")]
    Unwanted,
    #[error("an incompatible item already occupies this time")]
    Incompatible { other: ItemId },
    #[error("item is fixed to another slot")]
    FixedElsewhere { fixed: SlotId },
}

impl Violation {
    /// Renders the violation with the identifiers of the other items involved.
    pub fn describe(&self, problem: &Problem) -> String {
        match self {
            Violation::Capacity { max, occupants } => format!(
                "slot is at its capacity of {} (occupied by {})",
                max,
                occupants
                    .iter()
                    .map(|&id| format!("'{}'", problem.identifier(id)))
                    .join(", ")
            ),
            Violation::Incompatible { other } => format!(
                "incompatible with '{}', which already occupies this time",
                problem.identifier(*other)
            ),
            Violation::FixedElsewhere { fixed } => match problem.slot(*fixed) {
                Some(slot) => format!("item is fixed to {}", slot),
                None => self.to_string(),
            },
            _ => self.to_string(),
        }
    }
}

/// Checks whether `item` may be appended to `slot` in `state`.
///
/// Incompatibility is judged over the slot's time cell: items in the
/// other-kind slot sharing the same day and start time count as co-present.
pub fn check(
    problem: &Problem,
    state: &ScheduleState,
    item: ItemId,
    slot: SlotId,
) -> Result<(), Violation> {
    let (Some(item_ref), Some(slot_ref)) = (problem.item(item), problem.slot(slot)) else {
        return Err(Violation::UnknownEntity);
    };
    let spec = item_ref.spec();

    if state.is_placed(item) {
        return Err(Violation::AlreadyPlaced);
    }

    if item_ref.kind() != slot_ref.kind() {
        return Err(Violation::KindMismatch {
            item_kind: item_ref.kind(),
            slot_kind: slot_ref.kind(),
        });
    }

    let occupants = state.occupants(slot);
    if occupants.len() >= slot_ref.max() {
        return Err(Violation::Capacity {
            max: slot_ref.max(),
            occupants: occupants.to_vec(),
        });
    }

    if spec.is_unwanted(slot) {
        return Err(Violation::Unwanted);
    }

    let partner_occupants = problem
        .cell_partner(slot)
        .map_or(&[][..], |partner| state.occupants(partner));
    let conflict = occupants
        .iter()
        .chain(partner_occupants)
        .copied()
        .find(|&other| {
            spec.is_incompatible_with(other)
                || problem
                    .item(other)
                    .is_some_and(|o| o.spec().is_incompatible_with(item))
        });
    if let Some(other) = conflict {
        return Err(Violation::Incompatible { other });
    }

    match spec.fixed_slot() {
        Some(fixed) if fixed != slot => Err(Violation::FixedElsewhere { fixed }),
        _ => Ok(()),
    }
}

#[inline]
pub fn is_legal(problem: &Problem, state: &ScheduleState, item: ItemId, slot: SlotId) -> bool {
    check(problem, state, item, slot).is_ok()
}

/// Verifies that a complete or partial state satisfies every hard constraint,
/// returning the first offending placement.
pub fn audit(problem: &Problem, state: &ScheduleState) -> Result<(), (ItemId, Violation)> {
    for (slot, occupants) in state.assignments() {
        let Some(slot_ref) = problem.slot(slot) else {
            match occupants.first() {
                Some(&item) => return Err((item, Violation::UnknownEntity)),
                None => continue,
            }
        };
        if occupants.len() > slot_ref.max() {
            return Err((
                occupants[slot_ref.max()],
                Violation::Capacity {
                    max: slot_ref.max(),
                    occupants: occupants[..slot_ref.max()].to_vec(),
                },
            ));
        }

        let partner_occupants = problem
            .cell_partner(slot)
            .map_or(&[][..], |partner| state.occupants(partner));

        for &item in occupants {
            let Some(item_ref) = problem.item(item) else {
                return Err((item, Violation::UnknownEntity));
            };
            let spec = item_ref.spec();
            if item_ref.kind() != slot_ref.kind() {
                return Err((
                    item,
                    Violation::KindMismatch {
                        item_kind: item_ref.kind(),
                        slot_kind: slot_ref.kind(),
                    },
                ));
            }
            if spec.is_unwanted(slot) {
                return Err((item, Violation::Unwanted));
            }
            if let Some(fixed) = spec.fixed_slot().filter(|&fixed| fixed != slot) {
                return Err((item, Violation::FixedElsewhere { fixed }));
            }
            let conflict = occupants
                .iter()
                .chain(partner_occupants)
                .copied()
                .filter(|&other| other != item)
                .find(|&other| spec.is_incompatible_with(other));
            if let Some(other) = conflict {
                return Err((item, Violation::Incompatible { other }));
            }
        }
    }

    Ok(())
}
