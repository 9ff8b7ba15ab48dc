use super::hard_constraints;
use crate::core::models::ids::{ItemId, SlotId};
use crate::core::models::problem::Problem;
use crate::core::models::schedule::ScheduleState;

/// Expands `state` by placing `item` in every legal slot of its kind, in slot
/// declaration order. A fixed item only tries its fixed slot.
///
/// An empty result marks `state` as a dead end.
pub fn branch(problem: &Problem, state: &ScheduleState, item: ItemId) -> Vec<ScheduleState> {
    let Some(item_ref) = problem.item(item) else {
        return Vec::new();
    };

    let fixed = item_ref.spec().fixed_slot();
    let candidates: &[SlotId] = match &fixed {
        Some(slot) => std::slice::from_ref(slot),
        None => problem.slots_of_kind(item_ref.kind()),
    };

    candidates
        .iter()
        .copied()
        .filter(|&slot| hard_constraints::is_legal(problem, state, item, slot))
        .map(|slot| state.with_placement(item, slot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::ProblemBuilder;
    use crate::core::models::slot::{Day, Kind, StartTime};

    fn time(s: &str) -> StartTime {
        s.parse().unwrap()
    }

    #[test]
    fn yields_one_child_per_legal_slot_in_declaration_order() {
        let mut b = ProblemBuilder::new();
        let first = b.add_slot(Kind::Game, Day::Friday, time("8:00"), 1, 0).unwrap();
        let unwanted = b.add_slot(Kind::Game, Day::Monday, time("8:00"), 1, 0).unwrap();
        let third = b.add_slot(Kind::Game, Day::Tuesday, time("8:00"), 1, 0).unwrap();
        b.add_slot(Kind::Practice, Day::Friday, time("8:00"), 1, 0).unwrap();
        let game = b.add_game("CMSA U10 DIV 01").unwrap();
        b.add_unwanted("CMSA U10 DIV 01", Day::Monday, time("8:00"))
            .unwrap();
        let problem = b.build();

        let root = ScheduleState::empty(&problem);
        let children = branch(&problem, &root, game);
        let slots: Vec<_> = children.iter().map(|c| c.slot_of(game).unwrap()).collect();
        assert_eq!(slots, vec![first, third]);
        assert!(!slots.contains(&unwanted));
        assert!(children.iter().all(|c| c.is_complete()));
        assert!(root.remaining().contains(&game));
    }

    #[test]
    fn fixed_items_only_try_their_fixed_slot() {
        let mut b = ProblemBuilder::new();
        b.add_slot(Kind::Game, Day::Friday, time("8:00"), 1, 0).unwrap();
        let fixed = b.add_slot(Kind::Game, Day::Monday, time("8:00"), 1, 0).unwrap();
        let game = b.add_game("CMSA U10 DIV 01").unwrap();
        b.set_partial_assignment("CMSA U10 DIV 01", Day::Monday, time("8:00"))
            .unwrap();
        let problem = b.build();

        let children = branch(&problem, &ScheduleState::empty(&problem), game);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].slot_of(game), Some(fixed));
    }

    #[test]
    fn no_legal_slot_is_a_dead_end() {
        let mut b = ProblemBuilder::new();
        let slot = b.add_slot(Kind::Game, Day::Friday, time("8:00"), 1, 0).unwrap();
        let a = b.add_game("CMSA U10 DIV 01").unwrap();
        let c = b.add_game("CMSA U10 DIV 02").unwrap();
        let problem = b.build();

        let full = ScheduleState::empty(&problem).with_placement(a, slot);
        assert!(branch(&problem, &full, c).is_empty());
    }
}
