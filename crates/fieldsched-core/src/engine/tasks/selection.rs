use crate::core::models::ids::ItemId;
use crate::core::models::problem::Problem;
use crate::core::models::schedule::ScheduleState;
use std::cmp::Reverse;

/// Picks the next item to branch on, or `None` when nothing remains.
///
/// The first non-empty rule wins:
/// 1. items with preferences, strongest best preference first;
/// 2. items in a pairing relation;
/// 3. any item.
///
/// Ties are broken by identifier so the choice never depends on id order.
pub fn select_item(problem: &Problem, state: &ScheduleState) -> Option<ItemId> {
    let remaining = move || {
        state.remaining().iter().filter_map(move |&id| {
            problem
                .item(id)
                .map(|item| (id, item.identifier(), item.spec()))
        })
    };

    remaining()
        .filter_map(|(id, identifier, spec)| {
            spec.best_preference()
                .map(|best| (Reverse(best), identifier, id))
        })
        .min()
        .or_else(|| {
            remaining()
                .filter(|(_, _, spec)| !spec.paired_with().is_empty())
                .map(|(id, identifier, _)| (Reverse(0), identifier, id))
                .min()
        })
        .or_else(|| {
            remaining()
                .map(|(id, identifier, _)| (Reverse(0), identifier, id))
                .min()
        })
        .map(|(_, _, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::ProblemBuilder;
    use crate::core::models::slot::{Day, Kind};

    fn problem() -> Problem {
        let mut b = ProblemBuilder::new();
        let t = |s: &str| s.parse().unwrap();
        b.add_slot(Kind::Game, Day::Monday, t("9:00"), 4, 0).unwrap();
        b.add_slot(Kind::Game, Day::Tuesday, t("9:00"), 4, 0).unwrap();
        b.add_game("ZZZ U10 DIV 01").unwrap();
        b.add_game("AAA U10 DIV 01").unwrap();
        b.add_game("MMM U10 DIV 01").unwrap();
        b.add_game("BBB U10 DIV 01").unwrap();
        b.add_game("CCC U10 DIV 01").unwrap();
        b.add_preference("ZZZ U10 DIV 01", Day::Monday, t("9:00"), 8)
            .unwrap();
        b.add_preference("MMM U10 DIV 01", Day::Tuesday, t("9:00"), 8)
            .unwrap();
        b.add_preference("AAA U10 DIV 01", Day::Monday, t("9:00"), 3)
            .unwrap();
        b.add_pair("CCC U10 DIV 01", "BBB U10 DIV 01").unwrap();
        b.build()
    }

    fn name(problem: &Problem, id: Option<ItemId>) -> &str {
        problem.identifier(id.unwrap())
    }

    #[test]
    fn follows_preference_then_pair_then_identifier_order() {
        let problem = problem();
        let slot = problem.slots_of_kind(Kind::Game)[0];
        let mut state = ScheduleState::empty(&problem);
        let mut picked = Vec::new();
        while let Some(id) = select_item(&problem, &state) {
            picked.push(name(&problem, Some(id)).to_string());
            state = state.with_placement(id, slot);
        }
        assert_eq!(
            picked,
            vec![
                "MMM U10 DIV 01",
                "ZZZ U10 DIV 01",
                "AAA U10 DIV 01",
                "BBB U10 DIV 01",
                "CCC U10 DIV 01",
            ]
        );
    }

    #[test]
    fn returns_none_when_nothing_remains() {
        let problem = ProblemBuilder::new().build();
        assert_eq!(select_item(&problem, &ScheduleState::empty(&problem)), None);
    }
}
