use super::ids::{ItemId, SlotId};
use super::problem::Problem;
use slotmap::SecondaryMap;
use std::collections::BTreeSet;

/// One node of the search tree: which items sit in which slot, and which
/// items are still waiting for a slot.
///
/// Children are derived with [`ScheduleState::with_placement`], which clones;
/// a state handed to the search is never mutated again.
#[derive(Debug, Clone, Default)]
pub struct ScheduleState {
    assignments: SecondaryMap<SlotId, Vec<ItemId>>, // Occupants per slot, in placement order
    placements: SecondaryMap<ItemId, SlotId>,       // Reverse index of `assignments`
    remaining: BTreeSet<ItemId>,                    // Items not yet placed
}

impl ScheduleState {
    /// Creates a state with every slot empty and every item unplaced.
    pub fn empty(problem: &Problem) -> Self {
        let mut assignments = SecondaryMap::with_capacity(problem.num_slots());
        for (slot_id, _) in problem.slots_iter() {
            assignments.insert(slot_id, Vec::new());
        }
        Self {
            assignments,
            placements: SecondaryMap::with_capacity(problem.num_items()),
            remaining: problem.items_iter().map(|(id, _)| id).collect(),
        }
    }

    pub fn occupants(&self, slot: SlotId) -> &[ItemId] {
        self.assignments.get(slot).map_or(&[], Vec::as_slice)
    }

    pub fn occupancy(&self, slot: SlotId) -> usize {
        self.occupants(slot).len()
    }

    pub fn slot_of(&self, item: ItemId) -> Option<SlotId> {
        self.placements.get(item).copied()
    }

    pub fn is_placed(&self, item: ItemId) -> bool {
        self.placements.contains_key(item)
    }

    pub fn remaining(&self) -> &BTreeSet<ItemId> {
        &self.remaining
    }

    pub fn num_placed(&self) -> usize {
        self.placements.len()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Iterates `(item, slot)` for every placed item, ordered by item id.
    pub fn placements(&self) -> impl Iterator<Item = (ItemId, SlotId)> + '_ {
        self.placements.iter().map(|(item, &slot)| (item, slot))
    }

    /// Iterates every slot with its occupants.
    pub fn assignments(&self) -> impl Iterator<Item = (SlotId, &[ItemId])> {
        self.assignments
            .iter()
            .map(|(slot, items)| (slot, items.as_slice()))
    }

    /// Returns a copy of this state with `item` appended to `slot`.
    ///
    /// Legality is the caller's concern; see the hard-constraint validator.
    pub fn with_placement(&self, item: ItemId, slot: SlotId) -> Self {
        let mut child = self.clone();
        child.place(item, slot);
        child
    }

    /// A canonical listing of the placements, independent of the order in
    /// which items were appended to their slots.
    pub fn signature(&self) -> Vec<(ItemId, SlotId)> {
        self.placements().collect()
    }

    pub(crate) fn place(&mut self, item: ItemId, slot: SlotId) {
        self.remaining.remove(&item);
        self.placements.insert(item, slot);
        match self.assignments.get_mut(slot) {
            Some(occupants) => occupants.push(item),
            None => {
                self.assignments.insert(slot, vec![item]);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn occupants_mut(&mut self, slot: SlotId) -> Option<&mut Vec<ItemId>> {
        self.assignments.get_mut(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::ProblemBuilder;
    use crate::core::models::slot::{Day, Kind};

    fn small_problem() -> (Problem, SlotId, ItemId, ItemId) {
        let mut builder = ProblemBuilder::new();
        let slot = builder
            .add_slot(Kind::Game, Day::Monday, "9:00".parse().unwrap(), 2, 1)
            .unwrap();
        let a = builder.add_game("CMSA U13T3 DIV 01").unwrap();
        let b = builder.add_game("CMSA U13T3 DIV 02").unwrap();
        (builder.build(), slot, a, b)
    }

    #[test]
    fn empty_state_has_every_item_remaining() {
        let (problem, slot, a, b) = small_problem();
        let state = ScheduleState::empty(&problem);
        assert_eq!(state.remaining().len(), 2);
        assert!(state.remaining().contains(&a) && state.remaining().contains(&b));
        assert_eq!(state.occupancy(slot), 0);
        assert!(!state.is_complete());
    }

    #[test]
    fn with_placement_leaves_the_parent_untouched() {
        let (problem, slot, a, _) = small_problem();
        let parent = ScheduleState::empty(&problem);
        let child = parent.with_placement(a, slot);

        assert_eq!(parent.occupancy(slot), 0);
        assert!(!parent.is_placed(a));
        assert_eq!(child.occupants(slot), &[a]);
        assert_eq!(child.slot_of(a), Some(slot));
        assert!(!child.remaining().contains(&a));
        assert_eq!(child.num_placed(), 1);
    }

    #[test]
    fn signature_ignores_order_within_a_slot() {
        let (problem, slot, a, b) = small_problem();
        let root = ScheduleState::empty(&problem);
        let ab = root.with_placement(a, slot).with_placement(b, slot);
        let ba = root.with_placement(b, slot).with_placement(a, slot);

        assert_ne!(ab.occupants(slot), ba.occupants(slot));
        assert_eq!(ab.signature(), ba.signature());
        assert!(ab.is_complete() && ba.is_complete());
    }
}
