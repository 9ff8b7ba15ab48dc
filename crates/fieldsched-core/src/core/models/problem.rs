use super::ids::{ItemId, SlotId};
use super::item::Item;
use super::slot::{Kind, Slot, SlotKey};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Duplicate {0}")]
    DuplicateSlot(SlotKey),

    #[error("Duplicate item identifier '{0}'")]
    DuplicateItem(String),

    #[error("Item identifier '{0}' must start with an organization and an age group")]
    InvalidIdentifier(String),

    #[error("Unknown item '{0}'")]
    UnknownItem(String),

    #[error("Unknown {0}")]
    UnknownSlot(SlotKey),

    #[error("Item '{item}' already has a partial assignment to {existing}")]
    ConflictingPartialAssignment { item: String, existing: SlotKey },
}

/// The immutable entity model: every slot and item of one scheduling problem,
/// with all relations resolved to ids.
///
/// Built once through [`ProblemBuilder`](super::builder::ProblemBuilder) and
/// shared by reference with the search engine.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    pub(crate) name: Option<String>,
    pub(crate) slots: SlotMap<SlotId, Slot>,
    pub(crate) items: SlotMap<ItemId, Item>,
    pub(crate) slot_lookup: HashMap<SlotKey, SlotId>,
    pub(crate) item_lookup: HashMap<String, ItemId>,
    pub(crate) game_slots: Vec<SlotId>,
    pub(crate) practice_slots: Vec<SlotId>,
    /// The slot of the other kind that shares a time cell, if one exists.
    pub(crate) cell_partner: SecondaryMap<SlotId, SlotId>,
}

impl Problem {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Iterates slots in declaration order.
    pub fn slots_iter(&self) -> impl Iterator<Item = (SlotId, &Slot)> {
        self.slots.iter()
    }

    /// Iterates items in declaration order.
    pub fn items_iter(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items.iter()
    }

    pub fn slots_of_kind(&self, kind: Kind) -> &[SlotId] {
        match kind {
            Kind::Game => &self.game_slots,
            Kind::Practice => &self.practice_slots,
        }
    }

    pub fn find_slot(&self, key: &SlotKey) -> Option<SlotId> {
        self.slot_lookup.get(key).copied()
    }

    pub fn find_item(&self, identifier: &str) -> Option<ItemId> {
        self.item_lookup.get(identifier).copied()
    }

    pub fn cell_partner(&self, slot: SlotId) -> Option<SlotId> {
        self.cell_partner.get(slot).copied()
    }

    pub fn identifier(&self, id: ItemId) -> &str {
        self.items.get(id).map_or("<unknown item>", Item::identifier)
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn num_items_of_kind(&self, kind: Kind) -> usize {
        self.items.values().filter(|item| item.kind() == kind).count()
    }
}
