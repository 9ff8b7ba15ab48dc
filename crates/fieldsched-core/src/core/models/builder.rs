use super::ids::{ItemId, SlotId};
use super::item::{Item, ItemSpec, Team};
use super::problem::{ModelError, Problem};
use super::slot::{Day, Kind, Slot, SlotKey, SlotSpec, StartTime, TimeCell};
use itertools::Itertools;

/// Incrementally assembles a [`Problem`].
///
/// Items are referenced by identifier; runs of whitespace inside identifiers
/// are collapsed so `"CMSA  U13T3 DIV 01"` and `"CMSA U13T3 DIV 01"` name the
/// same item. Slot references made on behalf of an item resolve against the
/// slots of that item's kind.
#[derive(Debug)]
pub struct ProblemBuilder {
    problem: Problem,
}

impl Default for ProblemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemBuilder {
    pub fn new() -> Self {
        Self {
            problem: Problem::default(),
        }
    }

    pub fn name(&mut self, name: &str) -> &mut Self {
        self.problem.name = Some(name.trim().to_string());
        self
    }

    pub fn add_slot(
        &mut self,
        kind: Kind,
        day: Day,
        start: StartTime,
        max: usize,
        min: usize,
    ) -> Result<SlotId, ModelError> {
        let cell = TimeCell::new(day, start);
        let key = SlotKey { kind, cell };
        if self.problem.slot_lookup.contains_key(&key) {
            return Err(ModelError::DuplicateSlot(key));
        }

        let id = self
            .problem
            .slots
            .insert(Slot::new(kind, SlotSpec { cell, max, min }));
        self.problem.slot_lookup.insert(key, id);
        match kind {
            Kind::Game => self.problem.game_slots.push(id),
            Kind::Practice => self.problem.practice_slots.push(id),
        }
        Ok(id)
    }

    pub fn add_game(&mut self, identifier: &str) -> Result<ItemId, ModelError> {
        self.add_item(Kind::Game, identifier)
    }

    pub fn add_practice(&mut self, identifier: &str) -> Result<ItemId, ModelError> {
        self.add_item(Kind::Practice, identifier)
    }

    pub fn add_item(&mut self, kind: Kind, identifier: &str) -> Result<ItemId, ModelError> {
        let identifier = normalize_identifier(identifier);
        if self.problem.item_lookup.contains_key(&identifier) {
            return Err(ModelError::DuplicateItem(identifier));
        }
        let team = Team::from_identifier(&identifier)
            .ok_or_else(|| ModelError::InvalidIdentifier(identifier.clone()))?;

        let id = self
            .problem
            .items
            .insert(Item::new(kind, ItemSpec::new(identifier.clone(), team)));
        self.problem.item_lookup.insert(identifier, id);
        Ok(id)
    }

    pub fn add_incompatibility(&mut self, a: &str, b: &str) -> Result<&mut Self, ModelError> {
        let a = self.resolve_item(a)?;
        let b = self.resolve_item(b)?;
        self.link_incompatible(a, b);
        Ok(self)
    }

    pub fn add_pair(&mut self, a: &str, b: &str) -> Result<&mut Self, ModelError> {
        let a = self.resolve_item(a)?;
        let b = self.resolve_item(b)?;
        if a != b {
            self.spec_mut(a).paired.insert(b);
            self.spec_mut(b).paired.insert(a);
        }
        Ok(self)
    }

    pub fn add_unwanted(
        &mut self,
        item: &str,
        day: Day,
        start: StartTime,
    ) -> Result<&mut Self, ModelError> {
        let item = self.resolve_item(item)?;
        let slot = self.resolve_slot_for(item, day, start)?;
        self.spec_mut(item).unwanted.insert(slot);
        Ok(self)
    }

    pub fn add_preference(
        &mut self,
        item: &str,
        day: Day,
        start: StartTime,
        value: u64,
    ) -> Result<&mut Self, ModelError> {
        let item = self.resolve_item(item)?;
        let slot = self.resolve_slot_for(item, day, start)?;
        self.spec_mut(item).preferences.push((slot, value));
        Ok(self)
    }

    pub fn set_partial_assignment(
        &mut self,
        item: &str,
        day: Day,
        start: StartTime,
    ) -> Result<&mut Self, ModelError> {
        let item = self.resolve_item(item)?;
        let slot = self.resolve_slot_for(item, day, start)?;
        let spec = self.spec_mut(item);
        match spec.fixed_slot {
            Some(existing) if existing != slot => {
                let identifier = spec.identifier.clone();
                let existing = self.problem.slots[existing].key();
                Err(ModelError::ConflictingPartialAssignment {
                    item: identifier,
                    existing,
                })
            }
            _ => {
                spec.fixed_slot = Some(slot);
                Ok(self)
            }
        }
    }

    /// Finalizes the model: adds the implicit game/practice incompatibilities
    /// between items of the same team and links slots sharing a time cell.
    pub fn build(mut self) -> Problem {
        self.derive_team_incompatibilities();
        self.link_cell_partners();
        self.problem
    }

    fn derive_team_incompatibilities(&mut self) {
        let games: Vec<(ItemId, Team)> = self.team_roster(Kind::Game);
        let practices: Vec<(ItemId, Team)> = self.team_roster(Kind::Practice);

        for (game_id, game_team) in &games {
            for (practice_id, practice_team) in &practices {
                let division_matches = match &practice_team.division {
                    None => true,
                    Some(division) => game_team.division.as_ref() == Some(division),
                };
                if game_team.same_age_group(practice_team) && division_matches {
                    self.link_incompatible(*game_id, *practice_id);
                }
            }
        }
    }

    fn link_cell_partners(&mut self) {
        let pairs: Vec<(SlotId, SlotId)> = self
            .problem
            .slots
            .iter()
            .filter_map(|(id, slot)| {
                let other_kind = match slot.kind() {
                    Kind::Game => Kind::Practice,
                    Kind::Practice => Kind::Game,
                };
                let partner_key = SlotKey {
                    kind: other_kind,
                    cell: slot.cell(),
                };
                self.problem
                    .slot_lookup
                    .get(&partner_key)
                    .map(|&partner| (id, partner))
            })
            .collect();

        for (id, partner) in pairs {
            self.problem.cell_partner.insert(id, partner);
        }
    }

    fn team_roster(&self, kind: Kind) -> Vec<(ItemId, Team)> {
        self.problem
            .items
            .iter()
            .filter(|(_, item)| item.kind() == kind)
            .map(|(id, item)| (id, item.team().clone()))
            .collect()
    }

    fn link_incompatible(&mut self, a: ItemId, b: ItemId) {
        self.spec_mut(a).incompatible.insert(b);
        self.spec_mut(b).incompatible.insert(a);
    }

    fn spec_mut(&mut self, id: ItemId) -> &mut ItemSpec {
        self.problem.items[id].spec_mut()
    }

    fn resolve_item(&self, identifier: &str) -> Result<ItemId, ModelError> {
        let identifier = normalize_identifier(identifier);
        self.problem
            .item_lookup
            .get(&identifier)
            .copied()
            .ok_or(ModelError::UnknownItem(identifier))
    }

    fn resolve_slot_for(
        &self,
        item: ItemId,
        day: Day,
        start: StartTime,
    ) -> Result<SlotId, ModelError> {
        let key = SlotKey::new(self.problem.items[item].kind(), day, start);
        self.problem
            .slot_lookup
            .get(&key)
            .copied()
            .ok_or(ModelError::UnknownSlot(key))
    }
}

fn normalize_identifier(identifier: &str) -> String {
    identifier.split_whitespace().join(" ")
}
