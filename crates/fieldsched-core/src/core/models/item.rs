use super::ids::{ItemId, SlotId};
use super::slot::Kind;
use std::collections::BTreeSet;
use std::fmt;

const DIVISION_MARKER: &str = "DIV";

/// The team an item belongs to, decoded from its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Team {
    pub organization: String,
    pub age_group: String,
    pub division: Option<String>, // `None` covers every division of the age group
}

impl Team {
    /// Decodes `ORG AGE [DIV nn] ...` into a team. Returns `None` when the
    /// identifier has fewer than two words or a dangling `DIV` marker.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let words: Vec<&str> = identifier.split_whitespace().collect();
        let (organization, age_group) = match words.as_slice() {
            [org, age, ..] => (*org, *age),
            _ => return None,
        };
        let division = match words.get(2) {
            Some(&DIVISION_MARKER) => Some(words.get(3)?.to_string()),
            _ => None,
        };
        Some(Self {
            organization: organization.to_string(),
            age_group: age_group.to_string(),
            division,
        })
    }

    pub fn same_age_group(&self, other: &Team) -> bool {
        self.organization == other.organization && self.age_group == other.age_group
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub identifier: String,
    pub team: Team,
    pub(crate) incompatible: BTreeSet<ItemId>,
    pub(crate) unwanted: BTreeSet<SlotId>,
    pub(crate) preferences: Vec<(SlotId, u64)>,
    pub(crate) paired: BTreeSet<ItemId>,
    pub(crate) fixed_slot: Option<SlotId>,
}

impl ItemSpec {
    pub(crate) fn new(identifier: String, team: Team) -> Self {
        Self {
            identifier,
            team,
            incompatible: BTreeSet::new(),
            unwanted: BTreeSet::new(),
            preferences: Vec::new(),
            paired: BTreeSet::new(),
            fixed_slot: None,
        }
    }

    pub fn incompatible_with(&self) -> &BTreeSet<ItemId> {
        &self.incompatible
    }

    pub fn is_incompatible_with(&self, other: ItemId) -> bool {
        self.incompatible.contains(&other)
    }

    pub fn unwanted_slots(&self) -> &BTreeSet<SlotId> {
        &self.unwanted
    }

    pub fn is_unwanted(&self, slot: SlotId) -> bool {
        self.unwanted.contains(&slot)
    }

    pub fn preferences(&self) -> &[(SlotId, u64)] {
        &self.preferences
    }

    /// The highest preference value this item declares, if any.
    pub fn best_preference(&self) -> Option<u64> {
        self.preferences.iter().map(|&(_, value)| value).max()
    }

    /// The value this item attaches to `slot`. Repeated entries for the same
    /// slot resolve to the largest one.
    pub fn preference_for(&self, slot: SlotId) -> Option<u64> {
        self.preferences
            .iter()
            .filter(|&&(s, _)| s == slot)
            .map(|&(_, value)| value)
            .max()
    }

    pub fn paired_with(&self) -> &BTreeSet<ItemId> {
        &self.paired
    }

    pub fn fixed_slot(&self) -> Option<SlotId> {
        self.fixed_slot
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Game(ItemSpec),
    Practice(ItemSpec),
}

impl Item {
    pub(crate) fn new(kind: Kind, spec: ItemSpec) -> Self {
        match kind {
            Kind::Game => Item::Game(spec),
            Kind::Practice => Item::Practice(spec),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Item::Game(_) => Kind::Game,
            Item::Practice(_) => Kind::Practice,
        }
    }

    pub fn spec(&self) -> &ItemSpec {
        match self {
            Item::Game(spec) | Item::Practice(spec) => spec,
        }
    }

    pub(crate) fn spec_mut(&mut self) -> &mut ItemSpec {
        match self {
            Item::Game(spec) | Item::Practice(spec) => spec,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.spec().identifier
    }

    pub fn team(&self) -> &Team {
        &self.spec().team
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.identifier())
    }
}
