use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Half-hour ticks from 8:00 to 21:00. There is no tick 20: 18:00 is not a
/// schedulable start time.
#[rustfmt::skip]
static TIME_TICKS: Map<&'static str, u8> = phf_map! {
    "8:00" => 0,   "8:30" => 1,   "9:00" => 2,   "9:30" => 3,
    "10:00" => 4,  "10:30" => 5,  "11:00" => 6,  "11:30" => 7,
    "12:00" => 8,  "12:30" => 9,  "13:00" => 10, "13:30" => 11,
    "14:00" => 12, "14:30" => 13, "15:00" => 14, "15:30" => 15,
    "16:00" => 16, "16:30" => 17, "17:00" => 18, "17:30" => 19,
    "18:30" => 21, "19:00" => 22, "19:30" => 23, "20:00" => 24,
    "20:30" => 25, "21:00" => 26,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Game,
    Practice,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Kind::Game => "game",
                Kind::Practice => "practice",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Friday,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid day string (expected MO, TU or FR)")]
pub struct ParseDayError;

impl FromStr for Day {
    type Err = ParseDayError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MO" => Ok(Day::Monday),
            "TU" => Ok(Day::Tuesday),
            "FR" => Ok(Day::Friday),
            _ => Err(ParseDayError),
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Day::Monday => "MO",
                Day::Tuesday => "TU",
                Day::Friday => "FR",
            }
        )
    }
}

/// A start time expressed as a half-hour tick index counted from 8:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StartTime(u8);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid start time string (expected H:MM between 8:00 and 21:00, excluding 18:00)")]
pub struct ParseStartTimeError;

impl StartTime {
    pub const LAST_TICK: u8 = 26;
    pub const SKIPPED_TICK: u8 = 20;

    pub fn from_tick(tick: u8) -> Option<Self> {
        (tick <= Self::LAST_TICK && tick != Self::SKIPPED_TICK).then_some(Self(tick))
    }

    pub fn tick(self) -> u8 {
        self.0
    }

    pub fn hour(self) -> u8 {
        8 + self.0 / 2
    }

    pub fn minute(self) -> u8 {
        (self.0 % 2) * 30
    }
}

impl FromStr for StartTime {
    type Err = ParseStartTimeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // "08:00" and "8:00" name the same tick.
        let normalized = match s.strip_prefix('0') {
            Some(rest) if rest.len() == 4 => rest,
            _ => s,
        };
        TIME_TICKS
            .get(normalized)
            .copied()
            .map(StartTime)
            .ok_or(ParseStartTimeError)
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour(), self.minute())
    }
}

/// A (day, start time) pair. Game and practice slots may share a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeCell {
    pub day: Day,
    pub start: StartTime,
}

impl TimeCell {
    pub fn new(day: Day, start: StartTime) -> Self {
        Self { day, start }
    }
}

impl fmt::Display for TimeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.day, self.start)
    }
}

/// The identity of a slot: two slots are the same slot iff their keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub kind: Kind,
    pub cell: TimeCell,
}

impl SlotKey {
    pub fn new(kind: Kind, day: Day, start: StartTime) -> Self {
        Self {
            kind,
            cell: TimeCell::new(day, start),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} slot [{}]", self.kind, self.cell)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    pub cell: TimeCell,
    pub max: usize, // Hard capacity
    pub min: usize, // Desired minimum fill, enforced softly
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Game(SlotSpec),
    Practice(SlotSpec),
}

impl Slot {
    pub fn new(kind: Kind, spec: SlotSpec) -> Self {
        match kind {
            Kind::Game => Slot::Game(spec),
            Kind::Practice => Slot::Practice(spec),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Slot::Game(_) => Kind::Game,
            Slot::Practice(_) => Kind::Practice,
        }
    }

    pub fn spec(&self) -> &SlotSpec {
        match self {
            Slot::Game(spec) | Slot::Practice(spec) => spec,
        }
    }

    pub fn key(&self) -> SlotKey {
        SlotKey {
            kind: self.kind(),
            cell: self.spec().cell,
        }
    }

    pub fn cell(&self) -> TimeCell {
        self.spec().cell
    }

    pub fn max(&self) -> usize {
        self.spec().max
    }

    pub fn min(&self) -> usize {
        self.spec().min
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
