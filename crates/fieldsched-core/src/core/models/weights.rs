use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weights and per-violation penalties for the soft-constraint evaluator.
///
/// The four `*_weight` fields scale the penalty terms relative to each other;
/// the four `*_pen` fields are the base penalty for a single violation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Weights {
    pub min_filled_weight: u64,
    pub pref_weight: u64,
    pub pair_weight: u64,
    pub sec_diff_weight: u64,
    pub game_min_pen: u64,
    pub practice_min_pen: u64,
    pub not_paired_pen: u64,
    pub section_pen: u64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeightsError {
    #[error("Expected {expected} weights and penalties, found {found}")]
    WrongCount { expected: usize, found: usize },

    #[error("Invalid value '{value}' for {name}: must be a non-negative integer")]
    InvalidValue { name: &'static str, value: String },
}

impl Weights {
    /// Field names in the conventional positional order.
    pub const FIELD_NAMES: [&'static str; 8] = [
        "min-filled-weight",
        "pref-weight",
        "pair-weight",
        "sec-diff-weight",
        "game-min-pen",
        "practice-min-pen",
        "not-paired-pen",
        "section-pen",
    ];

    /// Parses the eight values in positional order:
    /// `minFilled pref pair secDiff gameMin practiceMin notPaired section`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, WeightsError> {
        if args.len() != Self::FIELD_NAMES.len() {
            return Err(WeightsError::WrongCount {
                expected: Self::FIELD_NAMES.len(),
                found: args.len(),
            });
        }

        let mut weights = Self::default();
        for (name, raw) in Self::FIELD_NAMES.iter().zip(args) {
            weights.set(name, raw.as_ref())?;
        }
        Ok(weights)
    }

    /// Sets one field by its kebab-case name from a textual value.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), WeightsError> {
        let field = Self::FIELD_NAMES
            .iter()
            .copied()
            .find(|&known| known == name)
            .ok_or_else(|| WeightsError::InvalidValue {
                name: "weight name",
                value: name.to_string(),
            })?;
        let value: u64 = raw.trim().parse().map_err(|_| WeightsError::InvalidValue {
            name: field,
            value: raw.to_string(),
        })?;

        let slot = match field {
            "min-filled-weight" => &mut self.min_filled_weight,
            "pref-weight" => &mut self.pref_weight,
            "pair-weight" => &mut self.pair_weight,
            "sec-diff-weight" => &mut self.sec_diff_weight,
            "game-min-pen" => &mut self.game_min_pen,
            "practice-min-pen" => &mut self.practice_min_pen,
            "not-paired-pen" => &mut self.not_paired_pen,
            _ => &mut self.section_pen,
        };
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_args_reads_values_in_positional_order() {
        let weights = Weights::from_args(&["1", "2", "3", "4", "5", "6", "7", "8"]).unwrap();
        assert_eq!(
            weights,
            Weights {
                min_filled_weight: 1,
                pref_weight: 2,
                pair_weight: 3,
                sec_diff_weight: 4,
                game_min_pen: 5,
                practice_min_pen: 6,
                not_paired_pen: 7,
                section_pen: 8,
            }
        );
    }

    #[test]
    fn from_args_rejects_negative_and_non_numeric_values() {
        let err = Weights::from_args(&["1", "-2", "3", "4", "5", "6", "7", "8"]).unwrap_err();
        assert_eq!(
            err,
            WeightsError::InvalidValue {
                name: "pref-weight",
                value: "-2".into()
            }
        );

        let err = Weights::from_args(&["1", "2", "3", "4", "5", "6", "x", "8"]).unwrap_err();
        assert!(matches!(
            err,
            WeightsError::InvalidValue {
                name: "not-paired-pen",
                ..
            }
        ));
    }

    #[test]
    fn from_args_rejects_wrong_count() {
        assert_eq!(
            Weights::from_args(&["1", "2"]).unwrap_err(),
            WeightsError::WrongCount {
                expected: 8,
                found: 2
            }
        );
    }

    #[test]
    fn set_rejects_unknown_field_names() {
        let mut weights = Weights::default();
        assert!(weights.set("bogus", "1").is_err());
        weights.set("section-pen", "9").unwrap();
        assert_eq!(weights.section_pen, 9);
    }
}
