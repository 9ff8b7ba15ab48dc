use crate::core::io::traits::ProblemFile;
use crate::core::models::builder::ProblemBuilder;
use crate::core::models::problem::{ModelError, Problem};
use crate::core::models::schedule::ScheduleState;
use crate::core::models::slot::{Day, Kind, StartTime};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },
    #[error("Invalid model on line {line}: {source}")]
    Model {
        line: usize,
        #[source]
        source: ModelError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("Content appears before the first section header")]
    OutsideSection,
    #[error("Unknown section header '{0}'")]
    UnknownHeader(String),
    #[error("{section} entry has {found} fields, expected {expected}")]
    FieldCount {
        section: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("Invalid day '{0}' (expected MO, TU or FR)")]
    InvalidDay(String),
    #[error("Invalid start time '{0}'")]
    InvalidTime(String),
    #[error("Invalid non-negative integer '{0}'")]
    InvalidInt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Name,
    GameSlots,
    PracticeSlots,
    Games,
    Practices,
    NotCompatible,
    Unwanted,
    Preferences,
    Pair,
    PartialAssignments,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        match line {
            "Name:" => Some(Section::Name),
            "Game slots:" => Some(Section::GameSlots),
            "Practice slots:" => Some(Section::PracticeSlots),
            "Games:" => Some(Section::Games),
            "Practices:" => Some(Section::Practices),
            "Not compatible:" => Some(Section::NotCompatible),
            "Unwanted:" => Some(Section::Unwanted),
            "Preferences:" => Some(Section::Preferences),
            "Pair:" => Some(Section::Pair),
            "Partial assignments:" => Some(Section::PartialAssignments),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Section::Name => "Name",
            Section::GameSlots => "Game slots",
            Section::PracticeSlots => "Practice slots",
            Section::Games => "Games",
            Section::Practices => "Practices",
            Section::NotCompatible => "Not compatible",
            Section::Unwanted => "Unwanted",
            Section::Preferences => "Preferences",
            Section::Pair => "Pair",
            Section::PartialAssignments => "Partial assignments",
        }
    }
}

/// The sectioned plain-text problem format.
///
/// ```text
/// Name:
/// Example
///
/// Game slots:
/// MO, 8:00, 3, 2
///
/// Games:
/// CMSA U13T3 DIV 01
/// ```
pub struct TextFormat;

struct LineParser {
    line: usize,
    section: Section,
}

impl LineParser {
    fn parse_error(&self, kind: ParseErrorKind) -> InputError {
        InputError::Parse {
            line: self.line,
            kind,
        }
    }

    fn model_error(&self, source: ModelError) -> InputError {
        InputError::Model {
            line: self.line,
            source,
        }
    }

    fn fields<'a>(
        &self,
        content: &'a str,
        expected: usize,
        label: &'static str,
    ) -> Result<Vec<&'a str>, InputError> {
        let fields: Vec<&str> = content.split(',').map(str::trim).collect();
        if fields.len() != expected {
            return Err(self.parse_error(ParseErrorKind::FieldCount {
                section: self.section.label(),
                expected: label,
                found: fields.len(),
            }));
        }
        Ok(fields)
    }

    fn day(&self, raw: &str) -> Result<Day, InputError> {
        raw.parse()
            .map_err(|_| self.parse_error(ParseErrorKind::InvalidDay(raw.to_string())))
    }

    fn time(&self, raw: &str) -> Result<StartTime, InputError> {
        raw.parse()
            .map_err(|_| self.parse_error(ParseErrorKind::InvalidTime(raw.to_string())))
    }

    fn count(&self, raw: &str) -> Result<u64, InputError> {
        raw.parse()
            .map_err(|_| self.parse_error(ParseErrorKind::InvalidInt(raw.to_string())))
    }

    fn word_count(
        &self,
        content: &str,
        allowed: &[usize],
        label: &'static str,
    ) -> Result<(), InputError> {
        let found = content.split_whitespace().count();
        if !allowed.contains(&found) {
            return Err(self.parse_error(ParseErrorKind::FieldCount {
                section: self.section.label(),
                expected: label,
                found,
            }));
        }
        Ok(())
    }

    fn apply(&self, content: &str, builder: &mut ProblemBuilder) -> Result<(), InputError> {
        match self.section {
            Section::Name => {
                builder.name(content);
            }
            Section::GameSlots | Section::PracticeSlots => {
                let kind = if self.section == Section::GameSlots {
                    Kind::Game
                } else {
                    Kind::Practice
                };
                let fields = self.fields(content, 4, "4")?;
                let day = self.day(fields[0])?;
                let start = self.time(fields[1])?;
                let max = self.count(fields[2])? as usize;
                let min = self.count(fields[3])? as usize;
                builder
                    .add_slot(kind, day, start, max, min)
                    .map_err(|e| self.model_error(e))?;
            }
            Section::Games => {
                self.word_count(content, &[4], "4 words")?;
                builder.add_game(content).map_err(|e| self.model_error(e))?;
            }
            Section::Practices => {
                self.word_count(content, &[4, 6], "4 or 6 words")?;
                builder
                    .add_practice(content)
                    .map_err(|e| self.model_error(e))?;
            }
            Section::NotCompatible => {
                let fields = self.fields(content, 2, "2")?;
                builder
                    .add_incompatibility(fields[0], fields[1])
                    .map_err(|e| self.model_error(e))?;
            }
            Section::Pair => {
                let fields = self.fields(content, 2, "2")?;
                builder
                    .add_pair(fields[0], fields[1])
                    .map_err(|e| self.model_error(e))?;
            }
            Section::Unwanted => {
                let fields = self.fields(content, 3, "3")?;
                let day = self.day(fields[1])?;
                let start = self.time(fields[2])?;
                builder
                    .add_unwanted(fields[0], day, start)
                    .map_err(|e| self.model_error(e))?;
            }
            Section::PartialAssignments => {
                let fields = self.fields(content, 3, "3")?;
                let day = self.day(fields[1])?;
                let start = self.time(fields[2])?;
                builder
                    .set_partial_assignment(fields[0], day, start)
                    .map_err(|e| self.model_error(e))?;
            }
            Section::Preferences => {
                let fields = self.fields(content, 4, "4")?;
                let day = self.day(fields[0])?;
                let start = self.time(fields[1])?;
                let value = self.count(fields[3])?;
                match builder.add_preference(fields[2], day, start, value) {
                    Ok(_) => {}
                    Err(e @ (ModelError::UnknownItem(_) | ModelError::UnknownSlot(_))) => {
                        warn!(line = self.line, "Skipping preference: {}", e);
                    }
                    Err(e) => return Err(self.model_error(e)),
                }
            }
        }
        Ok(())
    }
}

impl ProblemFile for TextFormat {
    type Error = InputError;

    fn read_from(reader: &mut impl BufRead) -> Result<Problem, Self::Error> {
        let mut builder = ProblemBuilder::new();
        let mut section: Option<Section> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let content = line.trim();
            if content.is_empty() {
                continue;
            }

            if let Some(next) = Section::from_header(content) {
                section = Some(next);
                continue;
            }

            let Some(current) = section else {
                return Err(InputError::Parse {
                    line: line_num,
                    kind: ParseErrorKind::OutsideSection,
                });
            };
            if content.ends_with(':') && current != Section::Name {
                return Err(InputError::Parse {
                    line: line_num,
                    kind: ParseErrorKind::UnknownHeader(content.to_string()),
                });
            }

            let parser = LineParser {
                line: line_num,
                section: current,
            };
            parser.apply(content, &mut builder)?;
        }

        Ok(builder.build())
    }

    fn write_solution_to(
        problem: &Problem,
        schedule: &ScheduleState,
        eval_value: u64,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "Eval-value: {}", eval_value)?;

        let mut rows: Vec<(&str, String)> = schedule
            .placements()
            .filter_map(|(item, slot)| {
                let cell = problem.slot(slot)?.cell();
                Some((problem.identifier(item), cell.to_string()))
            })
            .collect();
        rows.sort_unstable();

        let width = rows.iter().map(|(id, _)| id.len()).max().unwrap_or(0);
        for (identifier, cell) in rows {
            writeln!(writer, "{:<width$} : {}", identifier, cell, width = width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::slot::SlotKey;
    use std::io::Cursor;

    const SAMPLE: &str = "\
Name:
CMSA Spring

Game slots:
MO, 8:00, 3, 2
TU, 9:30, 2, 1

Practice slots:
MO, 8:00, 4, 2
FR, 10:00, 2, 1

Games:
CMSA U12T1 DIV 01
CMSA  U12T1 DIV 02

Practices:
CMSA U12T1 DIV 01 PRC 01
CMSA U12T1 OPN 02

Not compatible:
CMSA U12T1 DIV 01, CMSA U12T1 DIV 02

Unwanted:
CMSA U12T1 DIV 01, MO, 8:00

Preferences:
TU, 9:30, CMSA U12T1 DIV 01, 10
FR, 9:30, CMSA U12T1 DIV 01, 10

Pair:
CMSA U12T1 DIV 02, CMSA U12T1 OPN 02

Partial assignments:
CMSA U12T1 OPN 02, FR, 10:00
";

    fn parse(text: &str) -> Result<Problem, InputError> {
        TextFormat::read_from(&mut Cursor::new(text))
    }

    fn key(kind: Kind, day: Day, time: &str) -> SlotKey {
        SlotKey::new(kind, day, time.parse().unwrap())
    }

    #[test]
    fn reads_every_section_of_a_well_formed_file() {
        let problem = parse(SAMPLE).unwrap();
        assert_eq!(problem.name(), Some("CMSA Spring"));
        assert_eq!(problem.slots_of_kind(Kind::Game).len(), 2);
        assert_eq!(problem.slots_of_kind(Kind::Practice).len(), 2);
        assert_eq!(problem.num_items_of_kind(Kind::Game), 2);
        assert_eq!(problem.num_items_of_kind(Kind::Practice), 2);

        let d1 = problem.find_item("CMSA U12T1 DIV 01").unwrap();
        let d2 = problem.find_item("CMSA U12T1 DIV 02").unwrap();
        let opn = problem.find_item("CMSA U12T1 OPN 02").unwrap();
        let d1_spec = problem.item(d1).unwrap().spec();

        assert!(d1_spec.is_incompatible_with(d2));
        let monday = problem.find_slot(&key(Kind::Game, Day::Monday, "8:00")).unwrap();
        assert!(d1_spec.is_unwanted(monday));
        let tuesday = problem.find_slot(&key(Kind::Game, Day::Tuesday, "9:30")).unwrap();
        assert_eq!(d1_spec.preferences(), &[(tuesday, 10)]);
        assert!(problem.item(d2).unwrap().spec().paired_with().contains(&opn));

        let friday = problem
            .find_slot(&key(Kind::Practice, Day::Friday, "10:00"))
            .unwrap();
        assert_eq!(problem.item(opn).unwrap().spec().fixed_slot(), Some(friday));
    }

    #[test]
    fn preferences_for_unknown_slots_or_items_are_skipped() {
        let text = "\
Game slots:
MO, 8:00, 1, 0
Games:
CMSA U12T1 DIV 01
Preferences:
TU, 9:30, CMSA U12T1 DIV 01, 5
MO, 8:00, CMSA U99 DIV 01, 5
MO, 8:00, CMSA U12T1 DIV 01, 3
";
        let problem = parse(text).unwrap();
        let id = problem.find_item("CMSA U12T1 DIV 01").unwrap();
        assert_eq!(problem.item(id).unwrap().spec().preferences().len(), 1);
    }

    #[test]
    fn reports_line_numbers_for_malformed_entries() {
        let err = parse("Game slots:\nMO, 8:00, 3\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::Parse {
                line: 2,
                kind: ParseErrorKind::FieldCount { found: 3, .. }
            }
        ));

        let err = parse("Game slots:\n\nWE, 8:00, 3, 1\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::Parse {
                line: 3,
                kind: ParseErrorKind::InvalidDay(_)
            }
        ));

        let err = parse("Practice slots:\nMO, 18:00, 3, 1\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::Parse {
                kind: ParseErrorKind::InvalidTime(_),
                ..
            }
        ));

        let err = parse("Game slots:\nMO, 8:00, -1, 1\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::Parse {
                kind: ParseErrorKind::InvalidInt(_),
                ..
            }
        ));
    }

    #[test]
    fn rejects_content_outside_sections_and_unknown_headers() {
        let err = parse("MO, 8:00, 3, 1\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::Parse {
                line: 1,
                kind: ParseErrorKind::OutsideSection
            }
        ));

        let err = parse("Games:\nCMSA U12T1 DIV 01\nDivisions:\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::Parse {
                line: 3,
                kind: ParseErrorKind::UnknownHeader(_)
            }
        ));
    }

    #[test]
    fn enforces_identifier_word_counts() {
        assert!(parse("Games:\nCMSA U12T1 DIV\n").is_err());
        assert!(parse("Practices:\nCMSA U12T1 DIV 01 PRC\n").is_err());
        assert!(parse("Practices:\nCMSA U12T1 DIV 01 PRC 01\n").is_ok());
    }

    #[test]
    fn relation_errors_carry_the_offending_line() {
        let text = "Games:\nCMSA U12T1 DIV 01\nPair:\nCMSA U12T1 DIV 01, CMSA U12T1 DIV 09\n";
        let err = parse(text).unwrap_err();
        assert!(matches!(
            err,
            InputError::Model {
                line: 4,
                source: ModelError::UnknownItem(_)
            }
        ));
    }

    #[test]
    fn writes_sorted_padded_assignment_listing() {
        let problem = parse(SAMPLE).unwrap();
        let tuesday = problem
            .find_slot(&key(Kind::Game, Day::Tuesday, "9:30"))
            .unwrap();
        let monday = problem
            .find_slot(&key(Kind::Game, Day::Monday, "8:00"))
            .unwrap();
        let friday = problem
            .find_slot(&key(Kind::Practice, Day::Friday, "10:00"))
            .unwrap();
        let schedule = ScheduleState::empty(&problem)
            .with_placement(problem.find_item("CMSA U12T1 OPN 02").unwrap(), friday)
            .with_placement(problem.find_item("CMSA U12T1 DIV 02").unwrap(), monday)
            .with_placement(problem.find_item("CMSA U12T1 DIV 01").unwrap(), tuesday);

        let mut out = Vec::new();
        TextFormat::write_solution_to(&problem, &schedule, 42, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "Eval-value: 42\n\
             CMSA U12T1 DIV 01 : TU, 9:30\n\
             CMSA U12T1 DIV 02 : MO, 8:00\n\
             CMSA U12T1 OPN 02 : FR, 10:00\n"
        );
    }

    #[test]
    fn reads_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("league.txt");
        std::fs::write(&path, SAMPLE).unwrap();
        let problem = TextFormat::read_from_path(&path).unwrap();
        assert_eq!(problem.num_items(), 4);
    }
}
