use crate::core::models::problem::Problem;
use crate::core::models::schedule::ScheduleState;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading problem descriptions and writing
/// finished schedules.
///
/// Implementors handle format-specific parsing and rendering; the default
/// methods add the file-system plumbing.
pub trait ProblemFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a problem from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails, the described model is inconsistent,
    /// or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Problem, Self::Error>;

    /// Writes a schedule together with its evaluation value.
    ///
    /// # Arguments
    ///
    /// * `problem` - The problem the schedule belongs to.
    /// * `schedule` - The schedule to render.
    /// * `eval_value` - The total soft-constraint cost of `schedule`.
    /// * `writer` - The writer to output to.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_solution_to(
        problem: &Problem,
        schedule: &ScheduleState,
        eval_value: u64,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads a problem from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Problem, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a schedule to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_solution_to_path<P: AsRef<Path>>(
        problem: &Problem,
        schedule: &ScheduleState,
        eval_value: u64,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_solution_to(problem, schedule, eval_value, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
