//! # fieldsched
//!
//! A search engine that assigns league games and practices to weekly time
//! slots, honoring hard constraints and minimizing weighted soft penalties.
//!
//! ## Layers
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Problem`, `Slot`,
//!   `Item`, `ScheduleState`), the penalty weights, and the text input format.
//!
//! - **[`engine`]: The Search Machinery.** Hard-constraint checks, soft-constraint
//!   scoring and lower bounds, item selection, branching, the search frontier
//!   and the shared pool of best solutions.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into
//!   a complete scheduling run that returns ranked schedules.
//!
//! ```no_run
//! use fieldsched::core::io::text::TextFormat;
//! use fieldsched::core::io::traits::ProblemFile;
//! use fieldsched::core::models::weights::Weights;
//! use fieldsched::engine::config::SearchConfigBuilder;
//! use fieldsched::engine::progress::ProgressReporter;
//! use fieldsched::workflows::schedule;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let problem = TextFormat::read_from_path("league.txt")?;
//! let config = SearchConfigBuilder::new()
//!     .weights(Weights::from_args(&["1", "1", "1", "1", "10", "10", "5", "5"])?)
//!     .build()?;
//! let result = schedule::run(&problem, &config, &ProgressReporter::new())?;
//! if let Some(best) = result.best() {
//!     println!("best cost {}", best.total());
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
