use super::config::SearchConfig;
use super::progress::ProgressReporter;
use crate::core::models::problem::Problem;
use crate::core::models::weights::Weights;

/// Everything a search task needs to read, bundled for passing by value.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub problem: &'a Problem,
    pub config: &'a SearchConfig,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        problem: &'a Problem,
        config: &'a SearchConfig,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            problem,
            config,
            reporter,
        }
    }

    pub fn weights(&self) -> &'a Weights {
        &self.config.weights
    }
}
