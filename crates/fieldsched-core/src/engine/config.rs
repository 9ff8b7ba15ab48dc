use crate::core::models::weights::Weights;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_NUM_SOLUTIONS: usize = 1;
pub const DEFAULT_BATCH_SIZE: usize = 64;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

/// How the search driver orders its frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    /// Best-first by ascending lower bound, discarding nodes that cannot beat
    /// the retained solutions.
    #[default]
    BranchAndBound,
    /// FIFO over the whole tree.
    BreadthFirst,
    /// LIFO over the whole tree.
    DepthFirst,
}

impl SearchStrategy {
    /// Whether nodes are discarded against the pruning bound.
    pub fn prunes(self) -> bool {
        matches!(self, SearchStrategy::BranchAndBound)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid search strategy (expected branch-and-bound, breadth-first or depth-first)")]
pub struct ParseSearchStrategyError;

impl FromStr for SearchStrategy {
    type Err = ParseSearchStrategyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "branch-and-bound" | "bnb" => Ok(SearchStrategy::BranchAndBound),
            "breadth-first" | "bfs" => Ok(SearchStrategy::BreadthFirst),
            "depth-first" | "dfs" => Ok(SearchStrategy::DepthFirst),
            _ => Err(ParseSearchStrategyError),
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SearchStrategy::BranchAndBound => "branch-and-bound",
                SearchStrategy::BreadthFirst => "breadth-first",
                SearchStrategy::DepthFirst => "depth-first",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimits {
    pub max_nodes: Option<u64>,
    pub time_limit: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub weights: Weights,
    pub strategy: SearchStrategy,
    pub num_solutions: usize,
    pub batch_size: usize,
    pub limits: SearchLimits,
}

#[derive(Default)]
pub struct SearchConfigBuilder {
    weights: Option<Weights>,
    strategy: Option<SearchStrategy>,
    num_solutions: Option<usize>,
    batch_size: Option<usize>,
    max_nodes: Option<u64>,
    time_limit: Option<Duration>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(mut self, weights: Weights) -> Self {
        self.weights = Some(weights);
        self
    }
    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
    pub fn num_solutions(mut self, n: usize) -> Self {
        self.num_solutions = Some(n);
        self
    }
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }
    pub fn max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = Some(nodes);
        self
    }
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let weights = self
            .weights
            .ok_or(ConfigError::MissingParameter("weights"))?;

        let num_solutions = self.num_solutions.unwrap_or(DEFAULT_NUM_SOLUTIONS);
        if num_solutions == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "num_solutions",
                reason: "must be at least 1",
            });
        }
        let batch_size = self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "batch_size",
                reason: "must be at least 1",
            });
        }

        Ok(SearchConfig {
            weights,
            strategy: self.strategy.unwrap_or_default(),
            num_solutions,
            batch_size,
            limits: SearchLimits {
                max_nodes: self.max_nodes,
                time_limit: self.time_limit,
            },
        })
    }
}
