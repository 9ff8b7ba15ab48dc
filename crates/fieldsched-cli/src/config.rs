use crate::cli::SolveArgs;
use crate::error::{CliError, Result};
use fieldsched::core::models::weights::Weights;
use fieldsched::engine::config::{SearchConfig, SearchConfigBuilder, SearchStrategy};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialWeights {
    min_filled_weight: Option<u64>,
    pref_weight: Option<u64>,
    pair_weight: Option<u64>,
    sec_diff_weight: Option<u64>,
    game_min_pen: Option<u64>,
    practice_min_pen: Option<u64>,
    not_paired_pen: Option<u64>,
    section_pen: Option<u64>,
}

impl PartialWeights {
    fn field_mut(&mut self, name: &str) -> Option<&mut Option<u64>> {
        Some(match name {
            "min-filled-weight" => &mut self.min_filled_weight,
            "pref-weight" => &mut self.pref_weight,
            "pair-weight" => &mut self.pair_weight,
            "sec-diff-weight" => &mut self.sec_diff_weight,
            "game-min-pen" => &mut self.game_min_pen,
            "practice-min-pen" => &mut self.practice_min_pen,
            "not-paired-pen" => &mut self.not_paired_pen,
            "section-pen" => &mut self.section_pen,
            _ => return None,
        })
    }

    fn complete(mut self) -> Result<Weights> {
        let mut weights = Weights::default();
        let mut missing = Vec::new();
        for name in Weights::FIELD_NAMES {
            match self.field_mut(name).and_then(|v| v.take()) {
                Some(value) => weights.set(name, &value.to_string())?,
                None => missing.push(name),
            }
        }
        if missing.is_empty() {
            Ok(weights)
        } else {
            Err(CliError::Config(format!(
                "Weights must be given as eight positional arguments or in the `[weights]` table; missing: {}",
                missing.join(", ")
            )))
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSearchConfig {
    strategy: Option<SearchStrategy>,
    num_solutions: Option<usize>,
    max_nodes: Option<u64>,
    time_limit_secs: Option<f64>,
    batch_size: Option<usize>,
}

/// The solve configuration as read from a TOML file; every field optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialSolveConfig {
    weights: Option<PartialWeights>,
    search: Option<PartialSearchConfig>,
}

impl PartialSolveConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Layers `-S` overrides and dedicated flags over the file values.
    pub fn merge_with_cli(mut self, args: &SolveArgs) -> Result<SearchConfig> {
        self.apply_set_values(&args.set_values)?;

        let weights = if args.weights.is_empty() {
            self.weights.take().unwrap_or_default().complete()?
        } else {
            Weights::from_args(&args.weights)?
        };

        let search = self.search.take().unwrap_or_default();
        let mut builder = SearchConfigBuilder::new()
            .weights(weights)
            .strategy(args.strategy.or(search.strategy).unwrap_or_default());

        if let Some(n) = args.num_solutions.or(search.num_solutions) {
            builder = builder.num_solutions(n);
        }
        if let Some(size) = args.batch_size.or(search.batch_size) {
            builder = builder.batch_size(size);
        }
        if let Some(nodes) = args.max_nodes.or(search.max_nodes) {
            builder = builder.max_nodes(nodes);
        }
        if let Some(secs) = args.time_limit.or(search.time_limit_secs) {
            let limit = Duration::try_from_secs_f64(secs).map_err(|_| {
                CliError::Config(format!(
                    "Invalid time limit '{}': must be a non-negative number of seconds",
                    secs
                ))
            })?;
            builder = builder.time_limit(limit);
        }

        Ok(builder.build()?)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let key = key.trim();
            let value_str = value_str.trim();

            if let Some(name) = key.strip_prefix("weights.") {
                let field = self
                    .weights
                    .get_or_insert_with(Default::default)
                    .field_mut(name)
                    .ok_or_else(|| unsupported_key(key))?;
                *field = Some(parse_value(key, value_str)?);
                continue;
            }

            let search = self.search.get_or_insert_with(Default::default);
            match key {
                "search.strategy" => search.strategy = Some(parse_value(key, value_str)?),
                "search.num-solutions" => search.num_solutions = Some(parse_value(key, value_str)?),
                "search.max-nodes" => search.max_nodes = Some(parse_value(key, value_str)?),
                "search.time-limit-secs" => {
                    search.time_limit_secs = Some(parse_value(key, value_str)?)
                }
                "search.batch-size" => search.batch_size = Some(parse_value(key, value_str)?),
                _ => return Err(unsupported_key(key)),
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!("Unsupported configuration key for --set: '{}'", key))
}
