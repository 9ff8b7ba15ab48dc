use fieldsched::core::models::weights::WeightsError;
use fieldsched::engine::config::ConfigError;
use fieldsched::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<WeightsError> for CliError {
    fn from(e: WeightsError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_and_search_errors_become_configuration_errors() {
        let err: CliError = WeightsError::InvalidValue {
            name: "pref-weight",
            value: "-2".to_string(),
        }
        .into();
        assert!(matches!(&err, CliError::Config(msg) if msg.contains("pref-weight")));

        let err: CliError = ConfigError::MissingParameter("weights").into();
        assert!(matches!(&err, CliError::Config(msg) if msg.contains("weights")));
    }
}
