//! Configuration management

use anyhow::Context;
use emq_core::RangeTable;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ranges: RangeTable,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Without an explicit path, `emq.toml` in the working directory is used
    /// when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("emq").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(environment());

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> anyhow::Result<Self> {
        let config = builder
            .build()?
            .try_deserialize::<Config>()
            .context("invalid configuration")?;
        config.ranges.check_consistency()?;
        Ok(config)
    }
}

/// `EMQ_RANGES__PARTITION_NUMBER__MAX=64` overrides `ranges.partition_number.max`
fn environment() -> config::Environment {
    config::Environment::with_prefix("EMQ")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emq_core::{FieldRange, RangeKey};

    fn from_toml(text: &str) -> anyhow::Result<Config> {
        Config::build(
            config::Config::builder()
                .add_source(config::File::from_str(text, config::FileFormat::Toml)),
        )
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.ranges, RangeTable::default());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_range_override() {
        let config = from_toml(
            r#"
            [log]
            level = "debug"

            [ranges.receive_message_maximum_number]
            max = 32
            "#,
        )
        .unwrap();

        assert_eq!(config.log.level, "debug");
        assert_eq!(
            config.ranges.get(RangeKey::ReceiveMessageMaximumNumber),
            FieldRange::new(1, 32)
        );
        assert_eq!(
            config.ranges.get(RangeKey::DelaySeconds),
            RangeKey::DelaySeconds.default_range()
        );
    }

    #[test]
    fn test_range_override_by_wire_name() {
        let config = from_toml(
            r"
            [ranges.receiveMessageMaximumNumber]
            max = 20
            ",
        )
        .unwrap();

        assert_eq!(
            config.ranges.get(RangeKey::ReceiveMessageMaximumNumber),
            FieldRange::new(1, 20)
        );
    }

    #[test]
    fn test_inconsistent_range_rejected() {
        let err = from_toml(
            r"
            [ranges.partition_number]
            min = 10
            max = 5
            ",
        )
        .unwrap_err();
        assert!(err.to_string().contains("partitionNumber"));
    }

    #[test]
    fn test_unknown_range_rejected() {
        let result = from_toml(
            r"
            [ranges.visibility_timeout]
            max = 5
            ",
        );
        assert!(result.is_err());
    }
}
