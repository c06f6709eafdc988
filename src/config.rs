//! Engine configuration
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration. Values are read from an optional TOML file and then overridden
//! by `AUCTION_*` environment variables, e.g. `AUCTION_EXECUTION_PRICING=maker_price`.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::orderbook::matching::ExecutionPricing;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "AUCTION";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Which resting price a trade executes at
    #[serde(default)]
    pub execution_pricing: ExecutionPricing,

    /// Hand observers a book snapshot after every accepted submission
    #[serde(default)]
    pub publish_snapshots: bool,

    /// Pre-allocated slots per book side
    #[serde(default = "default_initial_side_capacity")]
    pub initial_side_capacity: usize,

    /// Currency value of one price tick, used when converting external prices
    #[serde(default = "default_tick_size")]
    pub tick_size: f64,
}

fn default_initial_side_capacity() -> usize {
    64
}

fn default_tick_size() -> f64 {
    0.01
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            execution_pricing: ExecutionPricing::default(),
            publish_snapshots: false,
            initial_side_capacity: default_initial_side_capacity(),
            tick_size: default_tick_size(),
        }
    }
}

impl EngineConfig {
    /// Load from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config: EngineConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_size.is_finite() && self.tick_size > 0.0) {
            return Err(ConfigError::Message(format!(
                "tick_size must be a positive number, got {}",
                self.tick_size
            )));
        }
        Ok(())
    }
}
