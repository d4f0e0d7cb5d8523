use crate::error::{Result, RosterStoreError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound the member search endpoint accepts per request.
pub const MAX_RESULT_LIMIT: u32 = 100;

/// Configuration for remote member searches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSearchConfig {
    /// Members requested per search
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,

    /// Minimum gap between two searches against the same guild
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Number of recent (guild, query) pairs that are not searched again
    #[serde(default = "default_recent_queries")]
    pub recent_queries: usize,
}

fn default_result_limit() -> u32 {
    25
}

fn default_min_interval_ms() -> u64 {
    1_000
}

fn default_recent_queries() -> usize {
    64
}

impl Default for RemoteSearchConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            min_interval_ms: default_min_interval_ms(),
            recent_queries: default_recent_queries(),
        }
    }
}

impl RemoteSearchConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RESULT_LIMIT).contains(&self.result_limit) {
            return Err(RosterStoreError::InvalidConfig(format!(
                "result_limit must be in [1, {MAX_RESULT_LIMIT}], got {}",
                self.result_limit
            )));
        }

        if self.recent_queries == 0 {
            return Err(RosterStoreError::InvalidConfig(
                "recent_queries must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}
