use crate::error::{MemberSearchError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a member completer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSearchConfig {
    /// How long a fetched roster is reused before it is reloaded
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Queries longer than this many characters also ask the remote service
    #[serde(default = "default_remote_search_min_chars")]
    pub remote_search_min_chars: usize,

    /// Maximum number of candidates returned per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Character that opens the completion popup
    #[serde(default = "default_trigger")]
    pub trigger: char,
}

fn default_cache_ttl_ms() -> u64 {
    2_000
}

fn default_remote_search_min_chars() -> usize {
    2
}

fn default_max_results() -> usize {
    10
}

fn default_trigger() -> char {
    '@'
}

impl Default for MemberSearchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: default_cache_ttl_ms(),
            remote_search_min_chars: default_remote_search_min_chars(),
            max_results: default_max_results(),
            trigger: default_trigger(),
        }
    }
}

impl MemberSearchConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(MemberSearchError::InvalidConfig(
                "max_results must be > 0".to_string(),
            ));
        }

        if self.trigger.is_whitespace() || self.trigger.is_control() {
            return Err(MemberSearchError::InvalidConfig(format!(
                "trigger must be a visible character, got {:?}",
                self.trigger
            )));
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}
