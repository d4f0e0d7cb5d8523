use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterStoreError {
    #[error("Invalid remote search config: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse remote search config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RosterStoreError>;
