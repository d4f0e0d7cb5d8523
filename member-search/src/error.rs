use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemberSearchError {
    #[error("Invalid member search config: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse member search config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MemberSearchError>;
