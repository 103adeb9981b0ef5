use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Blueprint not found: {0}")]
    BlueprintNotFound(String),

    #[error("Game service error: {0}")]
    Service(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, AgentError>;
