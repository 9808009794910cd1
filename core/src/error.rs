use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Malformed record '{id}': {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Session state lock poisoned")]
    StatePoisoned,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
