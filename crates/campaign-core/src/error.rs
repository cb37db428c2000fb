use thiserror::Error;

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("not initialized: run 'campaign init'")]
    NotInitialized,

    #[error("action not found: {0}")]
    ActionNotFound(String),

    #[error("action already exists: {0}")]
    ActionExists(String),

    #[error("ambiguous id '{prefix}': matches {matches}")]
    AmbiguousId { prefix: String, matches: String },

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("subtask not found: {0}")]
    SubtaskNotFound(String),

    #[error("invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid frequency '{0}': expected weekly, biweekly or monthly")]
    InvalidFrequency(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("pdf export failed: {0}")]
    Pdf(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CampaignError>;
