use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("missing news provider API key in configuration")]
    MissingApiKey,
    #[error("user not found")]
    UserNotFound,
    #[error("no preferences found")]
    NoPreferences,
    #[error("user already exists")]
    UserExists,
    #[error("categories and languages must be non-empty strings")]
    InvalidPreferences,
    #[error("keyword is required")]
    EmptyKeyword,
    #[error("upstream returned status {status}")]
    Upstream { status: u16, body: String },
    #[error("invalid response from news provider")]
    UpstreamFormat,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("user store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("user store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
