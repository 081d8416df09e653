use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned a malformed payload: {0}")]
    MalformedUpstreamResponse(String),

    #[error("upstream reported failure: {0}")]
    UpstreamStatus(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
