//! Error types for the application

use thiserror::Error;

/// Failures along the fetch → parse path.
///
/// None of these are fatal: the orchestrator logs the cause, lights the
/// error status pixel and retries on the next cycle.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("github api returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("graphql error: {0}")]
    Api(String),

    #[error("malformed response: {0}")]
    Shape(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Shape(e.to_string())
    }
}

/// Startup configuration errors (the only condition that stops the process)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}
