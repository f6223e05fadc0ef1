use thiserror::Error;

/// Convenience alias for status query results.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when querying replica set status.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure or non-success HTTP response.
    #[error("status request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed.
    #[error("malformed status payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed response that marks itself unsuccessful.
    #[error("status query rejected: {0}")]
    Application(String),
}
