use thiserror::Error;

/// Failures talking to the remote player.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{what} failed with HTTP {status}")]
    Status { what: String, status: u16 },
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("status response is not a JSON object")]
    NotAnObject,
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
