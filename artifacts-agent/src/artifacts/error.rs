//! Error types for the Artifacts API.

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}) on {path}: {message}")]
    Status {
        status: u16,
        path: String,
        message: String,
    },

    #[error("Invalid response from {path}")]
    InvalidResponse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
