use thiserror::Error;

/// Custom error type for credentials, allow us to differentiate between errors.
///
#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("No API Key")]
    NoAPIKey,
    #[error("Bad parameter {0}")]
    BadParam(String),
}

/// Everything that can go wrong during a fetch.  Nothing is retried here.
///
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No route {0} for site {1}")]
    UnknownRoute(String, String),
    #[error("HTTP Error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Error({0}): {1}")]
    Status(u16, String),
    #[error("Invalid payload: {0}")]
    Schema(#[from] serde_json::Error),
}
