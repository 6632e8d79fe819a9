// Error types for the reposcope application.
// Covers GitHub API failures, cache I/O, and JSON decoding.

#![allow(dead_code)]

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("HTTP {code} from {url}")]
    Status { code: u16, url: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl ScopeError {
    /// The upstream HTTP status code, when this error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ScopeError::Status { code, .. } => Some(*code),
            ScopeError::Api(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScopeError>;
