use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Inference request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Inference request failed: {0}")]
    Transport(String),
    #[error("Inference backend responded with status {0}")]
    Status(u16),
    #[error("Inference response could not be decoded: {0}")]
    Decode(String)
}

impl InferenceError {
    pub fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }

    /// Transport failures and server-side statuses may clear up; a bad response body will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Transport(_) => true,
            Self::Status(status) => *status >= 500,
            Self::Decode(_) => false
        }
    }
}
