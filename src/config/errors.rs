use thiserror::Error;

use crate::models::SchemaError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value [{value}] for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String
    },
    #[error("Invalid feature schema: {0}")]
    Schema(#[from] SchemaError)
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string()
        }
    }
}
