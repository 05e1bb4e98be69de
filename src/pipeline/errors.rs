use crate::inference::InferenceError;
use crate::models::TransactionError;
use crate::storage::StoreError;
use std::fmt;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// The error classes a request can abort with.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    Decode,
    Lookup,
    Write,
    Transport
}

impl Display for ErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::Decode => "decode",
            Self::Lookup => "lookup",
            Self::Write => "write",
            Self::Transport => "transport"
        };

        write!(formatter, "{stage}")
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Decode error: {0}")]
    MalformedTransaction(#[from] TransactionError),
    #[error("Write error: {0}")]
    Write(#[source] StoreError),
    #[error("Lookup error: {0}")]
    Lookup(#[source] StoreError),
    #[error("Transport error: {0}")]
    Transport(#[source] InferenceError),
    #[error("Decode error: {0}")]
    MalformedPrediction(#[source] InferenceError)
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedTransaction(_) | Self::MalformedPrediction(_) => ErrorKind::Decode,
            Self::Write(_) => ErrorKind::Write,
            Self::Lookup(_) => ErrorKind::Lookup,
            Self::Transport(_) => ErrorKind::Transport
        }
    }
}

impl From<InferenceError> for PipelineError {
    fn from(error: InferenceError) -> Self {
        match error {
            InferenceError::Decode(_) => Self::MalformedPrediction(error),
            _ => Self::Transport(error)
        }
    }
}
