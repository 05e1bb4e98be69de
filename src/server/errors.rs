use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::inference::InferenceError;
use crate::pipeline::PipelineError;
use crate::storage::StoreError;

/// Maps a pipeline failure to a status, keeping client faults (4xx) apart from
/// dependency faults (5xx).
pub fn status_code(pipeline_error: &PipelineError) -> StatusCode {
    match pipeline_error {
        PipelineError::MalformedTransaction(_) => StatusCode::BAD_REQUEST,
        PipelineError::Lookup(store_error) | PipelineError::Write(store_error) => match store_error {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE
        },
        PipelineError::Transport(InferenceError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        PipelineError::Transport(_) | PipelineError::MalformedPrediction(_) => StatusCode::BAD_GATEWAY
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let stage = self.kind();

        if status.is_server_error() {
            error!("Request failed in {stage} with {status}: {self}");
        } else {
            warn!("Request rejected in {stage} with {status}: {self}");
        }

        (status, self.to_string()).into_response()
    }
}
