mod errors;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::pipeline::{Pipeline, PipelineError};
use crate::storage::FeatureStore;

/// The inbound API: `POST /` with a JSON transaction body.
pub fn router<S: FeatureStore>(pipeline: Arc<Pipeline<S>>) -> Router {
    Router::new()
        .route("/", post(predict::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

async fn predict<S: FeatureStore>(
    State(pipeline): State<Arc<Pipeline<S>>>,
    body: Bytes
) -> Result<StatusCode, PipelineError> {
    let outcome = pipeline.process(&body).await?;

    debug!(
        "Responding OK: verdict {}, ground truth {:?}, agreement {:?}",
        outcome.verdict.class, outcome.ground_truth, outcome.agreement
    );

    Ok(StatusCode::OK)
}
