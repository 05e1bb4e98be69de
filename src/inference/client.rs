use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::inference::wire::{PredictRequest, PredictResponse};
use crate::inference::{InferenceError, RetryPolicy};
use crate::models::{FeatureVector, Verdict};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8501/v1/models/fraud:predict";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub endpoint: String,
    /// Bound on a single attempt, connect through body.
    pub timeout: Duration,
    pub threshold: f64,
    pub retry: RetryPolicy
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            threshold: DEFAULT_THRESHOLD,
            retry: RetryPolicy::default()
        }
    }
}

/// HTTP client for the model-serving backend.
pub struct InferenceClient {
    config: InferenceConfig,
    http_client: reqwest::Client
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| InferenceError::Transport(error.to_string()))?;

        Ok(Self { config, http_client })
    }

    /// Scores one feature vector and thresholds the result into a verdict.
    ///
    /// # Errors
    /// Returns `InferenceError` once the retry policy is exhausted, or at once
    /// for failures that are not retryable.
    pub async fn predict(&self, vector: &FeatureVector) -> Result<Verdict, InferenceError> {
        let request = PredictRequest::single(vector.as_slice());
        let mut attempt = 1;

        loop {
            match self.submit(&request).await {
                Ok(score) => {
                    let verdict = Verdict::from_score(score, self.config.threshold);
                    info!("Prediction is {} (score {score})", verdict.class);
                    return Ok(verdict)
                }
                Err(error) if error.is_retryable() && attempt < self.config.retry.max_attempts => {
                    let delay = self.config.retry.delay(attempt);
                    warn!("Inference attempt {attempt} failed, retrying in {delay:?}: {error}");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error)
            }
        }
    }

    async fn submit(&self, request: &PredictRequest<'_>) -> Result<f64, InferenceError> {
        debug!("Submitting feature vector to {}", self.config.endpoint);

        let response = self.http_client
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|error| InferenceError::from_reqwest(error, self.config.timeout))?;

        let status = response.status();

        if !status.is_success() {
            return Err(InferenceError::Status(status.as_u16()))
        }

        let body = response.bytes()
            .await
            .map_err(|error| InferenceError::from_reqwest(error, self.config.timeout))?;

        let prediction: PredictResponse = serde_json::from_slice(&body)
            .map_err(|error| InferenceError::Decode(error.to_string()))?;

        prediction.score()
    }
}
