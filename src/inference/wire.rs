use serde::{Deserialize, Serialize};

use crate::inference::InferenceError;

/// Request envelope: a batch of exactly one feature row.
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub inputs: [&'a [f64]; 1]
}

impl<'a> PredictRequest<'a> {
    pub fn single(row: &'a [f64]) -> Self {
        Self { inputs: [row] }
    }
}

/// Response envelope: `{"outputs": [[score]]}`.
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub outputs: Vec<Vec<f64>>
}

impl PredictResponse {
    /// The single score, rejecting any other output shape.
    pub fn score(&self) -> Result<f64, InferenceError> {
        match self.outputs.as_slice() {
            [row] => match row.as_slice() {
                [score] if score.is_finite() => Ok(*score),
                [score] => Err(InferenceError::Decode(format!("score {score} is not finite"))),
                _ => Err(InferenceError::Decode(format!("expected one score, got {}", row.len())))
            },
            _ => Err(InferenceError::Decode(format!("expected one output row, got {}", self.outputs.len())))
        }
    }
}
