mod client;
mod errors;
mod retry;
mod wire;

pub use client::{InferenceClient, InferenceConfig, DEFAULT_ENDPOINT, DEFAULT_THRESHOLD, DEFAULT_TIMEOUT};
pub use errors::InferenceError;
pub use retry::RetryPolicy;
