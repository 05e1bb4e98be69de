mod errors;

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::level_filters::LevelFilter;

use crate::inference::{InferenceConfig, RetryPolicy, DEFAULT_ENDPOINT, DEFAULT_THRESHOLD, DEFAULT_TIMEOUT};
use crate::models::{FeatureSchema, MissingValuePolicy, FEATURE_LENGTH};
use crate::pipeline::{PipelineSettings, WriteFailurePolicy};
use crate::storage::Keyspace;

pub use errors::ConfigError;

const DEFAULT_PORT: u16 = 8090;
const DEFAULT_NAMESPACE: &str = "test";
const DEFAULT_SET_NAME: &str = "creditcard";
const DEFAULT_RETRY_BACKOFF_MS: u64 = 100;

/// Service configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub keyspace: Keyspace,
    /// Optional CSV of reference records loaded into the store at startup.
    pub seed_csv: Option<PathBuf>,
    pub inference: InferenceConfig,
    pub schema: FeatureSchema,
    pub write_failure: WriteFailurePolicy,
    pub log_level: LevelFilter
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>
    {
        let listen_addr = parse_or(&lookup, "LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))?;

        let keyspace = Keyspace::new(
            lookup("STORE_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            lookup("STORE_SET").unwrap_or_else(|| DEFAULT_SET_NAME.to_string())
        );

        let seed_csv = lookup("STORE_SEED_CSV")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let timeout_ms: u64 = parse_or(&lookup, "INFERENCE_TIMEOUT_MS", DEFAULT_TIMEOUT.as_millis() as u64)?;

        if timeout_ms == 0 {
            return Err(ConfigError::invalid("INFERENCE_TIMEOUT_MS", "0", "must be greater than zero"))
        }

        let threshold: f64 = parse_or(&lookup, "FRAUD_THRESHOLD", DEFAULT_THRESHOLD)?;

        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::invalid("FRAUD_THRESHOLD", &threshold.to_string(), "must lie within [0, 1]"))
        }

        let max_attempts: u32 = parse_or(&lookup, "INFERENCE_MAX_ATTEMPTS", RetryPolicy::default().max_attempts)?;

        if max_attempts == 0 {
            return Err(ConfigError::invalid("INFERENCE_MAX_ATTEMPTS", "0", "must be at least 1"))
        }

        let backoff_ms: u64 = parse_or(&lookup, "INFERENCE_RETRY_BACKOFF_MS", DEFAULT_RETRY_BACKOFF_MS)?;

        let inference = InferenceConfig {
            endpoint: lookup("INFERENCE_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: Duration::from_millis(timeout_ms),
            threshold,
            retry: RetryPolicy {
                max_attempts,
                backoff: Duration::from_millis(backoff_ms)
            }
        };

        let feature_length: usize = parse_or(&lookup, "FEATURE_LENGTH", FEATURE_LENGTH)?;

        if feature_length == 0 {
            return Err(ConfigError::invalid("FEATURE_LENGTH", "0", "must be greater than zero"))
        }

        let columns = match lookup("FEATURE_COLUMNS") {
            Some(list) => list.split(',')
                .map(str::trim)
                .filter(|column| !column.is_empty())
                .map(str::to_string)
                .collect(),
            None => FeatureSchema::credit_card().columns().to_vec()
        };

        let schema = FeatureSchema::new(columns, feature_length)?;

        let write_failure = match lookup("WRITE_FAILURE_POLICY") {
            None => WriteFailurePolicy::default(),
            Some(value) => match value.trim().to_lowercase().as_str() {
                "fail" => WriteFailurePolicy::Fail,
                "continue" => WriteFailurePolicy::Continue,
                _ => return Err(ConfigError::invalid("WRITE_FAILURE_POLICY", &value, "expected 'fail' or 'continue'"))
            }
        };

        let log_level = match lookup("LOG_LEVEL") {
            None => LevelFilter::INFO,
            Some(value) => parse_log_level(&value)
                .ok_or_else(|| ConfigError::invalid("LOG_LEVEL", &value, "expected error, warn, info, debug or trace"))?
        };

        Ok(Self {
            listen_addr,
            keyspace,
            seed_csv,
            inference,
            schema,
            write_failure,
            log_level
        })
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            keyspace: self.keyspace.clone(),
            schema: self.schema.clone(),
            missing_values: MissingValuePolicy::ZeroFill,
            write_failure: self.write_failure
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|error| ConfigError::invalid(key, &value, error))
    }
}

fn parse_log_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        _ => None
    }
}
