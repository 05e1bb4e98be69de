mod errors;
mod memory_store;
mod seed;

use std::future::Future;

use crate::models::FeatureRecord;

pub use errors::{SeedError, StoreError};
pub use memory_store::MemoryStore;
pub use seed::load_csv;

/// The namespace/set pair every key in this service is scoped under.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Keyspace {
    pub namespace: String,
    pub set_name: String
}

impl Keyspace {
    pub fn new(namespace: impl Into<String>, set_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            set_name: set_name.into()
        }
    }

    /// Builds a key for an entity identifier within this keyspace.
    pub fn key(&self, user_key: &str) -> Result<StoreKey, StoreError> {
        if user_key.is_empty() {
            return Err(StoreError::InvalidKey("entity identifier is empty".to_string()))
        }

        Ok(StoreKey {
            keyspace: self.clone(),
            user_key: user_key.to_string()
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct StoreKey {
    pub keyspace: Keyspace,
    pub user_key: String
}

/// The key-value store collaborator.
///
/// Implementations own their concurrency safety; the pipeline holds them behind
/// an `Arc` and never locks around calls.
pub trait FeatureStore: Send + Sync + 'static {
    /// Writes the given bins, merging into any existing record (per-bin last write wins).
    fn put(&self, key: &StoreKey, fields: FeatureRecord) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Reads the requested bins of a record. An empty field list reads every bin.
    fn get(&self, key: &StoreKey, fields: &[&str]) -> impl Future<Output = Result<FeatureRecord, StoreError>> + Send;
}
