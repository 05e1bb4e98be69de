use crate::models::FeatureRecord;
use crate::storage::{FeatureStore, StoreError, StoreKey};
use dashmap::DashMap;
use std::sync::Arc;

/// In-process feature store backed by a sharded concurrent map.
pub struct MemoryStore {
    records: Arc<DashMap<StoreKey, FeatureRecord>>
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new())
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureStore for MemoryStore {
    async fn put(&self, key: &StoreKey, fields: FeatureRecord) -> Result<(), StoreError> {
        self.records.entry(key.clone())
            .or_default()
            .merge(fields);

        Ok(())
    }

    async fn get(&self, key: &StoreKey, fields: &[&str]) -> Result<FeatureRecord, StoreError> {
        self.records.get(key)
            .map(|record| record.select(fields))
            .ok_or_else(|| StoreError::not_found(key))
    }
}
