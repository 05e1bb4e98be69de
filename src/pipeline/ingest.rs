use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{FeatureRecord, TransactionEvent, AMOUNT_COLUMN, SET_NAME_COLUMN, USER_ID_COLUMN};
use crate::pipeline::PipelineError;
use crate::storage::{FeatureStore, Keyspace};

/// What ingestion does when the partial-record write fails.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum WriteFailurePolicy {
    /// Abort the request with a write error.
    #[default]
    Fail,
    /// Log the failure and carry on with enrichment.
    Continue
}

/// Decodes inbound transactions and records them against the counterparty.
pub struct Ingestion<S> {
    store: Arc<S>,
    keyspace: Keyspace,
    write_policy: WriteFailurePolicy
}

impl<S: FeatureStore> Ingestion<S> {
    pub fn new(store: Arc<S>, keyspace: Keyspace, write_policy: WriteFailurePolicy) -> Self {
        Self { store, keyspace, write_policy }
    }

    /// Decodes `body` and writes the partial record `{ID, set_name, AmountBin}` under the seller key.
    ///
    /// # Errors
    /// - `MalformedTransaction` if the body is not a complete transaction event.
    /// - `Write` if the store rejects the write and the policy is `Fail`.
    pub async fn ingest(&self, body: &[u8]) -> Result<TransactionEvent, PipelineError> {
        let transaction = TransactionEvent::decode(body)?;

        let key = self.keyspace.key(&transaction.seller_id).map_err(PipelineError::Write)?;
        let partial = FeatureRecord::new()
            .with(USER_ID_COLUMN, transaction.user_id.as_str())
            .with(SET_NAME_COLUMN, self.keyspace.set_name.as_str())
            .with(AMOUNT_COLUMN, transaction.amount);

        match self.store.put(&key, partial).await {
            Ok(()) => debug!("Transaction for seller [{}] stored", transaction.seller_id),
            Err(error) => match self.write_policy {
                WriteFailurePolicy::Fail => return Err(PipelineError::Write(error)),
                WriteFailurePolicy::Continue => {
                    warn!("Transaction for seller [{}] was not stored: {error}", transaction.seller_id);
                }
            }
        }

        Ok(transaction)
    }
}
