mod enrich;
mod errors;
mod ingest;
#[cfg(test)]
mod tests;
mod validate;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::inference::InferenceClient;
use crate::models::{FeatureSchema, MissingValuePolicy, Verdict};
use crate::storage::{FeatureStore, Keyspace};
use crate::types::Class;

pub use enrich::Enrichment;
pub use errors::PipelineError;
pub use ingest::{Ingestion, WriteFailurePolicy};
pub use validate::Validator;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub keyspace: Keyspace,
    pub schema: FeatureSchema,
    pub missing_values: MissingValuePolicy,
    pub write_failure: WriteFailurePolicy
}

/// What a successfully processed request produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub verdict: Verdict,
    pub ground_truth: Option<Class>,
    /// `None` when there was no ground truth to validate against.
    pub agreement: Option<bool>
}

/// Ingestion → Enrichment → Inference → Validation for one transaction.
///
/// Stages run strictly in sequence and the first failure aborts the request.
/// The only state shared across requests lives in the store and the validator tally.
pub struct Pipeline<S> {
    ingestion: Ingestion<S>,
    enrichment: Enrichment<S>,
    inference: InferenceClient,
    validator: Validator
}

impl<S: FeatureStore> Pipeline<S> {
    pub fn new(store: Arc<S>, settings: PipelineSettings, inference: InferenceClient) -> Self {
        Self {
            ingestion: Ingestion::new(store.clone(), settings.keyspace.clone(), settings.write_failure),
            enrichment: Enrichment::new(store, settings.keyspace, settings.schema, settings.missing_values),
            inference,
            validator: Validator::new()
        }
    }

    pub async fn process(&self, body: &[u8]) -> Result<Outcome, PipelineError> {
        let transaction = self.ingestion.ingest(body).await?;
        let enriched = self.enrichment.enrich(&transaction).await?;
        let verdict = self.inference.predict(&enriched.vector).await?;

        let agreement = match enriched.ground_truth {
            Some(ground_truth) => Some(self.validator.validate(&transaction.user_id, ground_truth, &verdict)),
            None => {
                warn!("No ground truth stored for user [{}], prediction not validated", transaction.user_id);
                None
            }
        };

        debug!("Transaction for user [{}] item [{}] processed", transaction.user_id, transaction.item_id);

        Ok(Outcome {
            verdict,
            ground_truth: enriched.ground_truth,
            agreement
        })
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}
