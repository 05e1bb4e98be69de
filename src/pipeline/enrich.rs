use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{
    FeatureRecord, FeatureSchema, FeatureVector, MissingValuePolicy, TransactionEvent, AMOUNT_COLUMN, CLASS_COLUMN
};
use crate::pipeline::PipelineError;
use crate::storage::{FeatureStore, Keyspace};
use crate::types::{Class, FieldValue};

/// The model input for one transaction plus the label it will be checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct Enriched {
    pub vector: FeatureVector,
    /// `None` when the stored record carries no usable classification.
    pub ground_truth: Option<Class>
}

/// Builds feature vectors from the originating user's stored record.
pub struct Enrichment<S> {
    store: Arc<S>,
    keyspace: Keyspace,
    schema: FeatureSchema,
    missing_values: MissingValuePolicy
}

impl<S: FeatureStore> Enrichment<S> {
    pub fn new(store: Arc<S>, keyspace: Keyspace, schema: FeatureSchema, missing_values: MissingValuePolicy) -> Self {
        Self { store, keyspace, schema, missing_values }
    }

    /// Looks up the user's record and assembles it.
    ///
    /// # Errors
    /// Returns `Lookup` if the record is absent or the store cannot be read.
    pub async fn enrich(&self, transaction: &TransactionEvent) -> Result<Enriched, PipelineError> {
        let key = self.keyspace.key(&transaction.user_id).map_err(PipelineError::Lookup)?;
        let fields = self.schema.lookup_fields();
        let record = self.store.get(&key, &fields).await
            .map_err(PipelineError::Lookup)?;

        if record.is_empty() {
            warn!("Record for user [{}] holds none of the schema columns", transaction.user_id);
        } else {
            debug!("Record for user [{}] holds {} of {} lookup fields", transaction.user_id, record.len(), fields.len());
        }

        Ok(self.assemble(&record))
    }

    /// Places each schema column at its declared slot.
    ///
    /// Missing, non-numeric and non-finite values are left to the missing-value
    /// policy, as are slots past the end of the schema. The amount column holds
    /// its natural logarithm.
    pub fn assemble(&self, record: &FeatureRecord) -> Enriched {
        let mut vector = FeatureVector::filled(self.schema.expected_len(), self.missing_values);

        for (slot, column) in self.schema.columns().iter().enumerate() {
            let Some(value) = record.get(column).and_then(FieldValue::as_f64) else {
                continue;
            };

            let value = if column == AMOUNT_COLUMN { value.ln() } else { value };

            if value.is_finite() {
                vector.set(slot, value);
            } else {
                warn!("Feature [{column}] is not finite, slot {slot} keeps its default");
            }
        }

        let ground_truth = record.get(CLASS_COLUMN).and_then(|value| {
            Class::from_field(value)
                .inspect_err(|error| warn!("Ground truth ignored: {error}"))
                .ok()
        });

        Enriched { vector, ground_truth }
    }
}
