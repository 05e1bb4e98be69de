use super::errors::ErrorKind;
use super::validate::ValidationTally;
use super::{Enrichment, Ingestion, Pipeline, PipelineError, PipelineSettings, Validator, WriteFailurePolicy};
use crate::inference::{InferenceClient, InferenceConfig, InferenceError, RetryPolicy};
use crate::models::{
    FeatureRecord, FeatureSchema, MissingValuePolicy, TransactionError, TransactionEvent, Verdict, AMOUNT_COLUMN,
    CLASS_COLUMN, SET_NAME_COLUMN, TIME_COLUMN, USER_ID_COLUMN
};
use crate::storage::{FeatureStore, Keyspace, MemoryStore, StoreError, StoreKey};
use crate::types::{Class, FieldValue};
use anyhow::{anyhow, Result};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOLERANCE: f64 = 1e-9;

/// Accepts reads but refuses every write.
struct ReadOnlyStore {
    inner: MemoryStore
}

impl FeatureStore for ReadOnlyStore {
    async fn put(&self, _key: &StoreKey, _fields: FeatureRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store is read-only".to_string()))
    }

    async fn get(&self, key: &StoreKey, fields: &[&str]) -> Result<FeatureRecord, StoreError> {
        self.inner.get(key, fields).await
    }
}

fn keyspace() -> Keyspace {
    Keyspace::new("test", "creditcard")
}

/// `f0`..`f27` followed by the amount column.
fn indexed_schema() -> Result<FeatureSchema> {
    let mut columns: Vec<String> = (0..28).map(|index| format!("f{index}")).collect();
    columns.push(AMOUNT_COLUMN.to_string());

    Ok(FeatureSchema::new(columns, 29)?)
}

fn indexed_record(amount: f64, class: &str) -> FeatureRecord {
    let mut record = FeatureRecord::new()
        .with(AMOUNT_COLUMN, amount)
        .with(CLASS_COLUMN, class)
        .with(TIME_COLUMN, 406.0);

    for index in 0..28 {
        record.insert(format!("f{index}"), 0.1);
    }

    record
}

fn transaction_body(user_id: &str, seller_id: &str, amount: f64) -> Vec<u8> {
    json!({
        "Timestamp": "2024-03-01T10:00:00Z",
        "Amount": amount,
        "UserID": user_id,
        "SellerID": seller_id,
        "ItemID": "item-1"
    }).to_string().into_bytes()
}

fn transaction(user_id: &str) -> TransactionEvent {
    TransactionEvent {
        timestamp: "t".to_string(),
        amount: 1.0,
        user_id: user_id.to_string(),
        seller_id: "seller".to_string(),
        item_id: "item".to_string()
    }
}

fn settings(schema: FeatureSchema, write_failure: WriteFailurePolicy) -> PipelineSettings {
    PipelineSettings {
        keyspace: keyspace(),
        schema,
        missing_values: MissingValuePolicy::ZeroFill,
        write_failure
    }
}

fn inference_client(server: &MockServer, timeout: Duration) -> Result<InferenceClient> {
    Ok(InferenceClient::new(InferenceConfig {
        endpoint: format!("{}/v1/models/fraud:predict", server.uri()),
        timeout,
        threshold: 0.5,
        retry: RetryPolicy::default()
    })?)
}

async fn backend_scoring(score: f64) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "outputs": [[score]] })))
        .mount(&server)
        .await;

    server
}

async fn seeded_store(user_id: &str, record: FeatureRecord) -> Result<Arc<MemoryStore>> {
    let store = Arc::new(MemoryStore::new());
    store.put(&keyspace().key(user_id)?, record).await?;
    Ok(store)
}

#[tokio::test]
async fn test_ingest_writes_partial_record_under_seller() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let ingestion = Ingestion::new(store.clone(), keyspace(), WriteFailurePolicy::Fail);

    let event = ingestion.ingest(&transaction_body("user-1", "seller-9", 42.5)).await?;

    assert_eq!(event.user_id, "user-1");
    assert_eq!(event.seller_id, "seller-9");
    assert_eq!(event.amount, 42.5);

    let stored = store.get(&keyspace().key("seller-9")?, &[]).await?;

    assert_eq!(stored.len(), 3);
    assert_eq!(stored.get(USER_ID_COLUMN), Some(&FieldValue::Text("user-1".to_string())));
    assert_eq!(stored.get(SET_NAME_COLUMN), Some(&FieldValue::Text("creditcard".to_string())));
    assert_eq!(stored.get(AMOUNT_COLUMN), Some(&FieldValue::Float(42.5)));
    assert!(store.get(&keyspace().key("user-1")?, &[]).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_ingest_rejects_malformed_body_without_writing() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let ingestion = Ingestion::new(store.clone(), keyspace(), WriteFailurePolicy::Fail);

    let result = ingestion.ingest(br#"{"Amount": "lots", "UserID": "u"}"#).await;

    assert!(matches!(result, Err(PipelineError::MalformedTransaction(_))));
    assert!(store.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_ingest_write_failure_follows_policy() -> Result<()> {
    let store = Arc::new(ReadOnlyStore { inner: MemoryStore::new() });
    let body = transaction_body("user-1", "seller-1", 10.0);

    let failing = Ingestion::new(store.clone(), keyspace(), WriteFailurePolicy::Fail);
    let result = failing.ingest(&body).await;

    assert!(matches!(result, Err(PipelineError::Write(StoreError::Unavailable(_)))));

    let continuing = Ingestion::new(store, keyspace(), WriteFailurePolicy::Continue);

    assert_eq!(continuing.ingest(&body).await?.seller_id, "seller-1");

    Ok(())
}

#[tokio::test]
async fn test_enrich_places_columns_by_schema_not_store_order() -> Result<()> {
    let schema = FeatureSchema::new(vec!["b".to_string(), "a".to_string(), "c".to_string()], 3)?;
    let record = FeatureRecord::new().with("a", 1.0).with("b", 2.0).with("c", 3.0);
    let store = seeded_store("user-1", record).await?;
    let enrichment = Enrichment::new(store, keyspace(), schema, MissingValuePolicy::ZeroFill);

    let enriched = enrichment.enrich(&transaction("user-1")).await?;

    assert_eq!(enriched.vector.as_slice(), &[2.0, 1.0, 3.0]);

    Ok(())
}

#[tokio::test]
async fn test_enrich_excludes_time_and_class_columns() -> Result<()> {
    let store = seeded_store("user-1", indexed_record(100.0, "1")).await?;
    let enrichment = Enrichment::new(store, keyspace(), indexed_schema()?, MissingValuePolicy::ZeroFill);

    let enriched = enrichment.enrich(&transaction("user-1")).await?;

    assert_eq!(enriched.vector.as_slice().len(), 29);
    assert!(enriched.vector.as_slice()[..28].iter().all(|value| *value == 0.1));
    assert!(!enriched.vector.as_slice().contains(&406.0));
    assert_eq!(enriched.ground_truth, Some(Class::Fraud));

    Ok(())
}

#[test]
fn test_assemble_zero_pads_short_records() -> Result<()> {
    let schema = FeatureSchema::new(vec!["a".to_string(), "b".to_string(), "c".to_string()], 5)?;
    let enrichment = Enrichment::new(Arc::new(MemoryStore::new()), keyspace(), schema, MissingValuePolicy::ZeroFill);

    let enriched = enrichment.assemble(&FeatureRecord::new().with("a", 0.7));

    assert_eq!(enriched.vector.as_slice(), &[0.7, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(enriched.ground_truth, None);

    Ok(())
}

#[test]
fn test_assemble_log_transforms_amount() -> Result<()> {
    let enrichment = Enrichment::new(Arc::new(MemoryStore::new()), keyspace(), indexed_schema()?, MissingValuePolicy::ZeroFill);

    let enriched = enrichment.assemble(&FeatureRecord::new().with(AMOUNT_COLUMN, std::f64::consts::E.powi(2)));
    let amount = enriched.vector.as_slice().get(28).ok_or_else(|| anyhow!("amount slot missing"))?;

    assert!((amount - 2.0).abs() < TOLERANCE);

    let from_text = enrichment.assemble(&FeatureRecord::new().with(AMOUNT_COLUMN, "100"));
    let amount = from_text.vector.as_slice().get(28).ok_or_else(|| anyhow!("amount slot missing"))?;

    assert!((amount - 100f64.ln()).abs() < TOLERANCE);

    Ok(())
}

#[test]
fn test_assemble_zero_fills_non_numeric_and_non_finite_values() -> Result<()> {
    let schema = FeatureSchema::new(vec!["a".to_string(), "b".to_string(), AMOUNT_COLUMN.to_string()], 3)?;
    let enrichment = Enrichment::new(Arc::new(MemoryStore::new()), keyspace(), schema, MissingValuePolicy::ZeroFill);

    let record = FeatureRecord::new()
        .with("a", "not-a-number")
        .with("b", "NaN")
        .with(AMOUNT_COLUMN, 0.0);

    assert_eq!(enrichment.assemble(&record).vector.as_slice(), &[0.0, 0.0, 0.0]);

    let negative_amount = FeatureRecord::new().with(AMOUNT_COLUMN, -5.0);

    assert_eq!(enrichment.assemble(&negative_amount).vector.as_slice(), &[0.0, 0.0, 0.0]);

    Ok(())
}

#[test]
fn test_assemble_ignores_unparseable_ground_truth() -> Result<()> {
    let enrichment = Enrichment::new(Arc::new(MemoryStore::new()), keyspace(), indexed_schema()?, MissingValuePolicy::ZeroFill);

    assert_eq!(enrichment.assemble(&FeatureRecord::new().with(CLASS_COLUMN, "maybe")).ground_truth, None);
    assert_eq!(enrichment.assemble(&FeatureRecord::new().with(CLASS_COLUMN, 0.0)).ground_truth, Some(Class::Legit));

    Ok(())
}

#[tokio::test]
async fn test_enrich_fails_for_unknown_user() -> Result<()> {
    let enrichment = Enrichment::new(Arc::new(MemoryStore::new()), keyspace(), indexed_schema()?, MissingValuePolicy::ZeroFill);

    let result = enrichment.enrich(&transaction("nobody")).await;

    assert!(matches!(result, Err(PipelineError::Lookup(StoreError::NotFound { .. }))));

    Ok(())
}

#[test]
fn test_validator_covers_every_class_combination() {
    let validator = Validator::new();
    let test_cases = vec![
        (Class::Fraud, Class::Fraud, true),
        (Class::Legit, Class::Legit, true),
        (Class::Fraud, Class::Legit, false),
        (Class::Legit, Class::Fraud, false),
    ];

    for (ground_truth, predicted, expected_agreement) in test_cases {
        let verdict = Verdict { class: predicted, score: 0.5 };
        assert_eq!(validator.validate("user-1", ground_truth, &verdict), expected_agreement);
    }

    assert_eq!(validator.tally(), ValidationTally { agreements: 2, disagreements: 2 });
}

#[tokio::test]
async fn test_pipeline_builds_log_amount_and_ground_truth() -> Result<()> {
    let server = backend_scoring(0.1).await;
    let store = seeded_store("user-1", indexed_record(100.0, "0")).await?;
    let settings = settings(indexed_schema()?, WriteFailurePolicy::Fail);
    let enrichment = Enrichment::new(store.clone(), settings.keyspace.clone(), settings.schema.clone(), settings.missing_values);
    let pipeline = Pipeline::new(store, settings, inference_client(&server, Duration::from_secs(5))?);

    let enriched = enrichment.enrich(&transaction("user-1")).await?;
    let amount = enriched.vector.as_slice().get(28).ok_or_else(|| anyhow!("amount slot missing"))?;

    assert!((amount - 4.605170185988092).abs() < TOLERANCE);
    assert_eq!(enriched.ground_truth, Some(Class::Legit));

    let outcome = pipeline.process(&transaction_body("user-1", "seller-1", 100.0)).await?;

    assert_eq!(outcome.verdict.class, Class::Legit);
    assert_eq!(outcome.ground_truth, Some(Class::Legit));
    assert_eq!(outcome.agreement, Some(true));

    Ok(())
}

#[tokio::test]
async fn test_pipeline_reports_disagreement_on_fraud_score() -> Result<()> {
    let server = backend_scoring(0.92).await;
    let store = seeded_store("user-1", indexed_record(100.0, "0")).await?;
    let pipeline = Pipeline::new(store, settings(indexed_schema()?, WriteFailurePolicy::Fail), inference_client(&server, Duration::from_secs(5))?);

    let outcome = pipeline.process(&transaction_body("user-1", "seller-1", 100.0)).await?;

    assert_eq!(outcome.verdict.class, Class::Fraud);
    assert_eq!(outcome.verdict.score, 0.92);
    assert_eq!(outcome.agreement, Some(false));
    assert_eq!(pipeline.validator().tally(), ValidationTally { agreements: 0, disagreements: 1 });

    Ok(())
}

#[tokio::test]
async fn test_pipeline_aborts_on_missing_user_without_calling_inference() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "outputs": [[0.9]] })))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let pipeline = Pipeline::new(store, settings(indexed_schema()?, WriteFailurePolicy::Fail), inference_client(&server, Duration::from_secs(5))?);

    let result = pipeline.process(&transaction_body("ghost", "seller-1", 10.0)).await;
    let error = result.err().ok_or_else(|| anyhow!("pipeline should have failed"))?;

    assert_eq!(error.kind(), ErrorKind::Lookup);

    Ok(())
}

#[tokio::test]
async fn test_pipeline_aborts_on_inference_timeout_before_validation() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "outputs": [[0.9]] }))
                .set_delay(Duration::from_millis(500))
        )
        .mount(&server)
        .await;

    let store = seeded_store("user-1", indexed_record(100.0, "0")).await?;
    let pipeline = Pipeline::new(store, settings(indexed_schema()?, WriteFailurePolicy::Fail), inference_client(&server, Duration::from_millis(100))?);

    let result = pipeline.process(&transaction_body("user-1", "seller-1", 10.0)).await;
    let error = result.err().ok_or_else(|| anyhow!("pipeline should have failed"))?;

    assert_eq!(error.kind(), ErrorKind::Transport);
    assert_eq!(pipeline.validator().tally(), ValidationTally::default());

    Ok(())
}

#[tokio::test]
async fn test_pipeline_skips_validation_without_ground_truth() -> Result<()> {
    let server = backend_scoring(0.7).await;
    let store = seeded_store("user-1", FeatureRecord::new().with("f0", 0.3)).await?;
    let pipeline = Pipeline::new(store, settings(indexed_schema()?, WriteFailurePolicy::Fail), inference_client(&server, Duration::from_secs(5))?);

    let outcome = pipeline.process(&transaction_body("user-1", "seller-1", 10.0)).await?;

    assert_eq!(outcome.verdict.class, Class::Fraud);
    assert_eq!(outcome.ground_truth, None);
    assert_eq!(outcome.agreement, None);
    assert_eq!(pipeline.validator().tally(), ValidationTally::default());

    Ok(())
}

#[tokio::test]
async fn test_pipeline_surfaces_malformed_backend_response_as_decode_error() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"outputs\": \"high\"}"))
        .mount(&server)
        .await;

    let store = seeded_store("user-1", indexed_record(100.0, "1")).await?;
    let pipeline = Pipeline::new(store, settings(indexed_schema()?, WriteFailurePolicy::Fail), inference_client(&server, Duration::from_secs(5))?);

    let result = pipeline.process(&transaction_body("user-1", "seller-1", 10.0)).await;

    assert!(matches!(result, Err(PipelineError::MalformedPrediction(_))));

    Ok(())
}

#[test]
fn test_error_kind_names_the_failing_stage() {
    let test_cases = vec![
        (PipelineError::MalformedTransaction(TransactionError::EmptyIdentifier("UserID")), ErrorKind::Decode, "decode"),
        (PipelineError::Write(StoreError::InvalidKey("empty".to_string())), ErrorKind::Write, "write"),
        (PipelineError::Lookup(StoreError::InvalidKey("empty".to_string())), ErrorKind::Lookup, "lookup"),
        (PipelineError::from(InferenceError::Status(503)), ErrorKind::Transport, "transport"),
        (PipelineError::from(InferenceError::Decode("eof".to_string())), ErrorKind::Decode, "decode"),
    ];

    for (error, expected_kind, expected_name) in test_cases {
        assert_eq!(error.kind(), expected_kind, "{error}");
        assert_eq!(error.kind().to_string(), expected_name);
    }
}
