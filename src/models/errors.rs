use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Malformed transaction: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed transaction: [{0}] must not be empty")]
    EmptyIdentifier(&'static str)
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("Feature schema has no columns")]
    Empty,
    #[error("Feature schema lists column [{0}] more than once")]
    DuplicateColumn(String),
    #[error("Feature schema must not list the excluded column [{0}]")]
    ExcludedColumn(String),
    #[error("Feature schema has {columns} columns but the feature vector holds {expected_len}")]
    TooManyColumns {
        columns: usize,
        expected_len: usize
    }
}
