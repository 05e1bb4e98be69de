use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record [{namespace}/{set_name}/{user_key}] was not found")]
    NotFound {
        namespace: String,
        set_name: String,
        user_key: String
    },
    #[error("Invalid store key: {0}")]
    InvalidKey(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String)
}

impl StoreError {
    pub fn not_found(key: &super::StoreKey) -> Self {
        Self::NotFound {
            namespace: key.keyspace.namespace.clone(),
            set_name: key.keyspace.set_name.clone(),
            user_key: key.user_key.clone()
        }
    }
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Error opening seed CSV at path: {path} | {source}")]
    Open {
        path: String,
        source: std::io::Error
    },
    #[error("Seed CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Seed CSV has no [{0}] column to key records by")]
    MissingIdColumn(&'static str),
    #[error("Seed CSV reader did not finish: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("Seed CSV could not be stored: {0}")]
    Store(#[from] StoreError)
}
