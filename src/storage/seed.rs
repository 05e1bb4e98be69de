use crate::models::{FeatureRecord, USER_ID_COLUMN};
use crate::storage::{FeatureStore, Keyspace, SeedError};
use crate::types::FieldValue;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use tracing::{error, info};

/// Loads reference records from a CSV file into the store.
///
/// The header row names the bins and the `ID` column keys each record. Cells
/// that parse as floats are stored as floats, everything else as text. Rows
/// that cannot be read or carry no ID are logged and skipped.
pub async fn load_csv<S: FeatureStore>(path: &Path, store: &S, keyspace: &Keyspace) -> Result<usize, SeedError> {
    let owned_path = path.to_path_buf();
    let rows = spawn_blocking(move || read_rows(owned_path)).await??;
    let mut loaded = 0;

    for (user_key, record) in rows {
        let key = keyspace.key(&user_key)?;
        store.put(&key, record).await?;
        loaded += 1;
    }

    info!("Loaded {loaded} reference records from {}", path.display());

    Ok(loaded)
}

fn read_rows(path: PathBuf) -> Result<Vec<(String, FeatureRecord)>, SeedError> {
    let file = File::open(&path).map_err(|source| SeedError::Open {
        path: path.display().to_string(),
        source
    })?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    let id_index = headers.iter()
        .position(|name| name == USER_ID_COLUMN)
        .ok_or(SeedError::MissingIdColumn(USER_ID_COLUMN))?;

    let mut rows = Vec::new();

    for (index, result) in reader.records().enumerate() {
        //NOTE: +2 accounts for the header row and 1-based line numbers
        let line = index + 2;

        let row = match result {
            Ok(row) => row,
            Err(error) => {
                error!("Seed CSV line {line} could not be read: {error}");
                continue;
            }
        };

        let user_key = row.get(id_index).unwrap_or_default();

        if user_key.is_empty() {
            error!("Seed CSV line {line} has no [{USER_ID_COLUMN}] value");
            continue;
        }

        let mut record = FeatureRecord::new();

        for (column, cell) in headers.iter().zip(row.iter()) {
            if column != USER_ID_COLUMN {
                record.insert(column, FieldValue::parse(cell));
            }
        }

        rows.push((user_key.to_string(), record));
    }

    Ok(rows)
}
