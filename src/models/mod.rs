mod errors;
mod record;
mod schema;
mod transaction;
mod vector;
mod verdict;

pub use errors::{SchemaError, TransactionError};
pub use record::FeatureRecord;
pub use schema::{FeatureSchema, AMOUNT_COLUMN, CLASS_COLUMN, FEATURE_LENGTH, SET_NAME_COLUMN, USER_ID_COLUMN};
#[cfg(test)]
pub use schema::TIME_COLUMN;
pub use transaction::TransactionEvent;
pub use vector::{FeatureVector, MissingValuePolicy};
pub use verdict::Verdict;
