use std::collections::HashSet;

use crate::models::errors::SchemaError;

pub const AMOUNT_COLUMN: &str = "AmountBin";
pub const TIME_COLUMN: &str = "TimeBin";
pub const CLASS_COLUMN: &str = "ClassBin";
pub const USER_ID_COLUMN: &str = "ID";
pub const SET_NAME_COLUMN: &str = "set_name";

/// Number of inputs the fraud model was trained with.
pub const FEATURE_LENGTH: usize = 29;

const PRINCIPAL_COMPONENTS: usize = 28;

/// The declared layout of the feature vector.
///
/// Each column's index in `columns` is its slot in the vector, independent of
/// how the store happens to iterate a record. The time and classification
/// columns can never be part of the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<String>,
    expected_len: usize
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>, expected_len: usize) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty)
        }

        if columns.len() > expected_len {
            return Err(SchemaError::TooManyColumns { columns: columns.len(), expected_len })
        }

        let mut seen = HashSet::new();

        for column in &columns {
            if column == TIME_COLUMN || column == CLASS_COLUMN {
                return Err(SchemaError::ExcludedColumn(column.clone()))
            }

            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()))
            }
        }

        Ok(Self { columns, expected_len })
    }

    /// `V1`..`V28` followed by the amount column.
    pub fn credit_card() -> Self {
        let mut columns: Vec<String> = (1..=PRINCIPAL_COMPONENTS).map(|index| format!("V{index}")).collect();
        columns.push(AMOUNT_COLUMN.to_string());

        Self { columns, expected_len: FEATURE_LENGTH }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn expected_len(&self) -> usize {
        self.expected_len
    }

    /// Columns the enrichment read must fetch: the layout plus the ground truth.
    pub fn lookup_fields(&self) -> Vec<&str> {
        self.columns.iter()
            .map(String::as_str)
            .chain(std::iter::once(CLASS_COLUMN))
            .collect()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::credit_card()
    }
}
