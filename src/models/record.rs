use std::collections::HashMap;

use crate::types::FieldValue;

/// A named-column value set as persisted in the feature store.
///
/// Column order carries no meaning here; positions are assigned by a `FeatureSchema`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    fields: HashMap<String, FieldValue>
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Overwrites the columns present in `other`, leaving the rest untouched.
    pub fn merge(&mut self, other: FeatureRecord) {
        self.fields.extend(other.fields);
    }

    /// Projects the record onto the requested columns. An empty list selects everything.
    pub fn select(&self, names: &[&str]) -> FeatureRecord {
        if names.is_empty() {
            return self.clone();
        }

        let fields = names.iter()
            .filter_map(|name| self.fields.get(*name).map(|value| (name.to_string(), value.clone())))
            .collect();

        FeatureRecord { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
