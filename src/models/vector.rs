use serde::Serialize;

/// How a slot is filled when its source value is absent or unusable.
///
/// `ZeroFill` covers a missing column, a value with no numeric reading, a
/// non-finite result, and any trailing slot the schema does not cover.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum MissingValuePolicy {
    #[default]
    ZeroFill
}

impl MissingValuePolicy {
    pub fn fill(&self) -> f64 {
        match self {
            MissingValuePolicy::ZeroFill => 0.0
        }
    }
}

/// A fixed-length ordered model input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// A vector of `len` slots, each pre-set by the policy.
    pub fn filled(len: usize, policy: MissingValuePolicy) -> Self {
        Self(vec![policy.fill(); len])
    }

    pub fn set(&mut self, slot: usize, value: f64) {
        self.0[slot] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
