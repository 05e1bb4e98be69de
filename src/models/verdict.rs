use crate::types::Class;

/// The thresholded outcome of one inference call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub class: Class,
    /// The raw score the backend returned.
    pub score: f64
}

impl Verdict {
    pub fn from_score(score: f64, threshold: f64) -> Self {
        Self {
            class: Class::from_score(score, threshold),
            score
        }
    }
}
