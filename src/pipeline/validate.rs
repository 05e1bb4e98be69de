use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use crate::models::Verdict;
use crate::types::Class;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ValidationTally {
    pub agreements: u64,
    pub disagreements: u64
}

/// Reconciles live verdicts against stored ground truth.
#[derive(Debug, Default)]
pub struct Validator {
    agreements: AtomicU64,
    disagreements: AtomicU64
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the verdict names the same class as the ground truth, and counts the outcome.
    pub fn validate(&self, user_id: &str, ground_truth: Class, verdict: &Verdict) -> bool {
        let agreement = ground_truth == verdict.class;

        if agreement {
            self.agreements.fetch_add(1, Ordering::Relaxed);
            info!("Prediction {} for user [{user_id}] agrees with ground truth", verdict.class);
        } else {
            self.disagreements.fetch_add(1, Ordering::Relaxed);
            warn!(
                "Prediction {} (score {}) for user [{user_id}] disagrees with ground truth {ground_truth}",
                verdict.class, verdict.score
            );
        }

        agreement
    }

    pub fn tally(&self) -> ValidationTally {
        ValidationTally {
            agreements: self.agreements.load(Ordering::Relaxed),
            disagreements: self.disagreements.load(Ordering::Relaxed)
        }
    }
}
