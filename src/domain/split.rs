// ============================================================
// Layer 3: Split Configuration
// ============================================================
// SplitConfig holds the two fractions and the seed that fully
// determine a partition. The fractions use different
// denominators:
//
//   test_fraction  - share of the whole dataset
//   valid_fraction - share of the whole dataset, re-derived
//                    against the non-test pool as
//                    valid_fraction / (1 - test_fraction)
//
// validate() must pass before any file is touched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub test_fraction:  f64,
    pub valid_fraction: f64,
    pub seed:           u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction:  0.1,
            valid_fraction: 0.1,
            seed:           42,
        }
    }
}

impl SplitConfig {
    pub fn new(test_fraction: f64, valid_fraction: f64, seed: u64) -> Self {
        Self { test_fraction, valid_fraction, seed }
    }

    /// Check both fractions lie in [0, 1) and leave a non-empty
    /// share for training. NaN fails the range check.
    pub fn validate(&self) -> Result<()> {
        let in_range = |f: f64| (0.0..1.0).contains(&f);

        if !in_range(self.test_fraction) {
            return Err(self.invalid("test_fraction must be in [0, 1)"));
        }
        if !in_range(self.valid_fraction) {
            return Err(self.invalid("valid_fraction must be in [0, 1)"));
        }
        if self.test_fraction + self.valid_fraction >= 1.0 {
            return Err(self.invalid("test_fraction + valid_fraction must be below 1"));
        }
        Ok(())
    }

    /// Validation fraction relative to the pool left after the
    /// test set is removed.
    pub fn adjusted_valid_fraction(&self) -> f64 {
        self.valid_fraction / (1.0 - self.test_fraction)
    }

    fn invalid(&self, reason: &str) -> PipelineError {
        PipelineError::Config {
            test_fraction:  self.test_fraction,
            valid_fraction: self.valid_fraction,
            reason:         reason.to_string(),
        }
    }
}

/// The three partitions, in the order their stores are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitName {
    Train,
    Valid,
    Test,
}

impl SplitName {
    pub const ALL: [SplitName; 3] = [SplitName::Train, SplitName::Valid, SplitName::Test];

    /// Directory name under the output root
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitName::Train => "train",
            SplitName::Valid => "valid",
            SplitName::Test  => "test",
        }
    }
}

impl fmt::Display for SplitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
