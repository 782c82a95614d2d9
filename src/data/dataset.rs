use serde::{Deserialize, Serialize};

use crate::domain::split::SplitName;

/// The three disjoint partitions produced by the splitter.
#[derive(Debug, Clone, PartialEq)]
pub struct Splits<T> {
    pub train: Vec<T>,
    pub valid: Vec<T>,
    pub test:  Vec<T>,
}

impl<T> Splits<T> {
    pub fn get(&self, name: SplitName) -> &[T] {
        match name {
            SplitName::Train => &self.train,
            SplitName::Valid => &self.valid,
            SplitName::Test  => &self.test,
        }
    }

    pub fn counts(&self) -> SplitCounts {
        SplitCounts {
            train: self.train.len(),
            valid: self.valid.len(),
            test:  self.test.len(),
        }
    }
}

/// Per-split record counts, as reported after a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCounts {
    pub train: usize,
    pub valid: usize,
    pub test:  usize,
}

impl SplitCounts {
    pub fn get(&self, name: SplitName) -> usize {
        match name {
            SplitName::Train => self.train,
            SplitName::Valid => self.valid,
            SplitName::Test  => self.test,
        }
    }

    pub fn total(&self) -> usize {
        self.train + self.valid + self.test
    }
}
