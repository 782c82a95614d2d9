// ============================================================
// Layer 3: Record Domain Type
// ============================================================
// One sequence taken from one row of the input table.
// The serialised form of a Record is exactly the JSON object
// stored as an LMDB value: {"seq": "..."}.

use serde::{Deserialize, Serialize};

/// A single sequence record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// The raw sequence text exactly as it appeared in the table
    pub seq: String,
}

impl Record {
    pub fn new(seq: impl Into<String>) -> Self {
        Self { seq: seq.into() }
    }
}
