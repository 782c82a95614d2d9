// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits:
//
//   RecordSource - anything that yields the ordered records
//                  (CsvLoader reads a delimited table)
//   RecordSink   - anything that persists one split's records
//                  (LmdbStoreWriter writes an LMDB environment)

use std::path::Path;

use crate::domain::error::Result;
use crate::domain::record::Record;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load the ordered sequence records.
pub trait RecordSource {
    /// Load every non-null record, in source order.
    fn load_all(&self) -> Result<Vec<Record>>;
}

// ─── RecordSink ───────────────────────────────────────────────────────────────
/// Any component that can persist a split at a destination.
///
/// A call either commits every record plus the length sentinel,
/// or leaves nothing new visible at `dest`.
pub trait RecordSink {
    fn write_split(&self, dest: &Path, records: &[Record]) -> Result<()>;
}
