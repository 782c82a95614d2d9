// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// From the input table to three partitions:
//
//   input table
//       │
//       ▼
//   CsvLoader         → reads one column, drops nulls
//       │
//       ▼
//   split_dataset     → seeded two-stage shuffle and cut
//       │
//       ▼
//   Splits            → train / valid / test vectors
//
// Persisting the partitions is Layer 6 (infra).

/// Reads the sequence column from a delimited table
pub mod loader;

/// Seeded train/valid/test partitioning
pub mod splitter;

/// The partition container and per-split counts
pub mod dataset;
