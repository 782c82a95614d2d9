// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust types and traits describing what the pipeline
// works with:
//
//   record.rs  - one sequence read from the input table
//   split.rs   - split fractions, seed and the three split names
//   error.rs   - the typed failures every layer reports
//   traits.rs  - the seams between loading and persisting
//
// Nothing in this layer touches the filesystem or LMDB.

// A single sequence record
pub mod record;

// Split configuration and split identifiers
pub mod split;

// PipelineError and the Result alias
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
