// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Orchestrates the other layers for one user-facing goal.
// No parsing, shuffling or LMDB code lives here, and nothing
// is printed (that is Layer 1).

// Build train/valid/test stores from an input table
pub mod build_use_case;

// Read back and check an existing store
pub mod inspect_use_case;
