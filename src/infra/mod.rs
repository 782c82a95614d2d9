// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Everything that touches persisted output:
//
//   encoding.rs   - key/value byte contract of a store
//                   (decimal index keys, "length" sentinel,
//                   JSON {"seq": ...} values)
//
//   lmdb_store.rs - LmdbStoreWriter (one transaction per split)
//                   and StoreReader, both on heed/LMDB
//
//   manifest.rs   - build_manifest.json describing a finished
//                   build (config and per-split counts)

/// Store key and value encoding
pub mod encoding;

/// LMDB-backed store writer and reader
pub mod lmdb_store;

/// Build manifest persistence
pub mod manifest;
