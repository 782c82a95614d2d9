// ============================================================
// Layer 6: LMDB Store Writer and Reader
// ============================================================
// Each split is written to its own LMDB environment directory
// (data.mdb + lock.mdb) through heed, using the unnamed main
// database so any LMDB reader can open it.
//
// One store = one write transaction:
//   1. create the destination directory (idempotent)
//   2. open the environment with the configured map size
//   3. clear previous entries, put "0".."N-1" and "length"
//   4. commit
//   5. close the environment, on success and on failure
//
// If anything fails before commit the transaction is aborted
// when it is dropped, so a reader never sees a partial store.
//
// Reference: heed crate documentation (EnvOpenOptions, RwTxn)

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, MdbError};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::{PipelineError, Result};
use crate::domain::record::Record;
use crate::domain::traits::RecordSink;
use crate::infra::encoding::{
    decode_length, decode_record, encode_length, encode_record, index_key, parse_index_key,
    LENGTH_KEY,
};

pub const MIB: usize = 1024 * 1024;

/// 10 GiB, sparse on disk until used
pub const DEFAULT_MAP_SIZE_MIB: usize = 10 * 1024;

type RawDb = Database<Bytes, Bytes>;

/// Writes one split into an LMDB environment.
/// Implements the RecordSink trait from Layer 3.
pub struct LmdbStoreWriter {
    /// Maximum size of the memory map, in bytes
    map_size: usize,
}

impl LmdbStoreWriter {
    pub fn new(map_size: usize) -> Self {
        Self { map_size }
    }
}

impl RecordSink for LmdbStoreWriter {
    fn write_split(&self, dest: &Path, records: &[Record]) -> Result<()> {
        fs::create_dir_all(dest).map_err(|e| {
            PipelineError::store_write(dest, format!("cannot create directory: {e}"))
        })?;

        let env = open_env(dest, Some(self.map_size))
            .map_err(|e| PipelineError::store_write(dest, e))?;

        let outcome = put_all(&env, records);

        // Release the environment before reporting either way
        env.prepare_for_closing().wait();

        outcome.map_err(|e| PipelineError::store_write(dest, describe(e)))?;

        tracing::info!(
            "Created LMDB dataset at {} with {} samples.",
            dest.display(),
            records.len()
        );
        Ok(())
    }
}

/// The single write transaction for one store.
fn put_all(env: &Env, records: &[Record]) -> heed::Result<()> {
    let mut wtxn = env.write_txn()?;
    let db: RawDb = env.create_database(&mut wtxn, None)?;

    // A re-run over an existing store must not leave stale indices
    db.clear(&mut wtxn)?;

    for (i, record) in records.iter().enumerate() {
        let value = encode_record(record).map_err(|e| heed::Error::Encoding(Box::new(e)))?;
        db.put(&mut wtxn, &index_key(i), &value)?;
    }
    db.put(&mut wtxn, LENGTH_KEY, &encode_length(records.len()))?;

    wtxn.commit()
}

fn describe(err: heed::Error) -> String {
    match err {
        heed::Error::Mdb(MdbError::MapFull) => {
            "map size too small for the data (MDB_MAP_FULL); raise --map-size-mib".to_string()
        }
        other => format!("transaction failed: {other}"),
    }
}

fn open_env(path: &Path, map_size: Option<usize>) -> heed::Result<Env> {
    let mut options = EnvOpenOptions::new();
    if let Some(size) = map_size {
        options.map_size(size);
    }
    // SAFETY: each store directory is opened once at a time by this
    // process and is closed before the next open of the same path.
    unsafe { options.open(path) }
}

/// Write raw key/value pairs into a store in one transaction,
/// bypassing the record contract. Used to build malformed stores.
#[cfg(test)]
pub(crate) fn write_raw_entries(dest: &Path, entries: &[(&[u8], &[u8])]) -> heed::Result<()> {
    fs::create_dir_all(dest).map_err(heed::Error::Io)?;
    let env = open_env(dest, Some(16 * MIB))?;
    let outcome = (|| {
        let mut wtxn = env.write_txn()?;
        let db: RawDb = env.create_database(&mut wtxn, None)?;
        for (key, value) in entries {
            db.put(&mut wtxn, key, value)?;
        }
        wtxn.commit()
    })();
    env.prepare_for_closing().wait();
    outcome
}

// ─── StoreReader ──────────────────────────────────────────────────────────────
/// Read access to a store written by LmdbStoreWriter (or by any
/// tool following the same key/value contract).
pub struct StoreReader {
    path:   PathBuf,
    env:    Env,
    db:     RawDb,
    length: usize,
}

impl StoreReader {
    /// Open an existing store and decode its "length" sentinel.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.join("data.mdb").is_file() {
            return Err(PipelineError::store_read(&path, "not an LMDB store (no data.mdb)"));
        }

        let env  = open_env(&path, None).map_err(|e| PipelineError::store_read(&path, e))?;
        let rtxn = env.read_txn().map_err(|e| PipelineError::store_read(&path, e))?;

        let db: RawDb = env
            .open_database(&rtxn, None)
            .map_err(|e| PipelineError::store_read(&path, e))?
            .ok_or_else(|| PipelineError::store_read(&path, "main database missing"))?;

        let raw = db
            .get(&rtxn, LENGTH_KEY)
            .map_err(|e| PipelineError::store_read(&path, e))?
            .ok_or_else(|| PipelineError::store_read(&path, "missing 'length' key"))?;
        let length = decode_length(raw).ok_or_else(|| {
            PipelineError::store_read(
                &path,
                format!("'length' is not a decimal count: {:?}", String::from_utf8_lossy(raw)),
            )
        })?;
        drop(rtxn);

        Ok(Self { path, env, db, length })
    }

    /// The decoded value of the "length" key
    pub fn len(&self) -> usize {
        self.length
    }

    /// Number of keys other than "length"
    pub fn entry_count(&self) -> Result<usize> {
        let rtxn = self.env.read_txn().map_err(|e| self.read_error(e))?;
        let mut count = 0;
        for entry in self.db.iter(&rtxn).map_err(|e| self.read_error(e))? {
            let (key, _) = entry.map_err(|e| self.read_error(e))?;
            if key != LENGTH_KEY {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Fetch and decode the record stored under `index`.
    pub fn get(&self, index: usize) -> Result<Option<Record>> {
        let rtxn = self.env.read_txn().map_err(|e| self.read_error(e))?;
        let raw = self
            .db
            .get(&rtxn, &index_key(index))
            .map_err(|e| self.read_error(e))?;
        match raw {
            Some(bytes) => decode_record(bytes)
                .map(Some)
                .map_err(|e| self.read_error(format!("record {index}: {e}"))),
            None => Ok(None),
        }
    }

    /// All records in index order. Every index below len() must exist.
    pub fn records(&self) -> Result<Vec<Record>> {
        (0..self.length)
            .map(|i| {
                self.get(i)?
                    .ok_or_else(|| self.read_error(format!("record {i} missing")))
            })
            .collect()
    }

    /// Check that every record key is an index below "length" and
    /// that "length" matches the number of record entries.
    pub fn verify(&self) -> Result<()> {
        let rtxn = self.env.read_txn().map_err(|e| self.read_error(e))?;
        let mut entries = 0;
        for entry in self.db.iter(&rtxn).map_err(|e| self.read_error(e))? {
            let (key, _) = entry.map_err(|e| self.read_error(e))?;
            if key == LENGTH_KEY {
                continue;
            }
            match parse_index_key(key) {
                Some(i) if i < self.length => entries += 1,
                _ => {
                    return Err(self.read_error(format!(
                        "unexpected key {:?}",
                        String::from_utf8_lossy(key)
                    )))
                }
            }
        }
        if entries != self.length {
            return Err(self.read_error(format!(
                "'length' says {} but store holds {} entries",
                self.length, entries
            )));
        }
        Ok(())
    }

    /// Close the environment and wait until LMDB has released it.
    pub fn close(self) {
        self.env.prepare_for_closing().wait();
    }

    fn read_error(&self, reason: impl ToString) -> PipelineError {
        PipelineError::store_read(&self.path, reason)
    }
}
