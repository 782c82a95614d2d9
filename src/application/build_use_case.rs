// ============================================================
// Layer 2: BuildUseCase
// ============================================================
// Runs the dataset build in order:
//
//   Step 1: Validate split fractions    (Layer 3 - domain)
//   Step 2: Load the sequence column    (Layer 4 - data)
//   Step 3: Seeded train/valid/test cut (Layer 4 - data)
//   Step 4: Write one store per split   (Layer 6 - infra)
//   Step 5: Write the build manifest    (Layer 6 - infra)
//
// Step 1 happens before any file is read or created. Any
// manifest left by an earlier build is removed before the first
// store is written. The three stores are written one after
// another; the first failure stops the build.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::SplitCounts,
    loader::CsvLoader,
    splitter::split_dataset,
};
use crate::domain::{
    split::{SplitConfig, SplitName},
    traits::{RecordSink, RecordSource},
};
use crate::infra::{
    lmdb_store::{LmdbStoreWriter, DEFAULT_MAP_SIZE_MIB, MIB},
    manifest::BuildManifest,
};

// ─── Build Configuration ─────────────────────────────────────────────────────
// Everything that determines a build. Serialisable so it can be
// recorded next to the stores in build_manifest.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub input_path:   PathBuf,
    pub output_dir:   PathBuf,
    pub column:       String,
    pub delimiter:    char,
    #[serde(flatten)]
    pub split:        SplitConfig,
    pub map_size_mib: usize,
}

impl BuildConfig {
    /// Config with the default column, fractions, seed and map size
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path:   input_path.into(),
            output_dir:   output_dir.into(),
            column:       "Sequence".to_string(),
            delimiter:    ',',
            split:        SplitConfig::default(),
            map_size_mib: DEFAULT_MAP_SIZE_MIB,
        }
    }

    pub fn split_dir(&self, name: SplitName) -> PathBuf {
        self.output_dir.join(name.as_str())
    }
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub counts:     SplitCounts,
}

// ─── BuildUseCase ─────────────────────────────────────────────────────────────
pub struct BuildUseCase {
    config: BuildConfig,
}

impl BuildUseCase {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build from the configured CSV into LMDB stores
    pub fn execute(&self) -> Result<BuildReport> {
        let cfg = &self.config;

        // ── Step 1: Validate before touching any file ────────────────────────
        cfg.split.validate()?;
        ensure!(
            cfg.delimiter.is_ascii(),
            "delimiter must be a single ASCII character, got {:?}",
            cfg.delimiter
        );
        ensure!(cfg.map_size_mib > 0, "map size must be at least 1 MiB");
        let map_size = cfg.map_size_mib.checked_mul(MIB).with_context(|| {
            format!("map size of {} MiB does not fit in memory addresses", cfg.map_size_mib)
        })?;

        let loader = CsvLoader::new(&cfg.input_path, cfg.column.as_str())
            .with_delimiter(cfg.delimiter as u8);
        let writer = LmdbStoreWriter::new(map_size);

        self.run_with(&loader, &writer)
    }

    /// Steps 2-5 against any record source and sink
    pub fn run_with(&self, source: &dyn RecordSource, sink: &dyn RecordSink) -> Result<BuildReport> {
        let cfg = &self.config;
        cfg.split.validate()?;

        // ── Step 2: Load records ─────────────────────────────────────────────
        let records = source.load_all()?;

        // ── Step 3: Split ────────────────────────────────────────────────────
        let splits = split_dataset(records, &cfg.split)?;
        let counts = splits.counts();
        for name in SplitName::ALL {
            tracing::info!("{} samples: {}", name, counts.get(name));
        }

        // ── Step 4: One store per split ──────────────────────────────────────
        BuildManifest::remove(&cfg.output_dir)?;
        for name in SplitName::ALL {
            sink.write_split(&cfg.split_dir(name), splits.get(name))?;
        }

        // ── Step 5: Manifest ─────────────────────────────────────────────────
        BuildManifest::new(cfg.clone(), counts).save(&cfg.output_dir)?;

        Ok(BuildReport { output_dir: cfg.output_dir.clone(), counts })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PipelineError;
    use crate::domain::record::Record;
    use crate::infra::lmdb_store::StoreReader;
    use crate::infra::manifest::BuildManifest;
    use std::collections::HashSet;
    use std::path::Path;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, rows: usize) -> PathBuf {
        let path = dir.path().join("seqs.csv");
        let mut body = String::from("id,Sequence\n");
        for i in 0..rows {
            body.push_str(&format!("{i},MKV{i}ACGT\n"));
        }
        fs::write(&path, body).unwrap();
        path
    }

    fn small_config(input: PathBuf, output: PathBuf) -> BuildConfig {
        BuildConfig { map_size_mib: 16, ..BuildConfig::new(input, output) }
    }

    fn read_split(output: &Path, name: SplitName) -> Vec<Record> {
        let reader = StoreReader::open(output.join(name.as_str())).unwrap();
        reader.verify().unwrap();
        let recs = reader.records().unwrap();
        reader.close();
        recs
    }

    #[test]
    fn test_reference_build() {
        let dir    = TempDir::new().unwrap();
        let input  = write_csv(&dir, 100);
        let output = dir.path().join("lmdb");

        let report = BuildUseCase::new(small_config(input, output.clone())).execute().unwrap();
        assert_eq!(report.counts, SplitCounts { train: 80, valid: 10, test: 10 });
        assert_eq!(report.counts.total(), 100);

        for name in SplitName::ALL {
            let reader = StoreReader::open(output.join(name.as_str())).unwrap();
            assert_eq!(reader.len(), report.counts.get(name));
            assert_eq!(reader.entry_count().unwrap(), reader.len());
            reader.close();
        }
    }

    #[test]
    fn test_union_equals_input_and_text_round_trips() {
        let dir    = TempDir::new().unwrap();
        let input  = write_csv(&dir, 57);
        let output = dir.path().join("lmdb");

        BuildUseCase::new(small_config(input, output.clone())).execute().unwrap();

        let mut all = Vec::new();
        for name in SplitName::ALL {
            all.extend(read_split(&output, name));
        }
        assert_eq!(all.len(), 57);

        let seen: HashSet<String>     = all.into_iter().map(|r| r.seq).collect();
        let expected: HashSet<String> = (0..57).map(|i| format!("MKV{i}ACGT")).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let dir   = TempDir::new().unwrap();
        let input = write_csv(&dir, 64);
        let out_a = dir.path().join("a");
        let out_b = dir.path().join("b");

        BuildUseCase::new(small_config(input.clone(), out_a.clone())).execute().unwrap();
        BuildUseCase::new(small_config(input, out_b.clone())).execute().unwrap();

        for name in SplitName::ALL {
            assert_eq!(read_split(&out_a, name), read_split(&out_b, name));
        }
    }

    #[test]
    fn test_rerun_into_same_directory() {
        let dir    = TempDir::new().unwrap();
        let input  = write_csv(&dir, 30);
        let output = dir.path().join("lmdb");
        let cfg    = small_config(input, output.clone());

        let first  = BuildUseCase::new(cfg.clone()).execute().unwrap();
        let second = BuildUseCase::new(cfg).execute().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_manifest_written() {
        let dir    = TempDir::new().unwrap();
        let input  = write_csv(&dir, 20);
        let output = dir.path().join("lmdb");
        let cfg    = small_config(input, output.clone());

        let report   = BuildUseCase::new(cfg.clone()).execute().unwrap();
        let manifest = BuildManifest::load(&output).unwrap();
        assert_eq!(manifest.config, cfg);
        assert_eq!(manifest.counts, report.counts);
    }

    #[test]
    fn test_bad_fractions_fail_before_io() {
        let dir    = TempDir::new().unwrap();
        let output = dir.path().join("lmdb");
        let mut cfg = small_config(dir.path().join("absent.csv"), output.clone());
        cfg.split = SplitConfig::new(0.6, 0.5, 42);

        let err = BuildUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Config { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_oversized_map_rejected_before_io() {
        let dir    = TempDir::new().unwrap();
        let input  = write_csv(&dir, 10);
        let output = dir.path().join("lmdb");
        let mut cfg = small_config(input, output.clone());
        cfg.map_size_mib = usize::MAX / 2;

        let err = BuildUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("MiB"));
        assert!(!output.exists());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected_before_io() {
        let dir    = TempDir::new().unwrap();
        let input  = write_csv(&dir, 10);
        let output = dir.path().join("lmdb");
        let mut cfg = small_config(input, output.clone());
        cfg.delimiter = '§';

        let err = BuildUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("ASCII"));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let cfg = small_config(dir.path().join("absent.csv"), dir.path().join("lmdb"));

        let err = BuildUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InputNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let dir   = TempDir::new().unwrap();
        let input = dir.path().join("seqs.csv");
        fs::write(&input, "Sequence\nMKV\n").unwrap();
        let mut cfg = small_config(input, dir.path().join("lmdb"));
        cfg.column = "Foo".to_string();

        let err = BuildUseCase::new(cfg).execute().unwrap_err();
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::Schema { available, .. }) => {
                assert_eq!(available, &vec!["Sequence".to_string()]);
            }
            other => panic!("expected SchemaError, got {other:?}"),
        }
    }

    // ─── Source/sink seams ───────────────────────────────────────────────────
    struct FixedSource(Vec<Record>);

    impl RecordSource for FixedSource {
        fn load_all(&self) -> crate::domain::error::Result<Vec<Record>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSink;

    impl RecordSink for FailingSink {
        fn write_split(&self, dest: &Path, _records: &[Record]) -> crate::domain::error::Result<()> {
            Err(PipelineError::store_write(dest, "disk on fire"))
        }
    }

    /// Writes the train store for real, then fails on the next split.
    struct TrainOnlySink(LmdbStoreWriter);

    impl RecordSink for TrainOnlySink {
        fn write_split(&self, dest: &Path, records: &[Record]) -> crate::domain::error::Result<()> {
            if dest.ends_with(SplitName::Train.as_str()) {
                self.0.write_split(dest, records)
            } else {
                Err(PipelineError::store_write(dest, "disk on fire"))
            }
        }
    }

    #[test]
    fn test_failed_rebuild_drops_previous_manifest() {
        let dir    = TempDir::new().unwrap();
        let input  = write_csv(&dir, 100);
        let output = dir.path().join("lmdb");

        let first = BuildUseCase::new(small_config(input.clone(), output.clone())).execute().unwrap();
        assert_eq!(first.counts.train, 80);
        assert!(BuildManifest::load_if_present(&output).unwrap().is_some());

        let mut cfg = small_config(input.clone(), output.clone());
        cfg.split = SplitConfig::new(0.5, 0.1, 7);
        let source = FixedSource((0..100).map(|i| Record::new(format!("MKV{i}ACGT"))).collect());
        let sink   = TrainOnlySink(LmdbStoreWriter::new(16 * MIB));

        let err = BuildUseCase::new(cfg).run_with(&source, &sink).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::StoreWrite { .. })
        ));

        // The new train store committed, but no manifest claims the build
        let reader = StoreReader::open(output.join("train")).unwrap();
        assert_eq!(reader.len(), 40);
        reader.close();
        assert!(BuildManifest::load_if_present(&output).unwrap().is_none());
    }

    #[test]
    fn test_sink_failure_stops_build_without_manifest() {
        let dir    = TempDir::new().unwrap();
        let output = dir.path().join("lmdb");
        let source = FixedSource((0..10).map(|i| Record::new(format!("S{i}"))).collect());
        let uc     = BuildUseCase::new(small_config(dir.path().join("unused.csv"), output.clone()));

        let err = uc.run_with(&source, &FailingSink).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::StoreWrite { .. })
        ));
        assert!(!BuildManifest::path_in(&output).exists());
    }
}
