// ============================================================
// Layer 2: InspectUseCase
// ============================================================
// Opens one store, checks that "length" matches the number of
// record entries, and returns the first few records. When the
// store sits in a build output directory, the build manifest
// next to it is returned too.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::domain::record::Record;
use crate::infra::lmdb_store::StoreReader;
use crate::infra::manifest::BuildManifest;

#[derive(Debug, Clone, PartialEq)]
pub struct InspectReport {
    pub length:  usize,
    pub entries: usize,
    pub sample:  Vec<Record>,
    /// Manifest of the build that wrote this store, if present
    pub manifest: Option<BuildManifest>,
}

pub struct InspectUseCase {
    store: PathBuf,
    show:  usize,
}

impl InspectUseCase {
    pub fn new(store: impl Into<PathBuf>, show: usize) -> Self {
        Self { store: store.into(), show }
    }

    pub fn execute(&self) -> Result<InspectReport> {
        let reader = StoreReader::open(&self.store)?;
        let report = self.collect(&reader);
        reader.close();
        report
    }

    fn collect(&self, reader: &StoreReader) -> Result<InspectReport> {
        reader.verify()?;

        let sample: Vec<Record> = reader
            .records()
            .with_context(|| format!("cannot decode records of '{}'", self.store.display()))?
            .into_iter()
            .take(self.show)
            .collect();

        tracing::debug!("Inspected '{}': {} records", self.store.display(), reader.len());
        let manifest = match self.store.parent() {
            Some(output_dir) => BuildManifest::load_if_present(output_dir)?,
            None => None,
        };

        Ok(InspectReport {
            length:  reader.len(),
            entries: reader.entry_count()?,
            sample,
            manifest,
        })
    }
}
