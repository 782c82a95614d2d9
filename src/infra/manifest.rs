// ============================================================
// Layer 6: Build Manifest
// ============================================================
// Records how a dataset directory was produced:
//
//   output_dir/
//     train/                ← LMDB store
//     valid/                ← LMDB store
//     test/                 ← LMDB store
//     build_manifest.json   ← BuildConfig + per-split counts
//
// Written after the three stores commit, and removed before a
// rebuild writes its first store, so a manifest on disk means
// the build it describes finished.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::build_use_case::BuildConfig;
use crate::data::dataset::SplitCounts;

pub const MANIFEST_FILE: &str = "build_manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildManifest {
    pub config: BuildConfig,
    pub counts: SplitCounts,
}

impl BuildManifest {
    pub fn new(config: BuildConfig, counts: SplitCounts) -> Self {
        Self { config, counts }
    }

    pub fn path_in(output_dir: &Path) -> PathBuf {
        output_dir.join(MANIFEST_FILE)
    }

    pub fn save(&self, output_dir: &Path) -> Result<()> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Cannot create '{}'", output_dir.display()))?;

        let path = Self::path_in(output_dir);
        let json = serde_json::to_string_pretty(self)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write manifest to '{}'", path.display()))?;

        tracing::debug!("Saved build manifest to '{}'", path.display());
        Ok(())
    }

    pub fn load(output_dir: &Path) -> Result<Self> {
        let path = Self::path_in(output_dir);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read manifest from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed manifest '{}'", path.display()))
    }

    /// Load the manifest of `output_dir` if one was written.
    pub fn load_if_present(output_dir: &Path) -> Result<Option<Self>> {
        if !Self::path_in(output_dir).is_file() {
            return Ok(None);
        }
        Self::load(output_dir).map(Some)
    }

    /// Delete the manifest of `output_dir`. Missing is fine.
    pub fn remove(output_dir: &Path) -> Result<()> {
        let path = Self::path_in(output_dir);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Removed stale build manifest '{}'", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Cannot remove manifest '{}'", path.display())),
        }
    }
}
