//! JSON asset manifest that stands in for the editor's asset registry.
//!
//! ```json
//! { "assets": [ { "path": "/Game/Hero", "class": "Blueprint",
//!                 "memory_size": 10, "disk_size": 5,
//!                 "hard": ["/Game/Mesh"], "soft": ["/Game/Icon"] } ] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::registry::{
    AssetData, AssetFilter, AssetKey, AssetRegistry, DependencyGraph, DependencyKind, Materializer,
};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("asset {0} is listed more than once")]
    DuplicateAsset(AssetKey),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    assets: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    path: AssetKey,
    #[serde(default)]
    class: String,
    memory_size: Option<u64>,
    disk_size: Option<u64>,
    #[serde(default)]
    hard: Vec<AssetKey>,
    #[serde(default)]
    soft: Vec<AssetKey>,
}

#[derive(Debug)]
pub struct Manifest {
    entries: BTreeMap<AssetKey, ManifestEntry>,
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Manifest, ManifestError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        text.parse()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let file: ManifestFile = serde_json::from_str(text)?;
        let mut entries = BTreeMap::new();

        for entry in file.assets {
            if entries.contains_key(&entry.path) {
                return Err(ManifestError::DuplicateAsset(entry.path));
            }
            entries.insert(entry.path.clone(), entry);
        }

        for entry in entries.values() {
            for dependency in entry.hard.iter().chain(&entry.soft) {
                if !entries.contains_key(dependency) {
                    debug!(asset = %entry.path, %dependency, "manifest references unknown asset");
                }
            }
        }

        Ok(Manifest { entries })
    }
}

impl ManifestEntry {
    fn data(&self) -> AssetData {
        AssetData {
            key: self.path.clone(),
            class: self.class.clone(),
        }
    }
}

impl AssetRegistry for Manifest {
    fn resolve(&self, key: &AssetKey) -> Option<AssetData> {
        self.entries.get(key).map(ManifestEntry::data)
    }

    fn assets(&self, filter: &AssetFilter) -> Vec<AssetData> {
        self.entries
            .values()
            .map(ManifestEntry::data)
            .filter(|asset| filter.matches(asset))
            .collect()
    }

    fn disk_size(&self, key: &AssetKey) -> Option<u64> {
        self.entries.get(key).and_then(|e| e.disk_size)
    }
}

impl Materializer for Manifest {
    fn memory_size(&self, asset: &AssetData) -> Option<u64> {
        self.entries.get(&asset.key).and_then(|e| e.memory_size)
    }
}

impl DependencyGraph for Manifest {
    fn dependencies(&self, key: &AssetKey, kind: DependencyKind) -> Vec<AssetKey> {
        let Some(entry) = self.entries.get(key) else {
            return Vec::new();
        };

        match kind {
            DependencyKind::Hard => entry.hard.clone(),
            DependencyKind::Soft => entry.soft.clone(),
        }
    }
}
