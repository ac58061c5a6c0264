use std::fmt;

use serde::{Deserialize, Serialize};

/// Path-like key that uniquely identifies an asset, e.g. `/Game/Characters/Hero`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetKey(String);

impl AssetKey {
    pub fn new(key: impl Into<String>) -> Self {
        AssetKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key without its last segment: `/Game/Characters/Hero` -> `/Game/Characters`.
    pub fn package_path(&self) -> &str {
        match self.0.rfind('/') {
            Some(0) => "/",
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetData {
    pub key: AssetKey,
    pub class: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// Target is loaded whenever the source is loaded.
    Hard,
    /// Target is resolved on demand.
    Soft,
}

/// Selects which assets a collect pass uses as roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFilter {
    /// Class names to accept. Empty accepts every class.
    pub classes: Vec<String>,
    /// Package paths to accept. Empty accepts every path.
    pub package_paths: Vec<String>,
    /// Also accept assets in sub-paths of `package_paths`.
    pub recursive: bool,
}

impl Default for AssetFilter {
    fn default() -> Self {
        AssetFilter {
            classes: vec!["Blueprint".to_string()],
            package_paths: vec!["/Game".to_string()],
            recursive: true,
        }
    }
}

impl AssetFilter {
    pub fn matches(&self, asset: &AssetData) -> bool {
        let class_ok = self.classes.is_empty() || self.classes.iter().any(|c| *c == asset.class);

        class_ok
            && (self.package_paths.is_empty()
                || self
                    .package_paths
                    .iter()
                    .any(|p| self.path_matches(p, asset.key.package_path())))
    }

    fn path_matches(&self, filter_path: &str, package_path: &str) -> bool {
        let filter_path = match filter_path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        if package_path == filter_path {
            return true;
        }

        if !self.recursive {
            return false;
        }

        if filter_path == "/" {
            return package_path.starts_with('/');
        }

        package_path
            .strip_prefix(filter_path)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Resolves keys to assets and answers persisted-metadata queries.
pub trait AssetRegistry {
    fn resolve(&self, key: &AssetKey) -> Option<AssetData>;

    /// Every asset matching `filter`, in a stable order.
    fn assets(&self, filter: &AssetFilter) -> Vec<AssetData>;

    /// On-disk size of the asset's package, if a package record exists.
    fn disk_size(&self, key: &AssetKey) -> Option<u64>;
}

/// Loads assets to obtain their in-memory size estimate.
pub trait Materializer {
    /// `None` when the asset has no materializable representation.
    fn memory_size(&self, asset: &AssetData) -> Option<u64>;
}

pub trait DependencyGraph {
    /// Direct dependencies of `key` of the given kind.
    fn dependencies(&self, key: &AssetKey, kind: DependencyKind) -> Vec<AssetKey>;
}
