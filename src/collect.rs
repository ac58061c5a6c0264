use std::cmp::{Ordering, Reverse};

use clap::ValueEnum;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::accumulate::{SizeAccumulator, SizeInfo, Visited};
use crate::registry::{
    AssetData, AssetFilter, AssetKey, AssetRegistry, DependencyGraph, DependencyKind, Materializer,
};

/// Per-root result of a collect pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetInfo {
    pub path: AssetKey,
    pub package_path: String,
    pub class: String,
    pub size: SizeInfo,
    /// Distinct hard dependencies counted into `size`.
    pub dependency_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetDetails {
    pub info: AssetInfo,
    pub hard_references: Vec<AssetKey>,
    pub soft_references: Vec<AssetKey>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitMode {
    /// Every root starts from an empty visited set.
    #[default]
    PerRoot,
    /// One visited set for the whole pass; an asset is counted for the first root reaching it.
    Shared,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    /// Largest memory size first
    #[default]
    Memory,
    /// Largest disk size first
    Disk,
    /// Alphabetical by asset path
    Path,
}

pub struct Collector<'a, R: ?Sized, M: ?Sized, G: ?Sized> {
    registry: &'a R,
    accumulator: SizeAccumulator<'a, R, M, G>,
    graph: &'a G,
    visit_mode: VisitMode,
    progress: Option<ProgressBar>,
}

impl<'a, R, M, G> Collector<'a, R, M, G>
where
    R: AssetRegistry + Sync + ?Sized,
    M: Materializer + Sync + ?Sized,
    G: DependencyGraph + Sync + ?Sized,
{
    pub fn new(registry: &'a R, materializer: &'a M, graph: &'a G) -> Self {
        Collector {
            registry,
            accumulator: SizeAccumulator::new(registry, materializer, graph),
            graph,
            visit_mode: VisitMode::default(),
            progress: None,
        }
    }

    pub fn visit_mode(mut self, visit_mode: VisitMode) -> Self {
        self.visit_mode = visit_mode;
        self
    }

    /// Bar advanced once per processed root.
    pub fn progress(mut self, progress_bar: ProgressBar) -> Self {
        self.progress = Some(progress_bar);
        self
    }

    /// Sizes every asset matching `filter`, in registry listing order.
    pub fn collect(&self, filter: &AssetFilter) -> Vec<AssetInfo> {
        let roots = self.registry.assets(filter);

        if let Some(progress_bar) = &self.progress {
            progress_bar.set_length(roots.len() as u64);
            progress_bar.set_position(0);
        }

        let infos: Vec<AssetInfo> = match self.visit_mode {
            VisitMode::PerRoot => roots
                .par_iter()
                .map(|root| {
                    let (size, visited) = self.accumulator.accumulate_root(root);
                    self.step();
                    make_info(root, size, visited.len())
                })
                .collect(),
            VisitMode::Shared => {
                let mut visited = Visited::new();
                roots
                    .iter()
                    .map(|root| {
                        let before = visited.len();
                        let size = self.accumulator.accumulate(root, &mut visited);
                        self.step();
                        make_info(root, size, visited.len() - before)
                    })
                    .collect()
            }
        };

        if let Some(progress_bar) = &self.progress {
            progress_bar.finish();
        }

        info!(roots = infos.len(), mode = ?self.visit_mode, "collected asset sizes");

        infos
    }

    /// Summary and direct references of a single asset.
    pub fn details(&self, key: &AssetKey) -> Option<AssetDetails> {
        let asset = self.registry.resolve(key)?;
        let (size, visited) = self.accumulator.accumulate_root(&asset);

        Some(AssetDetails {
            info: make_info(&asset, size, visited.len()),
            hard_references: self.graph.dependencies(key, DependencyKind::Hard),
            soft_references: self.graph.dependencies(key, DependencyKind::Soft),
        })
    }

    fn step(&self) {
        if let Some(progress_bar) = &self.progress {
            progress_bar.inc(1);
        }
    }
}

/// `counted` is the number of assets, root included, that contributed to `size`.
fn make_info(root: &AssetData, size: SizeInfo, counted: usize) -> AssetInfo {
    AssetInfo {
        path: root.key.clone(),
        package_path: root.key.package_path().to_string(),
        class: root.class.clone(),
        size,
        dependency_count: counted.saturating_sub(1),
    }
}

/// Orders `assets` by `key`; ties fall back to ascending path.
pub fn sort_assets(assets: &mut [AssetInfo], key: SortKey) {
    assets.sort_by(|a, b| {
        let primary: Ordering = match key {
            SortKey::Memory => Reverse(a.size.memory).cmp(&Reverse(b.size.memory)),
            SortKey::Disk => Reverse(a.size.disk).cmp(&Reverse(b.size.disk)),
            SortKey::Path => Ordering::Equal,
        };

        primary.then_with(|| a.path.cmp(&b.path))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;

    const MANIFEST: &str = r#"{
        "assets": [
            { "path": "/Game/Hero", "class": "Blueprint", "memory_size": 10, "disk_size": 5,
              "hard": ["/Game/Shared/Mesh"], "soft": ["/Game/Shared/Icon"] },
            { "path": "/Game/Villain", "class": "Blueprint", "memory_size": 40, "disk_size": 1,
              "hard": ["/Game/Shared/Mesh", "/Game/Missing"] },
            { "path": "/Game/Maps/Arena", "class": "Blueprint", "memory_size": 0, "disk_size": 500 },
            { "path": "/Game/Shared/Mesh", "class": "StaticMesh", "memory_size": 20, "disk_size": 8 },
            { "path": "/Game/Shared/Icon", "class": "Texture2D", "memory_size": 99, "disk_size": 99 },
            { "path": "/Engine/Cube", "class": "Blueprint", "memory_size": 1, "disk_size": 1 }
        ]
    }"#;

    fn manifest() -> Manifest {
        MANIFEST.parse().unwrap()
    }

    fn by_path(infos: &[AssetInfo], path: &str) -> AssetInfo {
        infos.iter().find(|i| i.path.as_str() == path).cloned().unwrap()
    }

    #[test]
    fn collects_each_root_with_its_own_visited_set() {
        let manifest = manifest();
        let collector = Collector::new(&manifest, &manifest, &manifest);

        let infos = collector.collect(&AssetFilter::default());

        assert_eq!(infos.len(), 3);
        assert_eq!(by_path(&infos, "/Game/Hero").size, SizeInfo::new(30, 13));
        assert_eq!(by_path(&infos, "/Game/Villain").size, SizeInfo::new(60, 9));
        assert_eq!(by_path(&infos, "/Game/Villain").dependency_count, 1);
        assert_eq!(by_path(&infos, "/Game/Maps/Arena").size, SizeInfo::new(0, 500));
        assert_eq!(by_path(&infos, "/Game/Maps/Arena").package_path, "/Game/Maps");
    }

    #[test]
    fn shared_mode_attributes_common_assets_to_first_root() {
        let manifest = manifest();
        let collector = Collector::new(&manifest, &manifest, &manifest).visit_mode(VisitMode::Shared);

        let infos = collector.collect(&AssetFilter::default());

        // listing order is by key: Hero, Maps/Arena, Villain
        assert_eq!(by_path(&infos, "/Game/Hero").size, SizeInfo::new(30, 13));
        assert_eq!(by_path(&infos, "/Game/Hero").dependency_count, 1);
        assert_eq!(by_path(&infos, "/Game/Villain").size, SizeInfo::new(40, 1));
        assert_eq!(by_path(&infos, "/Game/Villain").dependency_count, 0);
    }

    #[test]
    fn progress_counts_roots() {
        let manifest = manifest();
        let progress_bar = ProgressBar::hidden();
        let collector = Collector::new(&manifest, &manifest, &manifest).progress(progress_bar.clone());

        collector.collect(&AssetFilter::default());

        assert_eq!(progress_bar.length(), Some(3));
        assert_eq!(progress_bar.position(), 3);
    }

    #[test]
    fn sorts_by_memory_descending_then_path() {
        let manifest = manifest();
        let collector = Collector::new(&manifest, &manifest, &manifest);
        let filter = AssetFilter {
            classes: vec![],
            package_paths: vec![],
            recursive: true,
        };
        let mut infos = collector.collect(&filter);

        sort_assets(&mut infos, SortKey::Memory);

        let order: Vec<&str> = infos.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            order,
            [
                "/Game/Shared/Icon",
                "/Game/Villain",
                "/Game/Hero",
                "/Game/Shared/Mesh",
                "/Engine/Cube",
                "/Game/Maps/Arena",
            ]
        );
    }

    #[test]
    fn sorts_by_disk_and_path() {
        let manifest = manifest();
        let collector = Collector::new(&manifest, &manifest, &manifest);
        let mut infos = collector.collect(&AssetFilter::default());

        sort_assets(&mut infos, SortKey::Disk);
        assert_eq!(infos[0].path.as_str(), "/Game/Maps/Arena");

        sort_assets(&mut infos, SortKey::Path);
        let order: Vec<&str> = infos.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(order, ["/Game/Hero", "/Game/Maps/Arena", "/Game/Villain"]);
    }

    #[test]
    fn details_lists_direct_references() {
        let manifest = manifest();
        let collector = Collector::new(&manifest, &manifest, &manifest);

        let details = collector.details(&AssetKey::new("/Game/Hero")).unwrap();

        assert_eq!(details.info.size, SizeInfo::new(30, 13));
        assert_eq!(details.hard_references, vec![AssetKey::new("/Game/Shared/Mesh")]);
        assert_eq!(details.soft_references, vec![AssetKey::new("/Game/Shared/Icon")]);
        assert!(collector.details(&AssetKey::new("/Game/Nope")).is_none());
    }
}
