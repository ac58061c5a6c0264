use std::collections::HashSet;
use std::ops::AddAssign;

use serde::Serialize;
use tracing::{debug, trace};

use crate::registry::{AssetData, AssetKey, AssetRegistry, DependencyGraph, DependencyKind, Materializer};

/// Keys of assets whose size has already been counted.
pub type Visited = HashSet<AssetKey>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeInfo {
    pub memory: u64,
    pub disk: u64,
}

impl SizeInfo {
    pub fn new(memory: u64, disk: u64) -> Self {
        SizeInfo { memory, disk }
    }
}

impl AddAssign for SizeInfo {
    fn add_assign(&mut self, other: SizeInfo) {
        self.memory = self.memory.saturating_add(other.memory);
        self.disk = self.disk.saturating_add(other.disk);
    }
}

/// Sums memory and disk size over the hard-dependency closure of an asset.
pub struct SizeAccumulator<'a, R: ?Sized, M: ?Sized, G: ?Sized> {
    registry: &'a R,
    materializer: &'a M,
    graph: &'a G,
}

impl<'a, R, M, G> SizeAccumulator<'a, R, M, G>
where
    R: AssetRegistry + ?Sized,
    M: Materializer + ?Sized,
    G: DependencyGraph + ?Sized,
{
    pub fn new(registry: &'a R, materializer: &'a M, graph: &'a G) -> Self {
        SizeAccumulator {
            registry,
            materializer,
            graph,
        }
    }

    /// Walks `root` and everything reachable from it over hard edges, adding
    /// the own size of every asset not yet in `visited`.
    ///
    /// An asset already in `visited` contributes nothing and its dependencies
    /// are not walked from it. Dependency keys the registry cannot resolve
    /// are skipped.
    pub fn accumulate(&self, root: &AssetData, visited: &mut Visited) -> SizeInfo {
        let mut total = SizeInfo::default();
        let mut stack = vec![root.clone()];

        while let Some(asset) = stack.pop() {
            if !visited.insert(asset.key.clone()) {
                continue;
            }

            total += self.own_size(&asset);

            for key in self.graph.dependencies(&asset.key, DependencyKind::Hard) {
                if visited.contains(&key) {
                    continue;
                }

                match self.registry.resolve(&key) {
                    Some(dependency) => stack.push(dependency),
                    None => debug!(asset = %asset.key, dependency = %key, "skipping unresolved dependency"),
                }
            }
        }

        total
    }

    /// Like [`accumulate`](Self::accumulate) with a fresh visited set, which is returned.
    pub fn accumulate_root(&self, root: &AssetData) -> (SizeInfo, Visited) {
        let mut visited = Visited::new();
        let size = self.accumulate(root, &mut visited);
        (size, visited)
    }

    fn own_size(&self, asset: &AssetData) -> SizeInfo {
        let memory = self.materializer.memory_size(asset).unwrap_or(0);
        let disk = self.registry.disk_size(&asset.key).unwrap_or(0);

        trace!(asset = %asset.key, memory, disk, "counted");

        SizeInfo::new(memory, disk)
    }
}
