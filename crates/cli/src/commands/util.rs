use std::path::Path;

use anyhow::{Context, Result};

use linkorder_core::cache::ScanCache;
use linkorder_core::graph::DependencyGraph;
use linkorder_core::index::SymbolIndex;
use linkorder_core::model::LibraryScan;

/// Load the scan cache, mapping failures into a user-facing context.
pub fn load_cache(path: &Path) -> Result<ScanCache> {
    ScanCache::load(path)
        .with_context(|| format!("Failed to load scan cache at {}", path.display()))
}

/// Build the symbol index and dependency graph over a scan set.
///
/// Index first, then graph: resolution is only safe once every library's
/// symbols are known.
pub fn build_graph(scans: &[LibraryScan]) -> (SymbolIndex, DependencyGraph) {
    let index = SymbolIndex::build(scans);
    let graph = DependencyGraph::build(scans, &index);
    (index, graph)
}

/// Materialize the candidate scan set for a command.
///
/// With no names given, every cached library participates. Otherwise the
/// named libraries (resolved through the cache's `lib<name>.a`/`.so`
/// candidates) form the candidate set, in the order given.
pub fn select_scans(cache: &ScanCache, libs: &[String]) -> Result<Vec<LibraryScan>> {
    if libs.is_empty() {
        return Ok(cache.to_scans());
    }

    let mut scans = Vec::with_capacity(libs.len());
    let mut seen = std::collections::BTreeSet::new();
    for name in libs {
        let filename = cache
            .resolve_name(name)
            .with_context(|| format!("`{name}` is not an analyzed library"))?;
        if !seen.insert(filename.clone()) {
            continue;
        }
        let entry = cache
            .get(&filename)
            .with_context(|| format!("Cache entry for `{filename}` is missing"))?;
        scans.push(entry.to_scan());
    }
    Ok(scans)
}
