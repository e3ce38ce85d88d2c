use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use linkorder_core::model::strip_library_name;
use linkorder_core::query::LinkageView;

use super::util::{build_graph, load_cache};

/// Components/dependencies declaration for package-manager integration:
/// each component is a library with the components it links against.
#[derive(Debug, Serialize)]
struct Descriptor {
    components: BTreeMap<String, Vec<String>>,
}

/// Emit the library -> direct-dependencies mapping as YAML (or JSON).
///
/// Pure serialization over the already-computed graph; system libraries
/// are left out unless requested since downstream package recipes only
/// declare their own components.
pub fn run(cache_path: &Path, include_system: bool, json: bool) -> Result<()> {
    let cache = load_cache(cache_path)?;
    let scans = cache.to_scans();
    let (index, graph) = build_graph(&scans);
    let view = LinkageView::new(&graph, &index);

    let system: BTreeSet<&str> = graph
        .libraries()
        .iter()
        .filter(|lib| lib.system)
        .map(|lib| lib.filename.as_str())
        .collect();

    let components: BTreeMap<String, Vec<String>> = view
        .dependency_map()
        .into_iter()
        .filter(|(library, _)| include_system || !system.contains(library.as_str()))
        .map(|(library, deps)| {
            let deps = deps
                .into_iter()
                .filter(|dep| include_system || !system.contains(dep.as_str()))
                .map(|dep| strip_library_name(&dep))
                .collect();
            (strip_library_name(&library), deps)
        })
        .collect();

    let descriptor = Descriptor { components };
    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        print!("{}", serde_yaml::to_string(&descriptor)?);
    }
    Ok(())
}
