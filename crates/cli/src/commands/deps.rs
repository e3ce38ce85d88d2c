use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use linkorder::{format_filename, NameStyle};
use linkorder_core::query::LinkageView;

use super::util::{build_graph, load_cache};

/// List direct (or transitive) dependencies of the named libraries.
#[allow(clippy::too_many_arguments)]
pub fn run(
    cache_path: &Path,
    libs: &[String],
    transitive: bool,
    minimize: bool,
    sort: bool,
    json: bool,
    names: NameStyle,
) -> Result<()> {
    let cache = load_cache(cache_path)?;
    let scans = cache.to_scans();
    let (index, graph) = build_graph(&scans);
    let view = LinkageView::new(&graph, &index);

    let mut table: BTreeMap<String, Option<Vec<String>>> = BTreeMap::new();
    for name in libs {
        let Some(filename) = cache.resolve_name(name) else {
            table.insert(name.clone(), None);
            continue;
        };

        let deps = if transitive {
            view.transitive_dependencies_of(&filename)
        } else {
            view.dependencies_of(&filename)
        };
        let mut dep_names: Vec<String> =
            deps.unwrap_or_default().iter().map(|lib| lib.filename.clone()).collect();

        if minimize {
            dep_names = view.minimize(&dep_names);
        }
        if sort {
            dep_names.sort();
        }
        table.insert(filename, Some(dep_names));
    }

    if json {
        // Unknown names serialize as null so callers can tell them from
        // libraries without dependencies.
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("Library dependencies:");
    for (library, deps) in &table {
        match deps {
            None => println!("- {library}: <not found>"),
            Some(deps) if deps.is_empty() => {
                println!("- {}: <none>", format_filename(library, names, ""));
            }
            Some(deps) => {
                let rendered: Vec<String> =
                    deps.iter().map(|dep| format_filename(dep, names, "")).collect();
                println!("- {}: {}", format_filename(library, names, ""), rendered.join(", "));
            }
        }
    }
    Ok(())
}
