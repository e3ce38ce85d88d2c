use std::path::Path;

use anyhow::Result;

use linkorder::{format_library, NameStyle};
use linkorder_core::graph::topo::link_order;
use linkorder_core::model::Library;

use super::util::{build_graph, load_cache, select_scans};

/// Print a link-safe ordering of the cached (or named) libraries.
pub fn run(
    cache_path: &Path,
    libs: &[String],
    reverse: bool,
    sep: &str,
    names: NameStyle,
    quote: &str,
) -> Result<()> {
    let cache = load_cache(cache_path)?;
    let scans = select_scans(&cache, libs)?;
    if scans.is_empty() {
        println!("No libraries analyzed yet; run `linkorder analyze` first.");
        return Ok(());
    }

    let (_index, graph) = build_graph(&scans);

    match link_order(&graph) {
        Ok(order) => {
            let mut ordered: Vec<&Library> =
                order.iter().map(|&id| graph.library(id)).collect();
            if reverse {
                ordered.reverse();
            }
            let rendered: Vec<String> =
                ordered.iter().map(|lib| format_library(lib, names, quote)).collect();
            let convention = if reverse { "dependents first" } else { "definers first" };
            println!("Link order ({} libraries, {convention}):", rendered.len());
            println!("{}", rendered.join(sep));
            Ok(())
        }
        Err(report) => {
            eprintln!("Cannot compute a link order; dependency cycles detected:");
            for component in &report.components {
                eprintln!("  cycle: {}", component.members.join(" -> "));
                for edge in &component.witness_cycle {
                    eprintln!("    {} -> {} (symbol `{}`)", edge.from, edge.to, edge.symbol);
                }
            }
            Err(report.into())
        }
    }
}
