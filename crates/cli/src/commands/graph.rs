use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use linkorder_core::graph::TieBreak;
use linkorder_core::query::{EdgeView, LinkageView};

use super::util::{build_graph, load_cache};

/// Unresolved external rendered with library names for output.
#[derive(Debug, Serialize)]
struct UnresolvedOut {
    library: String,
    symbol: String,
}

/// Ambiguity rendered with library names for output.
#[derive(Debug, Serialize)]
struct AmbiguityOut {
    library: String,
    symbol: String,
    chosen: String,
    candidates: Vec<String>,
    resolved_by: TieBreak,
}

#[derive(Debug, Serialize)]
struct GraphDump {
    edges: Vec<EdgeView>,
    unresolved: Vec<UnresolvedOut>,
    ambiguities: Vec<AmbiguityOut>,
}

/// Dump the full dependency graph with its resolution diagnostics.
///
/// Unresolved externals and ambiguities are part of the report on every
/// run; they are never silently dropped.
pub fn run(cache_path: &Path, json: bool) -> Result<()> {
    let cache = load_cache(cache_path)?;
    let scans = cache.to_scans();
    let (index, graph) = build_graph(&scans);
    let view = LinkageView::new(&graph, &index);

    let dump = GraphDump {
        edges: view.all_edges(),
        unresolved: graph
            .unresolved()
            .iter()
            .map(|u| UnresolvedOut {
                library: graph.library(u.lib).filename.clone(),
                symbol: u.symbol.clone(),
            })
            .collect(),
        ambiguities: graph
            .ambiguities()
            .iter()
            .map(|a| AmbiguityOut {
                library: graph.library(a.lib).filename.clone(),
                symbol: a.symbol.clone(),
                chosen: graph.library(a.chosen).filename.clone(),
                candidates: a
                    .candidates
                    .iter()
                    .map(|&c| graph.library(c).filename.clone())
                    .collect(),
                resolved_by: a.resolved_by,
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    println!("Edges ({}):", dump.edges.len());
    for edge in &dump.edges {
        println!("  {} -> {} [{}]", edge.from, edge.to, edge.witnesses.join(", "));
    }

    println!("Unresolved externals ({}):", dump.unresolved.len());
    for entry in &dump.unresolved {
        println!("  {}: {}", entry.library, entry.symbol);
    }

    println!("Ambiguous definitions ({}):", dump.ambiguities.len());
    for entry in &dump.ambiguities {
        println!(
            "  {}: {} -> {} (candidates: {}; resolved by {})",
            entry.library,
            entry.symbol,
            entry.chosen,
            entry.candidates.join(", "),
            tie_break_label(entry.resolved_by)
        );
    }
    Ok(())
}

fn tie_break_label(tie_break: TieBreak) -> &'static str {
    match tie_break {
        TieBreak::Binding => "binding",
        TieBreak::ContainerKind => "container kind",
        TieBreak::ScanOrder => "scan order",
    }
}
