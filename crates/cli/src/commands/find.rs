use std::path::Path;

use anyhow::{bail, Result};

use linkorder::{format_library, NameStyle};
use linkorder_core::query::LinkageView;

use super::util::{build_graph, load_cache};

/// Report which cached libraries define a symbol.
pub fn run(cache_path: &Path, symbol: &str, json: bool, names: NameStyle) -> Result<()> {
    let cache = load_cache(cache_path)?;
    let scans = cache.to_scans();
    let (index, graph) = build_graph(&scans);
    let view = LinkageView::new(&graph, &index);

    let definers = view.who_defines(symbol);
    if definers.is_empty() {
        bail!("symbol `{symbol}` is not defined by any analyzed library");
    }

    if json {
        let filenames: Vec<&str> = definers.iter().map(|lib| lib.filename.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&filenames)?);
    } else {
        for library in definers {
            println!("Symbol {symbol} found in library {}", format_library(library, names, ""));
        }
    }
    Ok(())
}
