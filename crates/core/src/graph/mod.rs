//! Library dependency graph construction.
//!
//! For every library and every symbol it requires, the builder asks the
//! symbol index who defines that name and adds a directed edge
//! (dependent -> definer). Edges between the same ordered pair collapse
//! to one, but every witness symbol is retained for diagnostics.
//!
//! Resolution never errors: a symbol nobody defines becomes an
//! `UnresolvedReference` (it may be satisfied by system libraries outside
//! the candidate set), and a symbol several libraries define is settled by
//! the disambiguation policy with an `AmbiguousDefinition` recorded. Both
//! always surface in the final report, even on overall success.

pub mod topo;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::index::{Definer, SymbolIndex};
use crate::model::{Library, LibraryId, LibraryScan};

/// An undefined symbol no candidate library satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    pub lib: LibraryId,
    pub symbol: String,
}

/// Which rule settled a multi-definer symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// A single strong definer beat the weak ones.
    Binding,
    /// The dynamic-over-static container preference decided.
    ContainerKind,
    /// Still tied after both rules; first definer in scan order chosen.
    ScanOrder,
}

/// A symbol with several definers: the chosen edge target plus the full
/// candidate list, for the caller to inspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousDefinition {
    pub lib: LibraryId,
    pub symbol: String,
    pub chosen: LibraryId,
    pub candidates: Vec<LibraryId>,
    pub resolved_by: TieBreak,
}

/// Directed dependency graph over a scanned library set.
///
/// Nodes are libraries in scan order; an edge A -> B means "A requires at
/// least one symbol that B defines". Built once, frozen afterwards: all
/// access is through shared references, so concurrent readers need no
/// locking.
#[derive(Debug)]
pub struct DependencyGraph {
    libraries: Vec<Library>,
    /// Deduplicated edges keyed by (dependent, definer), each keeping its
    /// sorted witness symbol list.
    edges: BTreeMap<(LibraryId, LibraryId), Vec<String>>,
    unresolved: Vec<UnresolvedReference>,
    ambiguities: Vec<AmbiguousDefinition>,
}

impl DependencyGraph {
    /// Resolve every library's undefined symbols against the index and
    /// build the edge set.
    ///
    /// The index must have been built over the same scan-ordered set.
    pub fn build(scans: &[LibraryScan], index: &SymbolIndex) -> Self {
        let libraries: Vec<Library> = scans.iter().map(|s| s.library.clone()).collect();
        let mut edges: BTreeMap<(LibraryId, LibraryId), Vec<String>> = BTreeMap::new();
        let mut unresolved = Vec::new();
        let mut ambiguities = Vec::new();

        for (idx, scan) in scans.iter().enumerate() {
            let lib = LibraryId(idx);
            for symbol in &scan.symbols.undefined {
                // A library never depends on itself, whatever it defines.
                let candidates: Vec<Definer> =
                    index.lookup(symbol).iter().copied().filter(|d| d.lib != lib).collect();

                if candidates.is_empty() {
                    unresolved.push(UnresolvedReference { lib, symbol: symbol.clone() });
                    continue;
                }

                let (chosen, resolved_by) = choose_definer(&candidates, &libraries);
                if candidates.len() > 1 {
                    ambiguities.push(AmbiguousDefinition {
                        lib,
                        symbol: symbol.clone(),
                        chosen,
                        candidates: candidates.iter().map(|d| d.lib).collect(),
                        resolved_by,
                    });
                }

                // Witnesses arrive in sorted order (undefined is a BTreeSet),
                // so each edge's list stays sorted without a second pass.
                edges.entry((lib, chosen)).or_default().push(symbol.clone());
            }
        }

        log::debug!(
            "dependency graph: {} libraries, {} edges, {} unresolved, {} ambiguous",
            libraries.len(),
            edges.len(),
            unresolved.len(),
            ambiguities.len()
        );
        Self { libraries, edges, unresolved, ambiguities }
    }

    pub fn library(&self, id: LibraryId) -> &Library {
        &self.libraries[id.index()]
    }

    /// All libraries in scan order.
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    pub fn node_count(&self) -> usize {
        self.libraries.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Deduplicated edges in (dependent, definer) order with their witness
    /// symbols.
    pub fn edges(&self) -> impl Iterator<Item = (LibraryId, LibraryId, &[String])> + '_ {
        self.edges.iter().map(|(&(from, to), witnesses)| (from, to, witnesses.as_slice()))
    }

    /// Witness symbols for one edge; empty when the edge does not exist.
    pub fn witnesses(&self, from: LibraryId, to: LibraryId) -> &[String] {
        self.edges.get(&(from, to)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Libraries `id` depends on, ascending by scan order.
    pub fn dependencies_of(&self, id: LibraryId) -> Vec<LibraryId> {
        self.edges
            .range((id, LibraryId(0))..=(id, LibraryId(usize::MAX)))
            .map(|(&(_, to), _)| to)
            .collect()
    }

    /// Libraries depending on `id`, ascending by scan order.
    pub fn dependents_of(&self, id: LibraryId) -> Vec<LibraryId> {
        self.edges.keys().filter(|(_, to)| *to == id).map(|&(from, _)| from).collect()
    }

    /// Undefined symbols not satisfied inside the candidate set.
    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    /// Multi-definer symbols and how each was settled.
    pub fn ambiguities(&self) -> &[AmbiguousDefinition] {
        &self.ambiguities
    }

    /// Look a library up by short name or file name.
    pub fn find_library(&self, name: &str) -> Option<LibraryId> {
        self.libraries
            .iter()
            .position(|lib| lib.name == name || lib.filename == name)
            .map(LibraryId)
    }
}

/// Apply the disambiguation policy to a non-empty candidate list.
///
/// Order: strong definers beat weak ones; then dynamic containers beat
/// static ones (mirroring linker default search behavior -- a heuristic,
/// not a correctness guarantee); then first in scan order.
fn choose_definer(candidates: &[Definer], libraries: &[Library]) -> (LibraryId, TieBreak) {
    use crate::model::SymbolBinding;

    let strong: Vec<&Definer> =
        candidates.iter().filter(|d| d.binding == SymbolBinding::Global).collect();
    let pool: Vec<&Definer> =
        if strong.is_empty() { candidates.iter().collect() } else { strong };
    if pool.len() == 1 {
        return (pool[0].lib, TieBreak::Binding);
    }

    let dynamic: Vec<&Definer> =
        pool.iter().copied().filter(|d| libraries[d.lib.index()].kind.prefers_dynamic()).collect();
    let pool = if dynamic.is_empty() { pool } else { dynamic };
    if pool.len() == 1 {
        return (pool[0].lib, TieBreak::ContainerKind);
    }

    // Candidate lists are scan-ordered, so the first entry is the
    // deterministic fallback.
    (pool[0].lib, TieBreak::ScanOrder)
}
