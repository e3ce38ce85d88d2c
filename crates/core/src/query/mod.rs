//! Read-only query facade over the frozen graph and index.
//!
//! External consumers (CLI printing, descriptor generation) only ever see
//! this view. Nothing here mutates; "not found" is an empty result.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::graph::DependencyGraph;
use crate::index::SymbolIndex;
use crate::model::{Library, LibraryId};

/// One deduplicated edge with its witness symbols, for dump-style output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeView {
    pub from: String,
    pub to: String,
    pub witnesses: Vec<String>,
}

/// Thin read-only wrapper combining the graph with the symbol index.
pub struct LinkageView<'a> {
    graph: &'a DependencyGraph,
    index: &'a SymbolIndex,
}

impl<'a> LinkageView<'a> {
    pub fn new(graph: &'a DependencyGraph, index: &'a SymbolIndex) -> Self {
        Self { graph, index }
    }

    /// Libraries defining `symbol`, in scan order. Empty when the symbol
    /// is unknown to the candidate set.
    pub fn who_defines(&self, symbol: &str) -> Vec<&'a Library> {
        self.index.lookup(symbol).iter().map(|d| self.graph.library(d.lib)).collect()
    }

    /// Direct dependencies of the named library, or `None` when the name
    /// does not match any scanned library.
    pub fn dependencies_of(&self, name: &str) -> Option<Vec<&'a Library>> {
        let id = self.graph.find_library(name)?;
        Some(self.graph.dependencies_of(id).into_iter().map(|d| self.graph.library(d)).collect())
    }

    /// Transitive dependency closure of the named library (the library
    /// itself excluded), in scan order.
    pub fn transitive_dependencies_of(&self, name: &str) -> Option<Vec<&'a Library>> {
        let id = self.graph.find_library(name)?;
        let mut closure: BTreeSet<LibraryId> = BTreeSet::new();
        let mut queue: Vec<LibraryId> = self.graph.dependencies_of(id);
        while let Some(next) = queue.pop() {
            if closure.insert(next) {
                queue.extend(self.graph.dependencies_of(next));
            }
        }
        closure.remove(&id);
        Some(closure.into_iter().map(|d| self.graph.library(d)).collect())
    }

    /// Full deduplicated edge list in (dependent, definer) order.
    pub fn all_edges(&self) -> Vec<EdgeView> {
        self.graph
            .edges()
            .map(|(from, to, witnesses)| EdgeView {
                from: self.graph.library(from).filename.clone(),
                to: self.graph.library(to).filename.clone(),
                witnesses: witnesses.to_vec(),
            })
            .collect()
    }

    /// Library file name -> direct dependency file names, identifiers
    /// only. The shape the descriptor collaborator consumes.
    pub fn dependency_map(&self) -> BTreeMap<String, Vec<String>> {
        self.graph
            .libraries()
            .iter()
            .enumerate()
            .map(|(idx, lib)| {
                let deps = self
                    .graph
                    .dependencies_of(LibraryId(idx))
                    .into_iter()
                    .map(|d| self.graph.library(d).filename.clone())
                    .collect();
                (lib.filename.clone(), deps)
            })
            .collect()
    }

    /// Drop from `names` every library that is already a direct dependency
    /// of another listed library, preserving the input order of the rest.
    ///
    /// Useful to shrink a hand-maintained link list down to its roots.
    pub fn minimize(&self, names: &[String]) -> Vec<String> {
        let mut dropped: BTreeSet<String> = BTreeSet::new();
        for name in names {
            if let Some(deps) = self.dependencies_of(name) {
                for dep in deps {
                    dropped.insert(dep.filename.clone());
                    dropped.insert(dep.name.clone());
                }
            }
        }
        names.iter().filter(|name| !dropped.contains(*name)).cloned().collect()
    }
}
