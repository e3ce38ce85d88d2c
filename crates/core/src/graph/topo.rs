//! Topological ordering of the dependency graph.
//!
//! Kahn's algorithm over remaining dependency counts, with the direction
//! fixed as: **definers are emitted before their dependents**. For every
//! edge A -> B ("A requires something from B"), B appears before A in the
//! output. Callers wanting the opposite linker convention reverse the
//! sequence; that is a presentation concern.
//!
//! When the ready set drains while nodes remain, the remainder contains at
//! least one cycle. Strongly connected components are computed over the
//! leftover nodes and every component larger than one node is reported
//! with its members and a concrete witness cycle, symbol by symbol. The
//! sort fails as a whole: a partial order cannot guarantee a correct link
//! line.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::model::LibraryId;

use super::DependencyGraph;

/// One edge of a witness cycle, by library file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleEdge {
    pub from: String,
    pub to: String,
    /// The symbol whose resolution produced this edge.
    pub symbol: String,
}

/// One strongly connected component with more than one library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleComponent {
    /// Component members by file name, in scan order.
    pub members: Vec<String>,
    /// A closed walk inside the component proving the cycle, with one
    /// witness symbol per edge.
    pub witness_cycle: Vec<CycleEdge>,
}

/// Sort failure: every dependency cycle in the graph, fully described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub components: Vec<CycleComponent>,
}

impl std::fmt::Display for CycleReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dependency cycle among libraries:")?;
        for component in &self.components {
            write!(f, " [{}]", component.members.join(" -> "))?;
        }
        Ok(())
    }
}

impl std::error::Error for CycleReport {}

/// Compute a link-safe order: definers before dependents.
///
/// Deterministic for a given input set: the ready set is drained in
/// lexicographic file-name order (scan order breaking exact ties), so two
/// runs over the same libraries always agree. Runs in time linear in
/// nodes + edges (plus the ready-set ordering).
pub fn link_order(graph: &DependencyGraph) -> Result<Vec<LibraryId>, CycleReport> {
    let n = graph.node_count();

    // out_deg counts distinct definers a node still waits on; dependents
    // is the reverse adjacency used to release waiters on emit.
    let mut out_deg = vec![0usize; n];
    let mut dependents: Vec<Vec<LibraryId>> = vec![Vec::new(); n];
    for (from, to, _) in graph.edges() {
        out_deg[from.index()] += 1;
        dependents[to.index()].push(from);
    }

    let mut ready: BTreeSet<(&str, LibraryId)> = (0..n)
        .filter(|&i| out_deg[i] == 0)
        .map(|i| (graph.library(LibraryId(i)).filename.as_str(), LibraryId(i)))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(&(name, id)) = ready.iter().next() {
        ready.remove(&(name, id));
        order.push(id);
        for &dependent in &dependents[id.index()] {
            out_deg[dependent.index()] -= 1;
            if out_deg[dependent.index()] == 0 {
                ready.insert((graph.library(dependent).filename.as_str(), dependent));
            }
        }
    }

    if order.len() == n {
        return Ok(order);
    }

    // Stalled: everything not emitted sits in or behind a cycle.
    let emitted: HashSet<LibraryId> = order.iter().copied().collect();
    let remaining: Vec<LibraryId> =
        (0..n).map(LibraryId).filter(|id| !emitted.contains(id)).collect();
    Err(cycle_report(graph, &remaining))
}

/// Strongly connected components (Tarjan) over the remaining nodes;
/// components of a single node are upstream casualties, not cycles.
fn cycle_report(graph: &DependencyGraph, remaining: &[LibraryId]) -> CycleReport {
    let in_scope: HashSet<LibraryId> = remaining.iter().copied().collect();

    struct Tarjan<'a> {
        graph: &'a DependencyGraph,
        in_scope: &'a HashSet<LibraryId>,
        next_index: usize,
        index: HashMap<LibraryId, usize>,
        lowlink: HashMap<LibraryId, usize>,
        stack: Vec<LibraryId>,
        on_stack: HashSet<LibraryId>,
        components: Vec<Vec<LibraryId>>,
    }

    impl Tarjan<'_> {
        fn visit(&mut self, v: LibraryId) {
            self.index.insert(v, self.next_index);
            self.lowlink.insert(v, self.next_index);
            self.next_index += 1;
            self.stack.push(v);
            self.on_stack.insert(v);

            for w in self.graph.dependencies_of(v) {
                if !self.in_scope.contains(&w) {
                    continue;
                }
                if !self.index.contains_key(&w) {
                    self.visit(w);
                    let low = self.lowlink[&v].min(self.lowlink[&w]);
                    self.lowlink.insert(v, low);
                } else if self.on_stack.contains(&w) {
                    let low = self.lowlink[&v].min(self.index[&w]);
                    self.lowlink.insert(v, low);
                }
            }

            if self.lowlink[&v] == self.index[&v] {
                let mut component = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack.remove(&w);
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                self.components.push(component);
            }
        }
    }

    let mut tarjan = Tarjan {
        graph,
        in_scope: &in_scope,
        next_index: 0,
        index: HashMap::new(),
        lowlink: HashMap::new(),
        stack: Vec::new(),
        on_stack: HashSet::new(),
        components: Vec::new(),
    };
    for &id in remaining {
        if !tarjan.index.contains_key(&id) {
            tarjan.visit(id);
        }
    }

    let mut components: Vec<CycleComponent> = tarjan
        .components
        .into_iter()
        .filter(|members| members.len() > 1)
        .map(|mut members| {
            members.sort();
            let witness_cycle = witness_cycle(graph, &members);
            CycleComponent {
                members: members
                    .iter()
                    .map(|&id| graph.library(id).filename.clone())
                    .collect(),
                witness_cycle,
            }
        })
        .collect();
    components.sort_by(|a, b| a.members.cmp(&b.members));

    CycleReport { components }
}

/// Walk inside one component until a node repeats; the loop from the first
/// repeat is a concrete cycle, reported edge by edge with the first
/// witness symbol of each edge.
fn witness_cycle(graph: &DependencyGraph, members: &[LibraryId]) -> Vec<CycleEdge> {
    let in_component: HashSet<LibraryId> = members.iter().copied().collect();
    let Some(&first) = members.first() else { return Vec::new() };

    let mut current = first;
    let mut path: Vec<LibraryId> = vec![current];
    let mut seen_at: HashMap<LibraryId, usize> = HashMap::new();
    seen_at.insert(current, 0);

    loop {
        // Every node of a >1 component has an in-component successor.
        let Some(next) = graph
            .dependencies_of(current)
            .into_iter()
            .find(|id| in_component.contains(id))
        else {
            return Vec::new();
        };

        if let Some(&start) = seen_at.get(&next) {
            let mut edges = Vec::new();
            for pair in path[start..].windows(2) {
                edges.push(edge_between(graph, pair[0], pair[1]));
            }
            edges.push(edge_between(graph, current, next));
            return edges;
        }

        seen_at.insert(next, path.len());
        path.push(next);
        current = next;
    }
}

fn edge_between(graph: &DependencyGraph, from: LibraryId, to: LibraryId) -> CycleEdge {
    let symbol = graph.witnesses(from, to).first().cloned().unwrap_or_default();
    CycleEdge {
        from: graph.library(from).filename.clone(),
        to: graph.library(to).filename.clone(),
        symbol,
    }
}
